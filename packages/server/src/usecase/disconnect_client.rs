//! UseCase: クライアント切断処理
//!
//! 切断・トランスポートエラーのどちらの経路もここに合流します。
//! 二重の登録解除は何もしません。

use std::sync::Arc;

use hearth_shared::time::Clock;

use crate::domain::{BroadcastReport, ConnectionId, MessagePusher};

use super::notify::broadcast_user_count;

/// What happened while removing a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisconnectOutcome {
    /// `false` when the connection had already been removed.
    pub removed: bool,
    /// Registry size after removal.
    pub client_count: usize,
    /// Delivery of the user-count broadcast to the remaining connections.
    pub count_report: BroadcastReport,
}

/// クライアント切断のユースケース
pub struct DisconnectClientUseCase {
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl DisconnectClientUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>, clock: Arc<dyn Clock>) -> Self {
        Self {
            message_pusher,
            clock,
        }
    }

    /// 切断を実行: 登録解除してから、残りの接続へ userCount をブロードキャスト
    pub async fn execute(&self, connection_id: &ConnectionId) -> DisconnectOutcome {
        let removed = self.message_pusher.unregister_client(connection_id).await;
        let (client_count, count_report) =
            broadcast_user_count(self.message_pusher.as_ref(), self.clock.as_ref()).await;

        DisconnectOutcome {
            removed,
            client_count,
            count_report,
        }
    }
}
