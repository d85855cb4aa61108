//! UseCase: クライアント接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectClientUseCase::execute() メソッド
//! - 登録 → 接続通知(system) → 履歴(history) → 接続数(userCount) の順序
//!
//! ### どのような状況を想定しているか
//! - 正常系：履歴が空の状態での接続
//! - 正常系：履歴がある状態での接続（直近 N 件のみ送られる）

use std::sync::Arc;

use hearth_shared::time::Clock;

use crate::{
    domain::{BroadcastReport, ConnectionHandle, HistoryRepository, MessagePusher, Timestamp},
    infrastructure::dto::websocket::{ServerMessage, SystemMessageDto},
};

use super::notify::{broadcast_user_count, push_frame};

/// Text of the system notice sent to a joining client.
pub const CONNECTED_NOTICE: &str = "Connected to chat server!";

/// What happened while admitting a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectOutcome {
    /// Registry size after registration.
    pub client_count: usize,
    /// Number of history messages replayed to the new connection.
    pub replayed: usize,
    /// Delivery of the user-count broadcast.
    pub count_report: BroadcastReport,
}

/// クライアント接続のユースケース
pub struct ConnectClientUseCase {
    repository: Arc<dyn HistoryRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
    replay: usize,
}

impl ConnectClientUseCase {
    pub fn new(
        repository: Arc<dyn HistoryRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
        replay: usize,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
            replay,
        }
    }

    /// 接続を実行
    ///
    /// 1. レジストリに登録
    /// 2. 新しい接続へ system 通知（現在の接続数付き）
    /// 3. 履歴があれば直近 `replay` 件を history として送信
    /// 4. 全接続（新しい接続を含む）へ userCount をブロードキャスト
    pub async fn execute(&self, connection: ConnectionHandle) -> ConnectOutcome {
        let connection_id = connection.id();

        // 1. 登録
        self.message_pusher.register_client(connection).await;
        let client_count = self.message_pusher.count_clients().await;

        // 2. 接続通知
        let notice = ServerMessage::System(SystemMessageDto {
            message: CONNECTED_NOTICE.to_string(),
            timestamp: Timestamp::new(self.clock.now()).to_wire(),
            client_count: Some(client_count),
        });
        push_frame(self.message_pusher.as_ref(), &connection_id, &notice).await;

        // 3. 履歴
        let recent = self.repository.recent(self.replay).await;
        let replayed = recent.len();
        if !recent.is_empty() {
            let history = ServerMessage::History(recent.as_slice().into());
            push_frame(self.message_pusher.as_ref(), &connection_id, &history).await;
        }

        // 4. 接続数
        let (_, count_report) =
            broadcast_user_count(self.message_pusher.as_ref(), self.clock.as_ref()).await;

        ConnectOutcome {
            client_count,
            replayed,
            count_report,
        }
    }
}
