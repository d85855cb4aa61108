//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - ConnectionRegistry（接続中のクライアントの送信キュー）を管理
//! - クライアントへのメッセージ送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された送信キューを受け取り、メッセージ送信に使用します。
//! broadcast はレジストリのロックを保持したまま全接続を走査するため、
//! 走査中に登録解除が割り込むことはありません。送信はキューへの投入のみで
//! ブロックしません。

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    BroadcastReport, ConnectionHandle, ConnectionId, ConnectionRegistry, MessagePushError,
    MessagePusher,
};

/// WebSocket を使った MessagePusher 実装
///
/// ## 使用例
///
/// ```ignore
/// let pusher = WebSocketMessagePusher::default();
/// pusher.register_client(ConnectionHandle::open(tx)).await;
/// pusher.broadcast("{\"type\":\"userCount\",\"count\":1}").await;
/// ```
#[derive(Default)]
pub struct WebSocketMessagePusher {
    registry: Mutex<ConnectionRegistry>,
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection: ConnectionHandle) -> bool {
        let connection_id = connection.id();
        let mut registry = self.registry.lock().await;
        let inserted = registry.register(connection);
        if inserted {
            tracing::debug!("Connection '{}' registered", connection_id);
        } else {
            tracing::debug!("Connection '{}' was already registered", connection_id);
        }
        inserted
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) -> bool {
        let mut registry = self.registry.lock().await;
        let removed = registry.unregister(connection_id).is_some();
        if removed {
            tracing::debug!("Connection '{}' unregistered", connection_id);
        }
        removed
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError> {
        let registry = self.registry.lock().await;
        let connection = registry
            .get(connection_id)
            .ok_or_else(|| MessagePushError::ClientNotFound(connection_id.to_string()))?;
        connection.send(content)?;
        tracing::debug!("Pushed message to connection '{}'", connection_id);
        Ok(())
    }

    async fn broadcast(&self, content: &str) -> BroadcastReport {
        let registry = self.registry.lock().await;
        let mut report = BroadcastReport::default();

        registry.for_each(|connection| {
            if !connection.is_open() {
                report.skipped += 1;
                return;
            }
            // ブロードキャストでは一部の送信失敗を許容（再送しない）
            match connection.send(content) {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    tracing::debug!("Skipping connection during broadcast: {}", e);
                    report.skipped += 1;
                }
            }
        });

        tracing::debug!(
            "Broadcasted message to {} connections ({} skipped)",
            report.delivered,
            report.skipped
        );
        report
    }

    async fn count_clients(&self) -> usize {
        let registry = self.registry.lock().await;
        registry.size()
    }
}
