//! MessagePusher trait 定義
//!
//! 接続の登録管理と、クライアントへのメッセージ送信（push_to, broadcast）の
//! インターフェース。具体的な実装は Infrastructure 層が提供します。

use async_trait::async_trait;

use super::{ConnectionHandle, ConnectionId, MessagePushError};

/// Result of one fan-out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Frames enqueued on open connections.
    pub delivered: usize,
    /// Connections skipped because they were closed at send time.
    pub skipped: usize,
}

impl BroadcastReport {
    pub fn attempted(&self) -> usize {
        self.delivered + self.skipped
    }
}

/// Connection registry plus best-effort delivery.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// Register a connection. Returns `false` if it was already registered.
    async fn register_client(&self, connection: ConnectionHandle) -> bool;

    /// Unregister a connection. Returns `false` if it was not registered.
    async fn unregister_client(&self, connection_id: &ConnectionId) -> bool;

    /// Send a frame to one connection.
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError>;

    /// Send a frame to every registered connection, skipping closed ones.
    ///
    /// Never fails: individual send failures are counted, not propagated.
    async fn broadcast(&self, content: &str) -> BroadcastReport;

    /// Number of registered connections.
    async fn count_clients(&self) -> usize;
}
