//! History repository trait.
//!
//! The use cases depend on this port; the infrastructure layer provides the
//! storage (依存性の逆転).

use async_trait::async_trait;

use super::ChatMessage;

/// Storage for the bounded chat history.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Append a message, evicting the oldest one when the window is full.
    async fn append(&self, message: ChatMessage);

    /// Up to the last `n` messages in arrival order.
    async fn recent(&self, n: usize) -> Vec<ChatMessage>;

    /// Number of messages currently held.
    async fn count(&self) -> usize;
}
