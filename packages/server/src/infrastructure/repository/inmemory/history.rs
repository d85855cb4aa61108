//! InMemory History Repository 実装
//!
//! ドメイン層が定義する HistoryRepository trait の具体的な実装。
//! HistoryBuffer をインメモリのストレージとして使用します。
//! プロセス終了とともに履歴は失われます。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ChatMessage, HistoryBuffer, HistoryRepository};

/// インメモリ History Repository 実装
pub struct InMemoryHistoryRepository {
    history: Arc<Mutex<HistoryBuffer>>,
}

impl InMemoryHistoryRepository {
    pub fn new(history: Arc<Mutex<HistoryBuffer>>) -> Self {
        Self { history }
    }

    /// 指定した容量の空のバッファで作成
    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(Arc::new(Mutex::new(HistoryBuffer::with_capacity(capacity))))
    }
}

#[async_trait]
impl HistoryRepository for InMemoryHistoryRepository {
    async fn append(&self, message: ChatMessage) {
        let mut history = self.history.lock().await;
        if let Some(evicted) = history.append(message) {
            tracing::debug!(
                "Evicted message '{}' from history (capacity {})",
                evicted.id,
                history.capacity()
            );
        }
    }

    async fn recent(&self, n: usize) -> Vec<ChatMessage> {
        let history = self.history.lock().await;
        history.recent(n)
    }

    async fn count(&self) -> usize {
        let history = self.history.lock().await;
        history.len()
    }
}
