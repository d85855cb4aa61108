//! Server state.

use std::sync::Arc;

use crate::usecase::BroadcastEngine;

/// Shared application state
pub struct AppState {
    /// Broadcast engine（接続・履歴・配信のオーケストレーション）
    pub engine: Arc<BroadcastEngine>,
}
