//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::ui::state::AppState;

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let clients = state.engine.client_count().await;
    let history = state.engine.history_len().await;
    Json(serde_json::json!({
        "status": "ok",
        "clients": clients,
        "history": history,
    }))
}
