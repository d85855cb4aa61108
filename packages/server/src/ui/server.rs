//! Server execution logic.

use std::{future::Future, sync::Arc};

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::usecase::BroadcastEngine;

use super::{
    error::ServerError,
    handler::{health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Build the router: WebSocket on `/` and `/ws`, health check on `/api/health`.
pub fn router(engine: Arc<BroadcastEngine>) -> Router {
    let app_state = Arc::new(AppState { engine });

    Router::new()
        // WebSocket エンドポイント
        .route("/", get(websocket_handler))
        .route("/ws", get(websocket_handler))
        // HTTP エンドポイント
        .route("/api/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// WebSocket chat server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(engine);
/// server.run("0.0.0.0", 8080).await?;
/// ```
pub struct Server {
    engine: Arc<BroadcastEngine>,
}

impl Server {
    pub fn new(engine: Arc<BroadcastEngine>) -> Self {
        Self { engine }
    }

    /// Bind to `host:port` and serve until Ctrl+C / SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound or serving fails.
    pub async fn run(self, host: &str, port: u16) -> Result<(), ServerError> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: bind_addr.clone(),
                source,
            })?;

        tracing::info!(
            "WebSocket chat server listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Connect to: ws://{}", bind_addr);

        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    ///
    /// On shutdown the listener stops accepting and is closed before this returns.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(listener, router(self.engine))
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}
