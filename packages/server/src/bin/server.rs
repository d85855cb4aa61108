//! Broadcast chat server.
//!
//! Every chat message is fanned out to all connected clients (sender
//! included); the last messages are kept in memory and replayed to new
//! clients.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hearth-server
//! PORT=3000 cargo run --bin hearth-server -- --history-capacity 100
//! ```

use std::sync::Arc;

use clap::Parser;
use hearth_server::{
    config::ServerConfig,
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryHistoryRepository},
    ui::Server,
    usecase::BroadcastEngine,
};
use hearth_shared::{logger::setup_logger, time::SystemClock};

#[tokio::main]
async fn main() {
    let config = ServerConfig::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &config.log_level);

    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. Engine (use cases)
    // 4. Server
    let engine_config = config.engine_config();

    // 1. Create Repository (in-memory history window)
    let repository = Arc::new(InMemoryHistoryRepository::with_capacity(
        engine_config.history_capacity,
    ));

    // 2. Create MessagePusher (WebSocket implementation, owns the connection registry)
    let message_pusher = Arc::new(WebSocketMessagePusher::default());

    // 3. Create the engine
    let engine = Arc::new(BroadcastEngine::new(
        repository,
        message_pusher,
        Arc::new(SystemClock),
        engine_config,
    ));
    tracing::info!(
        "Keeping {} messages, replaying {} to new clients",
        engine_config.history_capacity,
        engine_config.history_replay
    );

    // 4. Create and run the server
    let server = Server::new(engine);
    if let Err(e) = server.run(&config.host, config.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
