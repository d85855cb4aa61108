//! Terminal chat client for Hearth.
//!
//! Connects to the chat server, sends each line typed at the prompt as a
//! `chat` frame and prints everything the server broadcasts. Reconnects on
//! an unclean disconnect (2s × attempt backoff, 5 attempts by default).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hearth-client -- --username alice
//! HEARTH_URL=ws://chat.example.com/ws cargo run --bin hearth-client -- -n bob
//! ```

use clap::Parser;

use hearth_client::{ClientOptions, DEFAULT_MAX_RECONNECT_ATTEMPTS, run_client};
use hearth_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "hearth-client")]
#[command(about = "Terminal client for Hearth broadcast chat", long_about = None)]
struct Args {
    /// Display name (at least 2 characters)
    #[arg(short = 'n', long)]
    username: String,

    /// WebSocket server URL
    #[arg(short = 'u', long, env = "HEARTH_URL", default_value = "ws://127.0.0.1:8080/ws")]
    url: String,

    /// Reconnection attempts after an unclean disconnect
    #[arg(long, default_value_t = DEFAULT_MAX_RECONNECT_ATTEMPTS)]
    max_reconnect_attempts: u32,

    /// Default log level when RUST_LOG is not set
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let options = ClientOptions {
        url: args.url,
        username: args.username,
        max_reconnect_attempts: args.max_reconnect_attempts,
    };

    if let Err(e) = run_client(options).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
