//! Server configuration (command line with environment fallbacks).

use clap::Parser;

use crate::domain::{DEFAULT_HISTORY_CAPACITY, DEFAULT_HISTORY_REPLAY};

#[derive(Parser, Debug, Clone)]
#[command(name = "hearth-server")]
#[command(about = "Broadcast chat server over WebSocket", long_about = None)]
pub struct ServerConfig {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Number of chat messages kept in memory
    #[arg(long, env = "HISTORY_CAPACITY", default_value_t = DEFAULT_HISTORY_CAPACITY)]
    pub history_capacity: usize,

    /// Number of recent messages replayed to a joining client
    #[arg(long, env = "HISTORY_REPLAY", default_value_t = DEFAULT_HISTORY_REPLAY)]
    pub history_replay: usize,

    /// Default log level when RUST_LOG is not set
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl ServerConfig {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            history_capacity: self.history_capacity,
            history_replay: self.history_replay,
        }
    }
}

/// History policy of the broadcast engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub history_capacity: usize,
    pub history_replay: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            history_replay: DEFAULT_HISTORY_REPLAY,
        }
    }
}
