//! Error types for the chat client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Username rejected before connecting
    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    /// Message rejected before sending
    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    /// Connection could not be established or was lost
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Reconnection attempts exhausted
    #[error("Gave up after {0} reconnection attempts")]
    ReconnectExhausted(u32),
}
