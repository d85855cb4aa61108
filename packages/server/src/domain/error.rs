//! Domain errors.

use thiserror::Error;

/// Failures when pushing a frame to a single connection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("connection '{0}' is not registered")]
    ClientNotFound(String),

    #[error("connection '{0}' is closed")]
    ConnectionClosed(String),
}
