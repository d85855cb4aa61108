//! UseCase errors.

use thiserror::Error;

/// Why an inbound payload was not processed.
#[derive(Debug, Error)]
pub enum InboundMessageError {
    #[error("malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("failed to encode chat frame: {0}")]
    Encode(#[source] serde_json::Error),
}
