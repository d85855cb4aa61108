//! Terminal chat client for Hearth.
//!
//! Reads lines with rustyline, sends them as `chat` frames and prints every
//! frame the server broadcasts. Reconnects with linear backoff when the
//! connection drops.

mod domain;
pub mod error;
mod formatter;
mod runner;
mod session;
mod ui;

pub use error::ClientError;
pub use runner::{ClientOptions, DEFAULT_MAX_RECONNECT_ATTEMPTS, run_client};
