//! Transport adapter: axum router, WebSocket / HTTP handlers and shutdown handling.

mod error;
mod handler;
mod server;
mod signal;
pub mod state;

pub use error::ServerError;
pub use server::{Server, router};
pub use signal::shutdown_signal;
