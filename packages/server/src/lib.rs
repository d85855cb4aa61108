//! Broadcast chat server library.
//!
//! Tracks live WebSocket connections, keeps a bounded window of recent chat
//! messages, and fans every message out to all connected clients.

pub mod config;

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
