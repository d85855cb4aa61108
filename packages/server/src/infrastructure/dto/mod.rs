//! Data Transfer Objects (DTOs) for the chat protocol.
//!
//! - `websocket`: frames exchanged over the WebSocket
//! - `conversion`: domain entity → DTO conversion

pub mod conversion;
pub mod websocket;
