//! UseCase layer: one use case per engine operation, plus the engine facade
//! that serializes them.

mod connect_client;
mod disconnect_client;
mod engine;
mod error;
mod notify;
mod send_message;

pub use connect_client::{CONNECTED_NOTICE, ConnectClientUseCase, ConnectOutcome};
pub use disconnect_client::{DisconnectClientUseCase, DisconnectOutcome};
pub use engine::BroadcastEngine;
pub use error::InboundMessageError;
pub use send_message::{InboundOutcome, SendMessageUseCase};
