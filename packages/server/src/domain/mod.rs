//! Domain layer: value objects, entities and the ports the use cases depend on.

pub mod entity;
pub mod error;
pub mod history;
pub mod message_pusher;
pub mod registry;
pub mod repository;
pub mod value_object;

pub use entity::ChatMessage;
pub use error::MessagePushError;
pub use history::{DEFAULT_HISTORY_CAPACITY, DEFAULT_HISTORY_REPLAY, HistoryBuffer};
pub use message_pusher::{BroadcastReport, MessagePusher};
pub use registry::{ConnectionHandle, ConnectionRegistry, PusherChannel};
pub use repository::HistoryRepository;
pub use value_object::{ANONYMOUS_USERNAME, ConnectionId, MessageId, Timestamp, Username};
