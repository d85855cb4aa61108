//! Entities.

use super::value_object::{MessageId, Timestamp, Username};

/// One user-authored chat message. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub username: Username,
    /// Body, taken verbatim from the submission.
    pub text: String,
    pub timestamp: Timestamp,
}

impl ChatMessage {
    pub fn new(username: Username, text: String, timestamp: Timestamp) -> Self {
        Self {
            id: MessageId::generate(&timestamp),
            username,
            text,
            timestamp,
        }
    }
}
