//! WebSocket frame DTOs.
//!
//! Every frame is a JSON object discriminated by its `type` field.

use serde::{Deserialize, Serialize};

/// Frames sent by clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    Chat(ChatSubmission),
    /// Any other `type`; ignored by the server.
    #[serde(other)]
    Unknown,
}

/// Body of an inbound `chat` frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSubmission {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub message: String,
}

/// Frames sent by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    Chat(ChatMessageDto),
    System(SystemMessageDto),
    UserCount(UserCountDto),
    History(HistoryDto),
}

impl ServerMessage {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessageDto {
    pub username: String,
    pub message: String,
    pub timestamp: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemMessageDto {
    pub message: String,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_count: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCountDto {
    pub count: usize,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryDto {
    pub messages: Vec<HistoryEntry>,
}

/// History entries carry their own `"type": "chat"` tag, same as live chat frames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HistoryEntry {
    Chat(ChatMessageDto),
}
