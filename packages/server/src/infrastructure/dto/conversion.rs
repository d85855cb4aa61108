//! Conversion logic from domain entities to DTOs.

use crate::domain::entity;
use crate::infrastructure::dto::websocket as dto;

impl From<&entity::ChatMessage> for dto::ChatMessageDto {
    fn from(model: &entity::ChatMessage) -> Self {
        Self {
            username: model.username.as_str().to_string(),
            message: model.text.clone(),
            timestamp: model.timestamp.to_wire(),
            id: model.id.as_str().to_string(),
        }
    }
}

impl From<&entity::ChatMessage> for dto::ServerMessage {
    fn from(model: &entity::ChatMessage) -> Self {
        Self::Chat(model.into())
    }
}

impl From<&[entity::ChatMessage]> for dto::HistoryDto {
    fn from(models: &[entity::ChatMessage]) -> Self {
        Self {
            messages: models
                .iter()
                .map(|m| dto::HistoryEntry::Chat(m.into()))
                .collect(),
        }
    }
}
