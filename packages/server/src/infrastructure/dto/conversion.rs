//! Conversion logic between DTOs and domain entities.

use crate::domain::{ChatMessage, Sender, User};
use crate::infrastructure::dto::websocket as dto;

// ========================================
// Domain Entity → DTO
// ========================================

impl From<&User> for dto::UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.as_str().to_string(),
            display_name: user.display_name.clone(),
            avatar_url: user.avatar_url.clone(),
            status: user.status.as_str().to_string(),
        }
    }
}

impl From<&Sender> for dto::SenderDto {
    fn from(sender: &Sender) -> Self {
        Self {
            id: sender.id.as_str().to_string(),
            display_name: sender.display_name.clone(),
            avatar_url: sender.avatar_url.clone(),
        }
    }
}

impl From<&ChatMessage> for dto::MessageDto {
    fn from(message: &ChatMessage) -> Self {
        Self {
            id: message.id.as_str().to_string(),
            content: message.content.as_str().to_string(),
            sender: dto::SenderDto::from(&message.sender),
            timestamp: message.timestamp.value(),
        }
    }
}
