//! WebSocket wire protocol: typed event frames.
//!
//! Every frame on the channel is `{"event": <name>, "data": <payload>}`.
//! Presence and chat events are plain named events; JSON-RPC traffic rides
//! on the `jsonrpc` event with the serialized envelope as its data, in both
//! directions (correlation is by envelope `id`, not by event name).

use serde::{Deserialize, Serialize};

/// A user as it appears on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: String,
    pub display_name: String,
    pub avatar_url: String,
    pub status: String,
}

/// The sender snapshot embedded in a message on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SenderDto {
    pub id: String,
    pub display_name: String,
    pub avatar_url: String,
}

/// A chat message as it appears on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDto {
    pub id: String,
    pub content: String,
    pub sender: SenderDto,
    pub timestamp: i64,
}

/// Payload of the `identify` event. All fields optional; the hub applies
/// roster defaults for whatever is missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IdentifyDto {
    pub id: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// Payload of an inbound `chat message` event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatPayloadDto {
    pub content: String,
}

/// Frames a client sends to the hub
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    #[serde(rename = "identify")]
    Identify(IdentifyDto),
    #[serde(rename = "chat message")]
    ChatMessage(ChatPayloadDto),
    #[serde(rename = "jsonrpc")]
    JsonRpc(String),
}

impl ClientEvent {
    pub fn to_frame(&self) -> String {
        serde_json::to_string(self).expect("event frame serialization never fails")
    }
}

/// Frames the hub pushes to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    #[serde(rename = "user:connected")]
    UserConnected(UserDto),
    #[serde(rename = "user:disconnected")]
    UserDisconnected(String),
    #[serde(rename = "users:updated")]
    UsersUpdated(Vec<UserDto>),
    #[serde(rename = "chat message")]
    ChatMessage(MessageDto),
    #[serde(rename = "jsonrpc")]
    JsonRpc(String),
}

impl ServerEvent {
    pub fn to_frame(&self) -> String {
        serde_json::to_string(self).expect("event frame serialization never fails")
    }
}
