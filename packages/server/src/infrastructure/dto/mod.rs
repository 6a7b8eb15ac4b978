//! Data Transfer Objects (DTOs) for the chat hub.
//!
//! DTOs define the wire shapes exchanged over the WebSocket channel and
//! embedded in JSON-RPC results. Conversions from domain entities live in
//! `conversion`.

pub mod conversion;
pub mod websocket;
