//! Domain layer: entities, value objects, and the trait seams the use case
//! layer depends on.
//!
//! Concrete implementations of the traits live in the infrastructure layer
//! (dependency inversion).

pub mod broadcaster;
pub mod entity;
pub mod error;
pub mod log;
pub mod registry;
pub mod value_object;

pub use broadcaster::{ConnectionSender, EventBroadcaster};
pub use entity::{ChatMessage, Sender, User, UserStatus, DEFAULT_DISPLAY_NAME};
pub use error::{BroadcastError, InvalidContent, InvalidUserId};
pub use log::MessageLog;
pub use registry::PresenceRegistry;
pub use value_object::{
    ConnectionId, MessageContent, MessageId, MessageIdFactory, Timestamp, UserId,
    MAX_CONTENT_CHARS,
};
