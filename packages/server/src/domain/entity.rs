//! Domain entities: users and chat messages.

use super::value_object::{ConnectionId, MessageContent, MessageId, Timestamp, UserId};

/// Display name substituted when an identify payload carries none
pub const DEFAULT_DISPLAY_NAME: &str = "Anonymous";

/// Presence status of a user.
///
/// A user only exists in the roster while its connection is alive, so the
/// only observable status is `Online`; departure is modeled by removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserStatus {
    Online,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Online => "online",
        }
    }
}

/// A user attached to the hub. One per live connection; destroyed on
/// disconnect.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub display_name: String,
    pub avatar_url: String,
    pub status: UserStatus,
}

impl User {
    /// Build a user from an identify payload, applying the roster defaults:
    /// missing id falls back to the connection id, missing display name to
    /// [`DEFAULT_DISPLAY_NAME`], missing avatar to a URL computed from the
    /// display name.
    pub fn from_identify(
        connection_id: &ConnectionId,
        id: Option<String>,
        display_name: Option<String>,
        avatar_url: Option<String>,
    ) -> Self {
        let id = id
            .and_then(|value| UserId::new(value).ok())
            .unwrap_or_else(|| UserId::from(connection_id));
        let display_name = display_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string());
        let avatar_url = avatar_url
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| Self::default_avatar_url(&display_name));

        Self {
            id,
            display_name,
            avatar_url,
            status: UserStatus::Online,
        }
    }

    /// The stand-in identity for a connection that has not identified yet.
    pub fn anonymous(connection_id: &ConnectionId) -> Self {
        Self::from_identify(connection_id, None, None, None)
    }

    /// Avatar URL computed from a display name when none is supplied.
    pub fn default_avatar_url(display_name: &str) -> String {
        format!("https://ui-avatars.com/api/?name={display_name}&background=random")
    }
}

/// The sender snapshot embedded in a message.
///
/// A copy of the user at send time; later identify calls do not rewrite
/// messages already in the log.
#[derive(Debug, Clone, PartialEq)]
pub struct Sender {
    pub id: UserId,
    pub display_name: String,
    pub avatar_url: String,
}

impl Sender {
    /// Sender for messages arriving over a transport with no connection
    /// identity (the one-shot HTTP binding).
    pub fn anonymous() -> Self {
        Self {
            id: UserId::new("anonymous".to_string()).expect("literal id is non-empty"),
            display_name: DEFAULT_DISPLAY_NAME.to_string(),
            avatar_url: User::default_avatar_url(DEFAULT_DISPLAY_NAME),
        }
    }
}

impl From<&User> for Sender {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            display_name: user.display_name.clone(),
            avatar_url: user.avatar_url.clone(),
        }
    }
}

/// A chat message. Immutable once created; owned by the message log.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub content: MessageContent,
    pub sender: Sender,
    pub timestamp: Timestamp,
}
