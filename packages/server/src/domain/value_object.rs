//! Value objects validated at the boundary.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{InvalidContent, InvalidUserId};

/// Maximum length of a chat message in characters
pub const MAX_CONTENT_CHARS: usize = 4096;

/// Stable identifier a user presents at identify time.
///
/// Supplied by the client, not generated server-side; stable for a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(value: String) -> Result<Self, InvalidUserId> {
        if value.trim().is_empty() {
            return Err(InvalidUserId::Empty);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Opaque per-attachment identifier assigned by the transport layer.
///
/// The join key between a network attachment and a user; never reused
/// within process lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&ConnectionId> for UserId {
    /// Fallback user id for connections that identified without an id.
    fn from(connection_id: &ConnectionId) -> Self {
        UserId(connection_id.0.clone())
    }
}

/// Validated chat message content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageContent(String);

impl MessageContent {
    pub fn new(value: String) -> Result<Self, InvalidContent> {
        if value.trim().is_empty() {
            return Err(InvalidContent::Empty);
        }
        if value.chars().count() > MAX_CONTENT_CHARS {
            return Err(InvalidContent::TooLong);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Unix timestamp in UTC milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// Identifier of a chat message, assigned at creation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageId(String);

impl MessageId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Factory producing message ids that are collision-free within process
/// lifetime.
///
/// Ids combine a time-derived prefix with a process-wide sequence, so two
/// messages created in the same millisecond still get distinct ids.
#[derive(Debug, Default)]
pub struct MessageIdFactory {
    seq: AtomicU64,
}

impl MessageIdFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self, now_millis: i64) -> MessageId {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        MessageId(format!("{now_millis}-{seq}"))
    }
}
