//! Domain error types.

use thiserror::Error;

use super::value_object::MAX_CONTENT_CHARS;

/// Rejection reasons for user id validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidUserId {
    /// User id was empty or whitespace only
    #[error("user id must not be empty")]
    Empty,
}

/// Rejection reasons for message content validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidContent {
    /// Content was empty or whitespace only
    #[error("message content must not be empty")]
    Empty,
    /// Content exceeded the maximum length
    #[error("message content exceeds {MAX_CONTENT_CHARS} characters")]
    TooLong,
}

/// Failures when pushing a frame to a connection
#[derive(Debug, Error)]
pub enum BroadcastError {
    /// The connection is not registered with the broadcaster
    #[error("connection '{0}' is not registered")]
    ConnectionNotFound(String),
    /// The connection's channel rejected the frame
    #[error("failed to push frame: {0}")]
    PushFailed(String),
}
