//! UseCase error types.

use thiserror::Error;

use crate::domain::{InvalidContent, MAX_CONTENT_CHARS};

/// Failures when accepting a chat message
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SendMessageError {
    /// The content was empty or whitespace only
    #[error("message content must not be empty")]
    EmptyContent,
    /// The content exceeded the maximum length
    #[error("message content exceeds {MAX_CONTENT_CHARS} characters")]
    ContentTooLong,
}

impl From<InvalidContent> for SendMessageError {
    fn from(error: InvalidContent) -> Self {
        match error {
            InvalidContent::Empty => SendMessageError::EmptyContent,
            InvalidContent::TooLong => SendMessageError::ContentTooLong,
        }
    }
}
