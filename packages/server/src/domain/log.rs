//! Message log trait.
//!
//! Append-only, time-ordered chat history with paginated read access.
//! History is bounded only by process memory; there is deliberately no
//! deletion, mutation, or eviction API.

use async_trait::async_trait;

use super::entity::ChatMessage;

/// Append-only chat history.
#[async_trait]
pub trait MessageLog: Send + Sync {
    /// Store a message. Arrival order is defined as the order in which
    /// `append` calls complete; concurrent appends must not lose or
    /// reorder entries relative to that order.
    async fn append(&self, message: ChatMessage) -> ChatMessage;

    /// Messages `[offset, offset + limit)` in arrival order. Out-of-range
    /// offsets and a zero limit yield an empty page, never an error.
    async fn page(&self, limit: usize, offset: usize) -> Vec<ChatMessage>;

    /// Number of messages stored so far.
    async fn len(&self) -> usize;
}
