//! In-memory append-only message log.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ChatMessage, MessageLog};

/// In-memory [`MessageLog`] implementation.
///
/// A plain `Vec` behind a mutex: append order under the lock is the
/// arrival order the pagination contract is defined against.
pub struct InMemoryMessageLog {
    messages: Mutex<Vec<ChatMessage>>,
}

impl InMemoryMessageLog {
    pub fn new() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryMessageLog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageLog for InMemoryMessageLog {
    async fn append(&self, message: ChatMessage) -> ChatMessage {
        let mut messages = self.messages.lock().await;
        messages.push(message.clone());
        message
    }

    async fn page(&self, limit: usize, offset: usize) -> Vec<ChatMessage> {
        if limit == 0 {
            return Vec::new();
        }
        let messages = self.messages.lock().await;
        messages.iter().skip(offset).take(limit).cloned().collect()
    }

    async fn len(&self) -> usize {
        let messages = self.messages.lock().await;
        messages.len()
    }
}
