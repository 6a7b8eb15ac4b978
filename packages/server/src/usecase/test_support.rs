//! Hand-rolled test doubles shared by the usecase tests.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{BroadcastError, ConnectionId, ConnectionSender, EventBroadcaster};

/// An [`EventBroadcaster`] that records every broadcast frame in call order.
pub struct RecordingBroadcaster {
    frames: Mutex<Vec<String>>,
}

impl RecordingBroadcaster {
    pub fn new() -> Self {
        Self {
            frames: Mutex::new(Vec::new()),
        }
    }

    pub async fn frames(&self) -> Vec<String> {
        self.frames.lock().await.clone()
    }
}

#[async_trait]
impl EventBroadcaster for RecordingBroadcaster {
    async fn register(&self, _connection_id: ConnectionId, _sender: ConnectionSender) {}

    async fn unregister(&self, _connection_id: &ConnectionId) {}

    async fn send_to(
        &self,
        _connection_id: &ConnectionId,
        _frame: &str,
    ) -> Result<(), BroadcastError> {
        Ok(())
    }

    async fn broadcast(&self, frame: &str) {
        self.frames.lock().await.push(frame.to_string());
    }
}
