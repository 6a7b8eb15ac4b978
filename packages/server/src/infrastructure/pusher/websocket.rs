//! WebSocket implementation of the event broadcaster.
//!
//! ## Responsibilities
//!
//! - Track the `UnboundedSender` of every attached connection
//! - Push frames to one connection (`send_to`) or all of them (`broadcast`)
//!
//! Socket creation happens in the UI layer (`ui::handler::websocket`); this
//! implementation only manages the senders handed to it, so "accepting a
//! connection" and "pushing frames to it" stay separate concerns.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{BroadcastError, ConnectionId, ConnectionSender, EventBroadcaster};

/// WebSocket-backed [`EventBroadcaster`].
///
/// The connection map is locked for the duration of a broadcast, which
/// makes the iterated set the snapshot the contract promises: connections
/// attaching or detaching mid-broadcast see either all frames after their
/// registration or none.
pub struct WebSocketBroadcaster {
    connections: Mutex<HashMap<ConnectionId, ConnectionSender>>,
}

impl WebSocketBroadcaster {
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for WebSocketBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventBroadcaster for WebSocketBroadcaster {
    async fn register(&self, connection_id: ConnectionId, sender: ConnectionSender) {
        let mut connections = self.connections.lock().await;
        tracing::debug!("Connection '{}' registered", connection_id.as_str());
        connections.insert(connection_id, sender);
    }

    async fn unregister(&self, connection_id: &ConnectionId) {
        let mut connections = self.connections.lock().await;
        connections.remove(connection_id);
        tracing::debug!("Connection '{}' unregistered", connection_id.as_str());
    }

    async fn send_to(
        &self,
        connection_id: &ConnectionId,
        frame: &str,
    ) -> Result<(), BroadcastError> {
        let connections = self.connections.lock().await;

        if let Some(sender) = connections.get(connection_id) {
            sender
                .send(frame.to_string())
                .map_err(|e| BroadcastError::PushFailed(e.to_string()))?;
            Ok(())
        } else {
            Err(BroadcastError::ConnectionNotFound(
                connection_id.as_str().to_string(),
            ))
        }
    }

    async fn broadcast(&self, frame: &str) {
        let connections = self.connections.lock().await;

        for (connection_id, sender) in connections.iter() {
            // a closing connection may reject the frame; skip it
            if let Err(e) = sender.send(frame.to_string()) {
                tracing::warn!(
                    "Failed to push frame to connection '{}': {}",
                    connection_id.as_str(),
                    e
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_send_to_delivers_to_registered_connection() {
        // given:
        let broadcaster = WebSocketBroadcaster::new();
        let connection_id = ConnectionId::generate();
        let (tx, mut rx) = mpsc::unbounded_channel();
        broadcaster.register(connection_id.clone(), tx).await;

        // when:
        let result = broadcaster.send_to(&connection_id, "hello").await;

        // then:
        assert!(result.is_ok());
        assert_eq!(rx.recv().await, Some("hello".to_string()));
    }

    #[tokio::test]
    async fn test_send_to_unknown_connection_fails() {
        // given:
        let broadcaster = WebSocketBroadcaster::new();

        // when:
        let result = broadcaster.send_to(&ConnectionId::generate(), "hello").await;

        // then:
        assert!(matches!(
            result.unwrap_err(),
            BroadcastError::ConnectionNotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_broadcast_reaches_every_registered_connection() {
        // given: two registered connections
        let broadcaster = WebSocketBroadcaster::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        broadcaster.register(ConnectionId::generate(), tx1).await;
        broadcaster.register(ConnectionId::generate(), tx2).await;

        // when:
        broadcaster.broadcast("ping").await;

        // then:
        assert_eq!(rx1.recv().await, Some("ping".to_string()));
        assert_eq!(rx2.recv().await, Some("ping".to_string()));
    }

    #[tokio::test]
    async fn test_broadcast_tolerates_closed_receiver() {
        // given: one live connection and one whose receiver is gone
        let broadcaster = WebSocketBroadcaster::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, rx2) = mpsc::unbounded_channel::<String>();
        drop(rx2);
        broadcaster.register(ConnectionId::generate(), tx1).await;
        broadcaster.register(ConnectionId::generate(), tx2).await;

        // when:
        broadcaster.broadcast("ping").await;

        // then: the live connection still receives the frame
        assert_eq!(rx1.recv().await, Some("ping".to_string()));
    }

    #[tokio::test]
    async fn test_unregistered_connection_receives_nothing() {
        // given:
        let broadcaster = WebSocketBroadcaster::new();
        let connection_id = ConnectionId::generate();
        let (tx, mut rx) = mpsc::unbounded_channel();
        broadcaster.register(connection_id.clone(), tx).await;

        // when:
        broadcaster.unregister(&connection_id).await;
        broadcaster.broadcast("ping").await;

        // then: the channel is closed without ever receiving
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_delivery_order_per_connection_matches_call_order() {
        // given:
        let broadcaster = WebSocketBroadcaster::new();
        let connection_id = ConnectionId::generate();
        let (tx, mut rx) = mpsc::unbounded_channel();
        broadcaster.register(connection_id.clone(), tx).await;

        // when:
        broadcaster.broadcast("first").await;
        broadcaster.send_to(&connection_id, "second").await.unwrap();
        broadcaster.broadcast("third").await;

        // then:
        assert_eq!(rx.recv().await, Some("first".to_string()));
        assert_eq!(rx.recv().await, Some("second".to_string()));
        assert_eq!(rx.recv().await, Some("third".to_string()));
    }
}
