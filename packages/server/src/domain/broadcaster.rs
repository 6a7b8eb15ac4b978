//! Event broadcaster trait.
//!
//! Pushes serialized event frames to attached connections. The use case
//! layer depends on this trait; the WebSocket implementation lives in the
//! infrastructure layer.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::error::BroadcastError;
use super::value_object::ConnectionId;

/// Per-connection channel used to push frames to a connection's socket task
pub type ConnectionSender = mpsc::UnboundedSender<String>;

/// Fan-out of event frames to attached connections.
///
/// Delivery is fire-and-forget: no acknowledgment, no retry, no ordering
/// guarantee across distinct connections. Delivery order to any single
/// connection matches call order at the broadcaster.
#[async_trait]
pub trait EventBroadcaster: Send + Sync {
    /// Register a connection's sender. Called when the transport attaches
    /// the connection, before identify.
    async fn register(&self, connection_id: ConnectionId, sender: ConnectionSender);

    /// Remove a connection's sender. Idempotent.
    async fn unregister(&self, connection_id: &ConnectionId);

    /// Deliver a frame to a single connection.
    async fn send_to(
        &self,
        connection_id: &ConnectionId,
        frame: &str,
    ) -> Result<(), BroadcastError>;

    /// Deliver a frame to a snapshot of the currently registered
    /// connections. Connections that attach or detach mid-broadcast are
    /// not included; individual push failures are logged and skipped.
    async fn broadcast(&self, frame: &str);
}
