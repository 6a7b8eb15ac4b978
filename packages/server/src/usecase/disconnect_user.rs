//! UseCase: user disconnection.
//!
//! Transport close tears the connection out of the fan-out set, and — when
//! the connection had identified — out of the roster, announcing the
//! departure to everyone still attached.

use std::sync::Arc;

use crate::domain::{ConnectionId, EventBroadcaster, PresenceRegistry, User};
use crate::infrastructure::dto::websocket::{ServerEvent, UserDto};

/// Removes a connection's user and announces the departure.
pub struct DisconnectUserUseCase {
    registry: Arc<dyn PresenceRegistry>,
    broadcaster: Arc<dyn EventBroadcaster>,
}

impl DisconnectUserUseCase {
    pub fn new(
        registry: Arc<dyn PresenceRegistry>,
        broadcaster: Arc<dyn EventBroadcaster>,
    ) -> Self {
        Self {
            registry,
            broadcaster,
        }
    }

    /// Unregister the connection from the fan-out set and, if it had
    /// identified, remove it from the roster and broadcast
    /// `user:disconnected` followed by a fresh `users:updated` snapshot.
    /// A connection that never identified leaves silently.
    pub async fn execute(&self, connection_id: &ConnectionId) -> Option<User> {
        self.broadcaster.unregister(connection_id).await;

        let user = self.registry.remove_user(connection_id).await?;

        let disconnected =
            ServerEvent::UserDisconnected(user.id.as_str().to_string()).to_frame();
        self.broadcaster.broadcast(&disconnected).await;

        let roster: Vec<UserDto> = self
            .registry
            .list_users()
            .await
            .iter()
            .map(UserDto::from)
            .collect();
        let updated = ServerEvent::UsersUpdated(roster).to_frame();
        self.broadcaster.broadcast(&updated).await;

        Some(user)
    }
}
