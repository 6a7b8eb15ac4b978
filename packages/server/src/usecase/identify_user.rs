//! UseCase: user identification.
//!
//! A connection declares its user identity. The roster mutation and the
//! presence broadcasts happen in one logical step so observers never see a
//! stale roster beyond one event cycle.

use std::sync::Arc;

use crate::domain::{ConnectionId, EventBroadcaster, PresenceRegistry, User};
use crate::infrastructure::dto::websocket::{IdentifyDto, ServerEvent, UserDto};

/// Records a connection's user and announces the join.
pub struct IdentifyUserUseCase {
    registry: Arc<dyn PresenceRegistry>,
    broadcaster: Arc<dyn EventBroadcaster>,
}

impl IdentifyUserUseCase {
    pub fn new(
        registry: Arc<dyn PresenceRegistry>,
        broadcaster: Arc<dyn EventBroadcaster>,
    ) -> Self {
        Self {
            registry,
            broadcaster,
        }
    }

    /// Record the identity and broadcast `user:connected` followed by a
    /// `users:updated` roster snapshot. Both broadcasts fire on every
    /// identify, including a re-identify on the same connection (which
    /// replaces the roster entry instead of duplicating it).
    pub async fn execute(&self, connection_id: ConnectionId, payload: IdentifyDto) -> User {
        let user = User::from_identify(
            &connection_id,
            payload.id,
            payload.display_name,
            payload.avatar_url,
        );
        let user = self.registry.add_user(connection_id, user).await;

        let connected = ServerEvent::UserConnected(UserDto::from(&user)).to_frame();
        self.broadcaster.broadcast(&connected).await;

        // roster snapshot taken after the mutation, never before
        let roster: Vec<UserDto> = self
            .registry
            .list_users()
            .await
            .iter()
            .map(UserDto::from)
            .collect();
        let updated = ServerEvent::UsersUpdated(roster).to_frame();
        self.broadcaster.broadcast(&updated).await;

        user
    }
}
