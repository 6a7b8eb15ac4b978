//! Presence registry trait.
//!
//! The source of truth for "who is online". The use case layer depends on
//! this trait; the infrastructure layer provides the implementation
//! (dependency inversion).

use async_trait::async_trait;

use super::entity::User;
use super::value_object::ConnectionId;

/// Maps each live connection to exactly one identified user.
///
/// None of these operations fail; absence is represented with `Option`,
/// never an error.
#[async_trait]
pub trait PresenceRegistry: Send + Sync {
    /// Insert or replace the user associated with a connection, returning
    /// the stored user. A second identify on the same connection replaces
    /// the association in place, never duplicates it.
    async fn add_user(&self, connection_id: ConnectionId, user: User) -> User;

    /// Remove and return the prior association, if the connection had
    /// identified.
    async fn remove_user(&self, connection_id: &ConnectionId) -> Option<User>;

    /// Look up the user for a connection.
    async fn get_user(&self, connection_id: &ConnectionId) -> Option<User>;

    /// Roster snapshot in insertion order.
    async fn list_users(&self) -> Vec<User>;

    /// Number of connections that have completed identify.
    async fn count_users(&self) -> usize;
}
