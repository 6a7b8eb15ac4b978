//! In-memory presence registry.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, PresenceRegistry, User};

/// In-memory [`PresenceRegistry`] implementation.
///
/// Entries are kept in a `Vec` rather than a map so that `list_users`
/// iterates in insertion order and a re-identify keeps the entry's
/// original roster position.
pub struct InMemoryPresenceRegistry {
    entries: Mutex<Vec<(ConnectionId, User)>>,
}

impl InMemoryPresenceRegistry {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryPresenceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PresenceRegistry for InMemoryPresenceRegistry {
    async fn add_user(&self, connection_id: ConnectionId, user: User) -> User {
        let mut entries = self.entries.lock().await;
        match entries.iter_mut().find(|entry| entry.0 == connection_id) {
            Some(entry) => entry.1 = user.clone(),
            None => entries.push((connection_id, user.clone())),
        }
        user
    }

    async fn remove_user(&self, connection_id: &ConnectionId) -> Option<User> {
        let mut entries = self.entries.lock().await;
        let position = entries.iter().position(|(id, _)| id == connection_id)?;
        Some(entries.remove(position).1)
    }

    async fn get_user(&self, connection_id: &ConnectionId) -> Option<User> {
        let entries = self.entries.lock().await;
        entries
            .iter()
            .find(|(id, _)| id == connection_id)
            .map(|(_, user)| user.clone())
    }

    async fn list_users(&self) -> Vec<User> {
        let entries = self.entries.lock().await;
        entries.iter().map(|(_, user)| user.clone()).collect()
    }

    async fn count_users(&self) -> usize {
        let entries = self.entries.lock().await;
        entries.len()
    }
}
