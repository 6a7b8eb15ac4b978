//! UseCase: roster read.

use std::sync::Arc;

use crate::domain::{PresenceRegistry, User};

/// Reads the current roster snapshot.
pub struct GetActiveUsersUseCase {
    registry: Arc<dyn PresenceRegistry>,
}

impl GetActiveUsersUseCase {
    pub fn new(registry: Arc<dyn PresenceRegistry>) -> Self {
        Self { registry }
    }

    pub async fn execute(&self) -> Vec<User> {
        self.registry.list_users().await
    }
}
