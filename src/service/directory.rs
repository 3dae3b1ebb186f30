//! The directory facade: both services over one storage.

use crate::config::ServiceConfig;
use crate::error::ScimResult;
use crate::service::{GroupService, UserService};
use crate::storage::StorageProvider;
use std::sync::Arc;

/// User and Group services sharing one storage provider and configuration.
///
/// Sharing the storage is what lets group member enrichment see the users.
#[derive(Clone)]
pub struct Directory<S> {
    users: UserService<S>,
    groups: GroupService<S>,
    config: Arc<ServiceConfig>,
}

impl<S: StorageProvider + Clone> Directory<S> {
    pub fn new(storage: S, config: ServiceConfig) -> Self {
        let config = Arc::new(config);
        Self {
            users: UserService::new(storage.clone(), Arc::clone(&config)),
            groups: GroupService::new(storage, Arc::clone(&config)),
            config,
        }
    }

    pub fn users(&self) -> &UserService<S> {
        &self.users
    }

    pub fn groups(&self) -> &GroupService<S> {
        &self.groups
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Delete every user and group.
    pub async fn clear(&self) -> ScimResult<()> {
        self.groups.clear().await?;
        self.users.clear().await?;
        Ok(())
    }
}
