//! User service.

use crate::config::ServiceConfig;
use crate::error::ScimResult;
use crate::patch::PatchRequest;
use crate::resolver::NoopResolver;
use crate::resource::{ListQuery, ListResponse, User};
use crate::service::{ResourceManager, ResourceService};
use crate::storage::StorageProvider;
use log::debug;
use std::sync::Arc;

/// Lifecycle of User resources. `userName` is unique (case-sensitive).
#[derive(Clone)]
pub struct UserService<S> {
    manager: ResourceManager<User, S>,
}

impl<S: StorageProvider> UserService<S> {
    pub fn new(storage: S, config: Arc<ServiceConfig>) -> Self {
        Self {
            manager: ResourceManager::new(storage, config),
        }
    }

    /// Delete every user.
    pub async fn clear(&self) -> ScimResult<usize> {
        self.manager.clear().await
    }

    /// Group membership is owned by groups; client-sent `groups` are dropped.
    fn prepare(mut user: User) -> User {
        if !user.groups.is_empty() {
            debug!(
                "Ignoring {} client-supplied groups on user '{}'",
                user.groups.len(),
                user.user_name
            );
            user.groups.clear();
        }
        user
    }
}

impl<S: StorageProvider> ResourceService for UserService<S> {
    type Resource = User;

    async fn list(&self, query: ListQuery) -> ScimResult<ListResponse<User>> {
        self.manager.list(query).await
    }

    async fn get_by_id(&self, id: &str) -> ScimResult<Option<User>> {
        self.manager.get(id).await
    }

    async fn create(&self, user: User) -> ScimResult<User> {
        self.manager.create(Self::prepare(user)).await
    }

    async fn replace(&self, id: &str, user: User) -> ScimResult<User> {
        self.manager.replace(id, Self::prepare(user)).await
    }

    async fn patch(&self, id: &str, request: &PatchRequest) -> ScimResult<User> {
        self.manager
            .patch(id, &request.operations, &NoopResolver)
            .await
    }

    async fn delete(&self, id: &str) -> ScimResult<bool> {
        self.manager.delete(id).await
    }
}
