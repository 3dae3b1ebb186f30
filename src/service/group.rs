//! Group service.
//!
//! Groups reference users by id through `members`. Whenever members enter a group (on
//! create, replace or patch) the ones without a `display` are enriched from the user
//! directory; dangling references are kept as they are.

use crate::config::ServiceConfig;
use crate::error::ScimResult;
use crate::patch::PatchRequest;
use crate::resolver::{DirectoryResolver, enrich_members};
use crate::resource::collection::dedup;
use crate::resource::{Group, ListQuery, ListResponse};
use crate::service::{ResourceManager, ResourceService};
use crate::storage::StorageProvider;
use std::sync::Arc;

/// Lifecycle of Group resources. `displayName` is unique (case-sensitive).
#[derive(Clone)]
pub struct GroupService<S> {
    manager: ResourceManager<Group, S>,
    resolver: DirectoryResolver<S>,
}

impl<S: StorageProvider + Clone> GroupService<S> {
    pub fn new(storage: S, config: Arc<ServiceConfig>) -> Self {
        Self {
            resolver: DirectoryResolver::new(storage.clone()),
            manager: ResourceManager::new(storage, config),
        }
    }

    /// Delete every group.
    pub async fn clear(&self) -> ScimResult<usize> {
        self.manager.clear().await
    }

    async fn prepare(&self, mut group: Group) -> Group {
        group.members = dedup(std::mem::take(&mut group.members));
        enrich_members(&mut group.members, None, &self.resolver).await;
        group
    }
}

impl<S: StorageProvider + Clone> ResourceService for GroupService<S> {
    type Resource = Group;

    async fn list(&self, query: ListQuery) -> ScimResult<ListResponse<Group>> {
        self.manager.list(query).await
    }

    async fn get_by_id(&self, id: &str) -> ScimResult<Option<Group>> {
        self.manager.get(id).await
    }

    async fn create(&self, group: Group) -> ScimResult<Group> {
        let group = self.prepare(group).await;
        self.manager.create(group).await
    }

    async fn replace(&self, id: &str, group: Group) -> ScimResult<Group> {
        let group = self.prepare(group).await;
        self.manager.replace(id, group).await
    }

    async fn patch(&self, id: &str, request: &PatchRequest) -> ScimResult<Group> {
        self.manager
            .patch(id, &request.operations, &self.resolver)
            .await
    }

    async fn delete(&self, id: &str) -> ScimResult<bool> {
        self.manager.delete(id).await
    }
}
