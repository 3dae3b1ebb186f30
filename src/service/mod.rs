//! Resource services.
//!
//! [`UserService`] and [`GroupService`] are the single source of truth for their resource
//! kind: every mutating call writes through to the storage provider before returning.
//! Both are thin layers over the generic [`ResourceManager`]; the Group service adds member
//! enrichment against the user directory. [`Directory`] wires the two to one storage.
//!
//! # Example Usage
//!
//! ```rust
//! use scim_directory::config::ServiceConfig;
//! use scim_directory::patch::{PatchOperation, PatchRequest};
//! use scim_directory::resource::{Group, User};
//! use scim_directory::service::{Directory, ResourceService};
//! use scim_directory::storage::InMemoryStorage;
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let directory = Directory::new(InMemoryStorage::new(), ServiceConfig::default());
//!
//! let group = directory.groups().create(Group::new("Eng")).await?;
//! let alice = directory.users().create(User::new("alice@example.com")).await?;
//!
//! let add = PatchOperation::add(Some("members"), json!({"value": alice.id}));
//! let group = directory
//!     .groups()
//!     .patch(group.id.as_deref().unwrap_or_default(), &PatchRequest::new(vec![add]))
//!     .await?;
//!
//! assert_eq!(group.members[0].display.as_deref(), Some("alice@example.com"));
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod directory;
pub mod group;
pub mod locks;
pub mod user;

pub use self::core::ResourceManager;
pub use directory::Directory;
pub use group::GroupService;
pub use locks::KeyedLocks;
pub use user::UserService;

use crate::error::ScimResult;
use crate::patch::PatchRequest;
use crate::resource::{ListQuery, ListResponse, ScimResource};
use std::future::Future;

/// The operations offered for one resource kind.
///
/// Malformed ids behave like unknown ids: `get_by_id` yields `None`, `replace` and `patch`
/// fail with [`ScimError::ResourceNotFound`](crate::error::ScimError::ResourceNotFound),
/// `delete` yields `false`.
pub trait ResourceService: Send + Sync {
    type Resource: ScimResource;

    fn list(
        &self,
        query: ListQuery,
    ) -> impl Future<Output = ScimResult<ListResponse<Self::Resource>>> + Send;

    fn get_by_id(
        &self,
        id: &str,
    ) -> impl Future<Output = ScimResult<Option<Self::Resource>>> + Send;

    /// Fails with `Conflict` when the uniqueness key is taken.
    fn create(
        &self,
        resource: Self::Resource,
    ) -> impl Future<Output = ScimResult<Self::Resource>> + Send;

    fn replace(
        &self,
        id: &str,
        resource: Self::Resource,
    ) -> impl Future<Output = ScimResult<Self::Resource>> + Send;

    fn patch(
        &self,
        id: &str,
        request: &PatchRequest,
    ) -> impl Future<Output = ScimResult<Self::Resource>> + Send;

    fn delete(&self, id: &str) -> impl Future<Output = ScimResult<bool>> + Send;
}
