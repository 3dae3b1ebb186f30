//! SCIM 2.0 directory service core for Rust.
//!
//! Provides the resource service layer of a provisioning service exposing Users and
//! Groups: a typed PATCH engine, member enrichment against the user directory,
//! uniqueness enforcement, pagination and a pluggable storage contract. HTTP transport
//! is left to the caller; [`operation_handler`] is the transport-agnostic boundary.
//!
//! # Core Components
//!
//! - [`Directory`] - User and Group services over one storage
//! - [`StorageProvider`] - Repository contract, with [`InMemoryStorage`] as an adapter
//! - [`patch`] - PatchOp model, path expression parser and interpreter
//! - [`ScimOperationHandler`] - Maps requests and outcomes to SCIM statuses and bodies
//!
//! # Quick Start
//!
//! ```rust
//! use scim_directory::{Directory, InMemoryStorage, ServiceConfig};
//! use scim_directory::resource::User;
//! use scim_directory::service::ResourceService;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let directory = Directory::new(InMemoryStorage::new(), ServiceConfig::default());
//! let user = directory.users().create(User::new("bjensen")).await?;
//! assert!(user.id.is_some());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod operation_handler;
pub mod patch;
pub mod resolver;
pub mod resource;
pub mod service;
pub mod storage;

// Re-export commonly used types for convenience
pub use config::ServiceConfig;
pub use error::{ErrorResponse, ScimError, ScimResult, ScimStatus};
pub use operation_handler::{
    ScimOperationHandler, ScimOperationRequest, ScimOperationResponse, ScimOperationType,
};
pub use patch::{PatchOpKind, PatchOperation, PatchRequest};
pub use resource::{Group, ListQuery, ListResponse, Member, ResourceKind, User};
pub use service::{Directory, GroupService, ResourceService, UserService};
pub use storage::{InMemoryStorage, StorageProvider};
