//! Shared helpers for the integration test suites.

#![allow(dead_code)]

use scim_directory::resource::{Group, User};
use scim_directory::service::Directory;
use scim_directory::storage::InMemoryStorage;
use scim_directory::{PatchOperation, PatchRequest, ServiceConfig};

/// Route `log` output through the test harness. Safe to call from every test.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A fresh directory over in-memory storage with the default configuration.
pub fn directory() -> Directory<InMemoryStorage> {
    init_logging();
    Directory::new(InMemoryStorage::new(), ServiceConfig::default())
}

pub fn directory_with(config: ServiceConfig) -> Directory<InMemoryStorage> {
    init_logging();
    Directory::new(InMemoryStorage::new(), config)
}

pub fn patch(operations: Vec<PatchOperation>) -> PatchRequest {
    PatchRequest::new(operations)
}

pub fn user_id(user: &User) -> &str {
    user.id.as_deref().expect("stored users have an id")
}

pub fn group_id(group: &Group) -> &str {
    group.id.as_deref().expect("stored groups have an id")
}

pub fn member_values(group: &Group) -> Vec<&str> {
    group.members.iter().map(|m| m.value.as_str()).collect()
}
