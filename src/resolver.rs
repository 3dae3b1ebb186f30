//! Directory reference resolution and member enrichment.
//!
//! A group member only carries the id of what it points at. When the caller leaves
//! `display` out, the label is looked up through a [`ReferenceResolver`]. An unresolvable
//! reference is never an error: the member simply keeps no `display`.

use crate::resource::{Member, ResourceKind, normalize_id};
use crate::storage::{StorageKey, StorageProvider};
use log::{debug, warn};
use std::future::Future;

/// Resolves a member id to a display label.
pub trait ReferenceResolver: Send + Sync {
    /// Display label for `member_id`, or `None` when it does not resolve.
    fn resolve_display_label(
        &self,
        member_id: &str,
    ) -> impl Future<Output = Option<String>> + Send;
}

/// Resolver backed by the User repository: the label is the user's `userName`.
#[derive(Debug, Clone)]
pub struct DirectoryResolver<S> {
    storage: S,
}

impl<S: StorageProvider> DirectoryResolver<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }
}

impl<S: StorageProvider> ReferenceResolver for DirectoryResolver<S> {
    async fn resolve_display_label(&self, member_id: &str) -> Option<String> {
        let Some(id) = normalize_id(member_id) else {
            debug!("Member reference '{}' is not a user id", member_id);
            return None;
        };

        match self
            .storage
            .select_by_id(StorageKey::new(ResourceKind::User.as_str(), id))
            .await
        {
            Ok(record) => record.map(|r| r.unique_key),
            Err(e) => {
                warn!("Failed to resolve member '{}': {}", member_id, e);
                None
            }
        }
    }
}

/// Resolver that never resolves anything, for resources without references.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopResolver;

impl ReferenceResolver for NoopResolver {
    async fn resolve_display_label(&self, _member_id: &str) -> Option<String> {
        None
    }
}

/// Fill in `display` for members that lack one.
///
/// When `only` is given, just the members whose `value` is listed are considered.
pub async fn enrich_members<R: ReferenceResolver>(
    members: &mut [Member],
    only: Option<&[String]>,
    resolver: &R,
) {
    for member in members.iter_mut() {
        if member.display.is_some() {
            continue;
        }
        if let Some(only) = only {
            if !only.contains(&member.value) {
                continue;
            }
        }
        member.display = resolver.resolve_display_label(&member.value).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{InMemoryStorage, StoredRecord};
    use serde_json::json;

    const ALICE: &str = "6f1c2b1e-3f0a-4a57-9a77-1b2c3d4e5f60";

    async fn storage_with_alice() -> InMemoryStorage {
        let storage = InMemoryStorage::new();
        storage
            .insert(
                StorageKey::prefix("User"),
                StoredRecord::new(ALICE, "alice@example.com", json!({})),
            )
            .await
            .unwrap();
        storage
    }

    #[tokio::test]
    async fn test_resolves_user_name() {
        let resolver = DirectoryResolver::new(storage_with_alice().await);
        assert_eq!(
            resolver.resolve_display_label(ALICE).await.as_deref(),
            Some("alice@example.com")
        );
        assert_eq!(
            resolver
                .resolve_display_label(&ALICE.to_uppercase())
                .await
                .as_deref(),
            Some("alice@example.com")
        );
    }

    #[tokio::test]
    async fn test_unresolvable_references() {
        let resolver = DirectoryResolver::new(storage_with_alice().await);
        assert!(resolver.resolve_display_label("garbage").await.is_none());
        assert!(
            resolver
                .resolve_display_label("00000000-0000-0000-0000-000000000000")
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_enrich_members() {
        let resolver = DirectoryResolver::new(storage_with_alice().await);
        let mut members = vec![
            Member::new(ALICE),
            Member::new(ALICE).with_display("kept"),
            Member::new("dangling"),
        ];

        enrich_members(&mut members, None, &resolver).await;
        assert_eq!(members[0].display.as_deref(), Some("alice@example.com"));
        assert_eq!(members[1].display.as_deref(), Some("kept"));
        assert!(members[2].display.is_none());
    }

    #[tokio::test]
    async fn test_enrich_only_listed_members() {
        let resolver = DirectoryResolver::new(storage_with_alice().await);
        let mut members = vec![Member::new(ALICE)];

        enrich_members(&mut members, Some(&[]), &resolver).await;
        assert!(members[0].display.is_none());

        enrich_members(&mut members, Some(&[ALICE.to_string()]), &resolver).await;
        assert!(members[0].display.is_some());
    }
}
