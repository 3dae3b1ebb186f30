//! Storage abstraction layer for directory resources.
//!
//! The `StorageProvider` trait is the repository contract the resource services are
//! programmed against. A backend persists opaque records keyed by identifier and keeps a
//! secondary uniqueness index on one designated field per resource type (`userName` for
//! Users, `displayName` for Groups).
//!
//! The storage layer is responsible for:
//! - Atomic insert/update/delete of single records
//! - Enforcing the uniqueness index inside the same critical section as the write
//! - Ordered, paginated listing by the uniqueness key
//!
//! The storage layer is NOT responsible for:
//! - SCIM metadata (timestamps, locations)
//! - (De)serialization of the typed resource documents
//! - Member enrichment or PATCH interpretation
//!
//! # Example Usage
//!
//! ```rust
//! use scim_directory::storage::{InMemoryStorage, StorageKey, StorageProvider, StoredRecord};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let storage = InMemoryStorage::new();
//!
//! let record = StoredRecord::new("123", "john.doe", json!({"userName": "john.doe"}));
//! storage.insert(StorageKey::prefix("User"), record).await?;
//!
//! let found = storage.select_by_unique_key(StorageKey::prefix("User"), "john.doe").await?;
//! assert_eq!(found.map(|r| r.id), Some("123".to_string()));
//!
//! let removed = storage.delete(StorageKey::new("User", "123")).await?;
//! assert_eq!(removed, 1);
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod in_memory;

pub use errors::StorageError;
pub use in_memory::{InMemoryStorage, InMemoryStorageStats};

use serde_json::Value;
use std::fmt;
use std::future::Future;

/// A key identifying one record: `resource_type` → `resource_id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey {
    resource_type: String,
    resource_id: String,
}

impl StorageKey {
    /// Create a new storage key.
    pub fn new(resource_type: impl Into<String>, resource_id: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            resource_id: resource_id.into(),
        }
    }

    /// Get the resource type.
    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// Get the resource ID.
    pub fn resource_id(&self) -> &str {
        &self.resource_id
    }

    /// Create a prefix addressing every record of one resource type.
    pub fn prefix(resource_type: impl Into<String>) -> StoragePrefix {
        StoragePrefix {
            resource_type: resource_type.into(),
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.resource_type, self.resource_id)
    }
}

/// A prefix for querying all records of one resource type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePrefix {
    resource_type: String,
}

impl StoragePrefix {
    /// Get the resource type.
    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// Build the key of one record under this prefix.
    pub fn key(&self, resource_id: impl Into<String>) -> StorageKey {
        StorageKey::new(self.resource_type.clone(), resource_id)
    }
}

impl fmt::Display for StoragePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.resource_type)
    }
}

/// One persisted row.
///
/// `unique_key` is the value of the indexed field and also the natural sort key used by
/// [`StorageProvider::select_all`]. `data` is an opaque document owned by the service layer.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub id: String,
    pub unique_key: String,
    pub data: Value,
}

impl StoredRecord {
    pub fn new(id: impl Into<String>, unique_key: impl Into<String>, data: Value) -> Self {
        Self {
            id: id.into(),
            unique_key: unique_key.into(),
            data,
        }
    }
}

/// One page of records plus the total number of records under the prefix.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordPage {
    pub records: Vec<StoredRecord>,
    pub total: usize,
}

/// Repository contract for resource persistence.
///
/// Every method is a single atomic step: a reader never observes a half-applied write.
/// Implementations must check the uniqueness index and apply the write inside one
/// critical section so that two concurrent inserts of the same key cannot both succeed.
pub trait StorageProvider: Send + Sync {
    /// Insert a new record.
    ///
    /// Fails with [`StorageError::DuplicateId`] when the id is taken and with
    /// [`StorageError::UniqueViolation`] when another record holds `unique_key`.
    fn insert(
        &self,
        prefix: StoragePrefix,
        record: StoredRecord,
    ) -> impl Future<Output = Result<StoredRecord, StorageError>> + Send;

    /// Overwrite the unique key and document of an existing record.
    ///
    /// Returns `None` when no record exists under `key`. Fails with
    /// [`StorageError::UniqueViolation`] when `unique_key` belongs to a different record.
    fn update(
        &self,
        key: StorageKey,
        unique_key: String,
        data: Value,
    ) -> impl Future<Output = Result<Option<StoredRecord>, StorageError>> + Send;

    /// Delete a record, returning the number of rows removed (0 or 1).
    fn delete(&self, key: StorageKey) -> impl Future<Output = Result<usize, StorageError>> + Send;

    /// List records ordered by `unique_key` ascending.
    ///
    /// # Behavior
    /// - `offset` is 0-based; an offset past the end yields an empty page
    /// - `limit == 0` yields an empty page
    /// - `total` always reports the full count under the prefix
    fn select_all(
        &self,
        prefix: StoragePrefix,
        limit: usize,
        offset: usize,
    ) -> impl Future<Output = Result<RecordPage, StorageError>> + Send;

    /// Exact, case-sensitive lookup through the uniqueness index.
    fn select_by_unique_key(
        &self,
        prefix: StoragePrefix,
        value: &str,
    ) -> impl Future<Output = Result<Option<StoredRecord>, StorageError>> + Send;

    /// Lookup by primary identifier.
    fn select_by_id(
        &self,
        key: StorageKey,
    ) -> impl Future<Output = Result<Option<StoredRecord>, StorageError>> + Send;

    /// Remove every record under the prefix, returning how many were removed.
    fn clear(
        &self,
        prefix: StoragePrefix,
    ) -> impl Future<Output = Result<usize, StorageError>> + Send;
}
