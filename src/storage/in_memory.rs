//! In-memory storage implementation for directory resources.
//!
//! A thread-safe implementation of [`StorageProvider`] using a `HashMap` of rows plus a
//! `BTreeMap` uniqueness index per resource type, guarded by one async `RwLock`. Every
//! write takes the write lock for its whole check-then-write sequence, so the uniqueness
//! index can never be raced and readers only ever see committed records.
//!
//! # Performance Characteristics
//!
//! * INSERT/UPDATE/DELETE/SELECT BY ID: O(log n)
//! * SELECT BY UNIQUE KEY: O(log n) through the index
//! * SELECT ALL with pagination: O(offset + limit), already ordered by the index
//!
//! # Example Usage
//!
//! ```rust
//! use scim_directory::storage::{InMemoryStorage, StorageKey, StorageProvider, StoredRecord};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let storage = InMemoryStorage::new();
//! let users = StorageKey::prefix("User");
//!
//! storage
//!     .insert(users.clone(), StoredRecord::new("u2", "bob", json!({"userName": "bob"})))
//!     .await?;
//! storage
//!     .insert(users.clone(), StoredRecord::new("u1", "alice", json!({"userName": "alice"})))
//!     .await?;
//!
//! let page = storage.select_all(users, 10, 0).await?;
//! assert_eq!(page.total, 2);
//! assert_eq!(page.records[0].unique_key, "alice");
//! # Ok(())
//! # }
//! ```

use crate::storage::{
    RecordPage, StorageError, StorageKey, StoragePrefix, StorageProvider, StoredRecord,
};
use log::trace;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Table {
    rows: HashMap<String, StoredRecord>,
    // unique_key -> id, doubles as the listing order
    index: BTreeMap<String, String>,
}

/// Thread-safe in-memory storage.
///
/// Cloning is cheap and every clone shares the same data.
#[derive(Clone, Default)]
pub struct InMemoryStorage {
    // resource_type -> table
    data: Arc<RwLock<HashMap<String, Table>>>,
}

impl InMemoryStorage {
    /// Create a new empty in-memory storage instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get storage statistics for debugging and monitoring.
    pub async fn stats(&self) -> InMemoryStorageStats {
        let data_guard = self.data.read().await;
        let mut resource_type_count = 0;
        let mut total_resources = 0;

        for table in data_guard.values() {
            if !table.rows.is_empty() {
                resource_type_count += 1;
                total_resources += table.rows.len();
            }
        }

        InMemoryStorageStats {
            resource_type_count,
            total_resources,
        }
    }
}

impl StorageProvider for InMemoryStorage {
    async fn insert(
        &self,
        prefix: StoragePrefix,
        record: StoredRecord,
    ) -> Result<StoredRecord, StorageError> {
        let mut data_guard = self.data.write().await;
        let table = data_guard
            .entry(prefix.resource_type().to_string())
            .or_default();

        if table.rows.contains_key(&record.id) {
            return Err(StorageError::duplicate_id(
                prefix.resource_type(),
                record.id.clone(),
            ));
        }
        if let Some(existing_id) = table.index.get(&record.unique_key) {
            return Err(StorageError::unique_violation(
                prefix.resource_type(),
                record.unique_key.clone(),
                existing_id.clone(),
            ));
        }

        trace!("Inserting {}/{}", prefix, record.id);
        table
            .index
            .insert(record.unique_key.clone(), record.id.clone());
        table.rows.insert(record.id.clone(), record.clone());

        Ok(record)
    }

    async fn update(
        &self,
        key: StorageKey,
        unique_key: String,
        data: Value,
    ) -> Result<Option<StoredRecord>, StorageError> {
        let mut data_guard = self.data.write().await;
        let Some(table) = data_guard.get_mut(key.resource_type()) else {
            return Ok(None);
        };

        let Some(previous_key) = table
            .rows
            .get(key.resource_id())
            .map(|row| row.unique_key.clone())
        else {
            return Ok(None);
        };

        if let Some(owner) = table.index.get(&unique_key) {
            if owner != key.resource_id() {
                return Err(StorageError::unique_violation(
                    key.resource_type(),
                    unique_key,
                    owner.clone(),
                ));
            }
        }

        trace!("Updating {}", key);
        table.index.remove(&previous_key);
        table
            .index
            .insert(unique_key.clone(), key.resource_id().to_string());

        let record = StoredRecord::new(key.resource_id(), unique_key, data);
        table
            .rows
            .insert(key.resource_id().to_string(), record.clone());

        Ok(Some(record))
    }

    async fn delete(&self, key: StorageKey) -> Result<usize, StorageError> {
        let mut data_guard = self.data.write().await;
        let Some(table) = data_guard.get_mut(key.resource_type()) else {
            return Ok(0);
        };

        match table.rows.remove(key.resource_id()) {
            Some(row) => {
                table.index.remove(&row.unique_key);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn select_all(
        &self,
        prefix: StoragePrefix,
        limit: usize,
        offset: usize,
    ) -> Result<RecordPage, StorageError> {
        let data_guard = self.data.read().await;
        let Some(table) = data_guard.get(prefix.resource_type()) else {
            return Ok(RecordPage::default());
        };

        let records = table
            .index
            .values()
            .skip(offset)
            .take(limit)
            .filter_map(|id| table.rows.get(id).cloned())
            .collect();

        Ok(RecordPage {
            records,
            total: table.rows.len(),
        })
    }

    async fn select_by_unique_key(
        &self,
        prefix: StoragePrefix,
        value: &str,
    ) -> Result<Option<StoredRecord>, StorageError> {
        let data_guard = self.data.read().await;

        Ok(data_guard.get(prefix.resource_type()).and_then(|table| {
            table
                .index
                .get(value)
                .and_then(|id| table.rows.get(id))
                .cloned()
        }))
    }

    async fn select_by_id(&self, key: StorageKey) -> Result<Option<StoredRecord>, StorageError> {
        let data_guard = self.data.read().await;

        Ok(data_guard
            .get(key.resource_type())
            .and_then(|table| table.rows.get(key.resource_id()))
            .cloned())
    }

    async fn clear(&self, prefix: StoragePrefix) -> Result<usize, StorageError> {
        let mut data_guard = self.data.write().await;
        Ok(data_guard
            .remove(prefix.resource_type())
            .map(|table| table.rows.len())
            .unwrap_or(0))
    }
}

/// Statistics about the current state of in-memory storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InMemoryStorageStats {
    /// Number of resource types holding at least one record
    pub resource_type_count: usize,
    /// Total number of individual records
    pub total_resources: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(id: &str, unique_key: &str) -> StoredRecord {
        StoredRecord::new(id, unique_key, json!({ "id": id, "key": unique_key }))
    }

    #[tokio::test]
    async fn test_insert_and_select() {
        let storage = InMemoryStorage::new();
        let users = StorageKey::prefix("User");

        storage.insert(users.clone(), record("1", "alice")).await.unwrap();

        let by_id = storage.select_by_id(users.key("1")).await.unwrap();
        assert_eq!(by_id, Some(record("1", "alice")));

        let by_key = storage
            .select_by_unique_key(users.clone(), "alice")
            .await
            .unwrap();
        assert_eq!(by_key.map(|r| r.id), Some("1".to_string()));

        assert!(
            storage
                .select_by_unique_key(users, "Alice")
                .await
                .unwrap()
                .is_none(),
            "uniqueness lookups are case-sensitive"
        );
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicates() {
        let storage = InMemoryStorage::new();
        let users = StorageKey::prefix("User");
        storage.insert(users.clone(), record("1", "alice")).await.unwrap();

        let same_key = storage.insert(users.clone(), record("2", "alice")).await;
        assert!(matches!(same_key, Err(StorageError::UniqueViolation { .. })));

        let same_id = storage.insert(users.clone(), record("1", "bob")).await;
        assert!(matches!(same_id, Err(StorageError::DuplicateId { .. })));

        assert_eq!(storage.select_all(users, 10, 0).await.unwrap().total, 1);
    }

    #[tokio::test]
    async fn test_same_key_in_different_types() {
        let storage = InMemoryStorage::new();
        storage
            .insert(StorageKey::prefix("User"), record("1", "eng"))
            .await
            .unwrap();
        storage
            .insert(StorageKey::prefix("Group"), record("2", "eng"))
            .await
            .unwrap();

        let stats = storage.stats().await;
        assert_eq!(stats.resource_type_count, 2);
        assert_eq!(stats.total_resources, 2);
    }

    #[tokio::test]
    async fn test_update_moves_index() {
        let storage = InMemoryStorage::new();
        let users = StorageKey::prefix("User");
        storage.insert(users.clone(), record("1", "alice")).await.unwrap();
        storage.insert(users.clone(), record("2", "bob")).await.unwrap();

        let updated = storage
            .update(users.key("1"), "carol".to_string(), json!({"renamed": true}))
            .await
            .unwrap();
        assert_eq!(updated.map(|r| r.unique_key), Some("carol".to_string()));
        assert!(
            storage
                .select_by_unique_key(users.clone(), "alice")
                .await
                .unwrap()
                .is_none()
        );

        let clash = storage
            .update(users.key("1"), "bob".to_string(), json!({}))
            .await;
        assert!(matches!(clash, Err(StorageError::UniqueViolation { .. })));

        let keep_own_key = storage
            .update(users.key("2"), "bob".to_string(), json!({"touched": true}))
            .await
            .unwrap();
        assert!(keep_own_key.is_some());

        let missing = storage
            .update(users.key("404"), "dave".to_string(), json!({}))
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_delete() {
        let storage = InMemoryStorage::new();
        let groups = StorageKey::prefix("Group");
        storage.insert(groups.clone(), record("g", "eng")).await.unwrap();

        assert_eq!(storage.delete(groups.key("g")).await.unwrap(), 1);
        assert_eq!(storage.delete(groups.key("g")).await.unwrap(), 0);

        // the freed key can be reused
        storage.insert(groups, record("h", "eng")).await.unwrap();
    }

    #[tokio::test]
    async fn test_select_all_is_ordered_and_paged() {
        let storage = InMemoryStorage::new();
        let users = StorageKey::prefix("User");
        for (id, name) in [("3", "carol"), ("1", "alice"), ("4", "dave"), ("2", "bob")] {
            storage.insert(users.clone(), record(id, name)).await.unwrap();
        }

        let page = storage.select_all(users.clone(), 2, 1).await.unwrap();
        assert_eq!(page.total, 4);
        let names: Vec<_> = page.records.iter().map(|r| r.unique_key.as_str()).collect();
        assert_eq!(names, vec!["bob", "carol"]);

        let past_end = storage.select_all(users.clone(), 10, 10).await.unwrap();
        assert!(past_end.records.is_empty());
        assert_eq!(past_end.total, 4);

        let zero = storage.select_all(users, 0, 0).await.unwrap();
        assert!(zero.records.is_empty());
    }

    #[tokio::test]
    async fn test_clear() {
        let storage = InMemoryStorage::new();
        let users = StorageKey::prefix("User");
        storage.insert(users.clone(), record("1", "alice")).await.unwrap();
        storage.insert(users.clone(), record("2", "bob")).await.unwrap();

        assert_eq!(storage.clear(users.clone()).await.unwrap(), 2);
        assert_eq!(storage.select_all(users, 10, 0).await.unwrap().total, 0);
    }
}
