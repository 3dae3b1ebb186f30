//! Generic resource service core.
//!
//! [`ResourceManager`] implements the storage-facing half of every service operation for
//! any [`ScimResource`]: id assignment, metadata stamping, uniqueness enforcement,
//! pagination and the locked read-modify-write cycle used by replace and patch. The
//! User and Group services add only their kind-specific behaviour on top.

use crate::config::ServiceConfig;
use crate::error::{ScimError, ScimResult};
use crate::patch::{PatchOperation, Patchable, apply_all};
use crate::resolver::ReferenceResolver;
use crate::resource::meta::{self, Meta};
use crate::resource::{ListQuery, ListResponse, ScimResource, normalize_id};
use crate::service::locks::KeyedLocks;
use crate::storage::{StorageError, StorageKey, StoragePrefix, StorageProvider, StoredRecord};
use log::{debug, info, trace, warn};
use std::marker::PhantomData;
use std::sync::Arc;

/// Storage-backed lifecycle of one resource kind.
pub struct ResourceManager<T, S> {
    storage: S,
    config: Arc<ServiceConfig>,
    locks: KeyedLocks,
    _kind: PhantomData<fn() -> T>,
}

impl<T, S: Clone> Clone for ResourceManager<T, S> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            config: Arc::clone(&self.config),
            locks: self.locks.clone(),
            _kind: PhantomData,
        }
    }
}

impl<T: ScimResource, S: StorageProvider> ResourceManager<T, S> {
    pub fn new(storage: S, config: Arc<ServiceConfig>) -> Self {
        Self {
            storage,
            config,
            locks: KeyedLocks::new(),
            _kind: PhantomData,
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    fn prefix(&self) -> StoragePrefix {
        StorageKey::prefix(T::KIND.as_str())
    }

    fn decode(&self, record: StoredRecord) -> ScimResult<T> {
        serde_json::from_value(record.data).map_err(|e| {
            ScimError::Storage(StorageError::serialization(format!(
                "stored {} {} does not decode: {}",
                T::KIND,
                record.id,
                e
            )))
        })
    }

    fn classify(&self, error: StorageError) -> ScimError {
        match error {
            StorageError::UniqueViolation { value, .. } => {
                ScimError::conflict(T::KIND.as_str(), T::KIND.unique_attribute(), value)
            }
            StorageError::DuplicateId { id, .. } => ScimError::conflict(T::KIND.as_str(), "id", id),
            other => ScimError::Storage(other),
        }
    }

    fn validate(&self, resource: &T) -> ScimResult<()> {
        if resource.unique_key().trim().is_empty() {
            return Err(ScimError::invalid_request(format!(
                "{} must not be empty",
                T::KIND.unique_attribute()
            )));
        }
        Ok(())
    }

    fn location(&self, id: &str) -> String {
        self.config.location(T::KIND.endpoint(), id)
    }

    /// One page of resources ordered by the uniqueness key.
    pub async fn list(&self, query: ListQuery) -> ScimResult<ListResponse<T>> {
        let start_index = query.start_index();
        let count = query.count(&self.config);
        debug!(
            "Listing {} resources (startIndex={}, count={})",
            T::KIND,
            start_index,
            count
        );

        let page = self
            .storage
            .select_all(self.prefix(), count, start_index - 1)
            .await?;

        let resources = page
            .records
            .into_iter()
            .map(|record| self.decode(record))
            .collect::<ScimResult<Vec<T>>>()?;

        Ok(ListResponse::new(resources, page.total, start_index))
    }

    /// Fetch by id. Malformed ids are reported as absent.
    pub async fn get(&self, id: &str) -> ScimResult<Option<T>> {
        let Some(id) = normalize_id(id) else {
            warn!("Invalid {} id '{}', treating as not found", T::KIND, id);
            return Ok(None);
        };
        debug!("Getting {} {}", T::KIND, id);
        self.load(&id).await
    }

    async fn load(&self, id: &str) -> ScimResult<Option<T>> {
        match self.storage.select_by_id(self.prefix().key(id)).await? {
            Some(record) => self.decode(record).map(Some),
            None => Ok(None),
        }
    }

    /// Store a new resource with a server-assigned id and fresh metadata.
    ///
    /// A client-supplied id is kept when it is a UUID.
    pub async fn create(&self, mut resource: T) -> ScimResult<T> {
        self.validate(&resource)?;

        let id = match resource.id() {
            Some(raw) => normalize_id(raw).unwrap_or_else(|| {
                warn!("Replacing non-UUID client id '{}' for new {}", raw, T::KIND);
                uuid::Uuid::new_v4().to_string()
            }),
            None => uuid::Uuid::new_v4().to_string(),
        };
        info!("Creating {} '{}' as {}", T::KIND, resource.unique_key(), id);

        if self
            .storage
            .select_by_unique_key(self.prefix(), resource.unique_key())
            .await?
            .is_some()
        {
            return Err(ScimError::conflict(
                T::KIND.as_str(),
                T::KIND.unique_attribute(),
                resource.unique_key(),
            ));
        }

        let _guard = self.locks.lock(&id).await;
        resource.set_meta(Meta::for_creation(T::KIND, self.location(&id), meta::now()));
        resource.set_id(id.clone());

        let data = serde_json::to_value(&resource)?;
        trace!("Create data: {}", data);
        self.storage
            .insert(
                self.prefix(),
                StoredRecord::new(id, resource.unique_key(), data),
            )
            .await
            .map_err(|e| self.classify(e))?;

        Ok(resource)
    }

    /// Replace the whole document, keeping the id and creation time.
    pub async fn replace(&self, id: &str, mut resource: T) -> ScimResult<T> {
        self.validate(&resource)?;
        let id = self.existing_id(id)?;
        info!("Replacing {} {}", T::KIND, id);

        let _guard = self.locks.lock(&id).await;
        let current = self
            .load(&id)
            .await?
            .ok_or_else(|| ScimError::resource_not_found(T::KIND.as_str(), &id))?;

        resource.set_id(id.clone());
        resource.set_meta(self.touched_meta(&current, &id));
        self.write(&id, resource).await
    }

    /// Fold `operations` over the stored document and persist the result.
    ///
    /// `meta.lastModified` moves once for the whole request.
    pub async fn patch<R>(
        &self,
        id: &str,
        operations: &[PatchOperation],
        resolver: &R,
    ) -> ScimResult<T>
    where
        T: Patchable,
        R: ReferenceResolver,
    {
        let id = self.existing_id(id)?;
        info!(
            "Patching {} {} with {} operations",
            T::KIND,
            id,
            operations.len()
        );

        let _guard = self.locks.lock(&id).await;
        let current = self
            .load(&id)
            .await?
            .ok_or_else(|| ScimError::resource_not_found(T::KIND.as_str(), &id))?;

        let meta = self.touched_meta(&current, &id);
        let mut patched = apply_all(current, operations, resolver).await;
        self.validate(&patched)?;

        patched.set_id(id.clone());
        patched.set_meta(meta);
        self.write(&id, patched).await
    }

    /// Delete by id, returning whether a resource was removed.
    pub async fn delete(&self, id: &str) -> ScimResult<bool> {
        let Some(id) = normalize_id(id) else {
            warn!("Invalid {} id '{}', nothing to delete", T::KIND, id);
            return Ok(false);
        };
        info!("Deleting {} {}", T::KIND, id);

        let _guard = self.locks.lock(&id).await;
        let removed = self.storage.delete(self.prefix().key(&id)).await?;
        Ok(removed > 0)
    }

    /// Remove every resource of this kind.
    pub async fn clear(&self) -> ScimResult<usize> {
        let removed = self.storage.clear(self.prefix()).await?;
        info!("Cleared {} {} resources", removed, T::KIND);
        Ok(removed)
    }

    fn existing_id(&self, raw: &str) -> ScimResult<String> {
        normalize_id(raw).ok_or_else(|| {
            warn!("Invalid {} id '{}', treating as not found", T::KIND, raw);
            ScimError::resource_not_found(T::KIND.as_str(), raw)
        })
    }

    fn touched_meta(&self, current: &T, id: &str) -> Meta {
        let now = meta::now();
        match current.meta() {
            Some(existing) => existing.touched(now),
            None => Meta::for_creation(T::KIND, self.location(id), now),
        }
    }

    async fn write(&self, id: &str, resource: T) -> ScimResult<T> {
        let data = serde_json::to_value(&resource)?;
        trace!("Update data: {}", data);

        self.storage
            .update(
                self.prefix().key(id),
                resource.unique_key().to_string(),
                data,
            )
            .await
            .map_err(|e| self.classify(e))?
            .ok_or_else(|| ScimError::resource_not_found(T::KIND.as_str(), id))?;

        Ok(resource)
    }
}
