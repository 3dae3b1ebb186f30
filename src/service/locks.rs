//! Per-resource locking.
//!
//! Every read-modify-write against one resource id runs while holding that id's lock, so
//! two patches of the same resource never interleave. Different ids never contend.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// A set of async mutexes keyed by resource id, created on demand.
#[derive(Debug, Clone, Default)]
pub struct KeyedLocks {
    locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `id`. Access is released when the guard drops.
    pub async fn lock(&self, id: &str) -> OwnedMutexGuard<()> {
        let entry = {
            let mut locks = self.locks.lock().await;
            // entries nobody holds or waits on can go
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks.entry(id.to_string()).or_default().clone()
        };
        entry.lock_owned().await
    }

    /// Number of ids currently tracked.
    pub async fn tracked(&self) -> usize {
        self.locks.lock().await.len()
    }
}
