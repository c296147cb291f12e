//! Per-key async mutexes.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

/// A table of async mutexes, one per key, created on first use.
///
/// Holding the returned guard serializes every other `lock` call for the same
/// key. Different keys never contend.
#[derive(Debug, Default)]
pub struct KeyedLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl KeyedLocks {
    /// Empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for `key`, waiting if another task holds it.
    pub async fn lock(&self, key: &str) -> OwnedMutexGuard<()> {
        let mutex = {
            let mut table = self.locks.lock().await;
            Arc::clone(table.entry(key.to_string()).or_default())
        };
        mutex.lock_owned().await
    }
}
