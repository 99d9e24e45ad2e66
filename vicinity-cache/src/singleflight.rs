//! Per-key in-progress coordination for cache misses.
//!
//! Concurrent misses on the same key would each trigger the expensive
//! upstream path. `Singleflight` hands out an owned per-key guard; the
//! holder that wins the race performs the fetch while later holders block,
//! then re-check the cache and find the freshly written entry.
//!
//! Suppression is best-effort: a guard slot removed between a clone and a
//! lock costs at most one redundant fetch, never correctness.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Per-key in-flight fetch registry.
#[derive(Default)]
pub struct Singleflight {
    inflight: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

/// Exclusive per-key guard. Dropping it releases the key and removes the
/// slot once no other caller is waiting on it.
pub struct InflightGuard {
    key: String,
    inflight: Arc<DashMap<String, Arc<Mutex<()>>>>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Singleflight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the in-flight slot for `key`, waiting for any current
    /// holder to finish first.
    pub async fn acquire(&self, key: &str) -> InflightGuard {
        let slot = self
            .inflight
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let guard = slot.lock_owned().await;
        InflightGuard {
            key: key.to_string(),
            inflight: Arc::clone(&self.inflight),
            guard: Some(guard),
        }
    }

    /// Number of keys currently tracked.
    pub fn len(&self) -> usize {
        self.inflight.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inflight.is_empty()
    }
}

impl Drop for InflightGuard {
    fn drop(&mut self) {
        // Release the mutex before inspecting the slot, then drop the slot
        // only when nobody else holds a reference to it.
        self.guard.take();
        self.inflight
            .remove_if(&self.key, |_, slot| Arc::strong_count(slot) == 1);
    }
}
