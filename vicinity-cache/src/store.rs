//! Tiered cache-aside store.
//!
//! `TieredCache` wraps a backend with class-namespaced keys, per-class
//! TTLs, and JSON value codec. Backend failures degrade: reads become
//! misses, writes are skipped, both with a logged warning carrying the key
//! so degradation stays diagnosable.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use vicinity_core::CacheError;

use crate::backend::CacheBackend;
use crate::keys::TtlClass;

/// Per-class key counts reported by `stats()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub search_keys: u64,
    pub intel_keys: u64,
    pub details_keys: u64,
    pub popular_keys: u64,
    pub trends_keys: u64,
    pub total_keys: u64,
}

/// Cache-aside store over a pluggable backend.
#[derive(Clone)]
pub struct TieredCache {
    backend: Arc<dyn CacheBackend>,
}

impl TieredCache {
    pub fn new(backend: Arc<dyn CacheBackend>) -> Self {
        Self { backend }
    }

    /// Full namespaced key for a class/key pair.
    pub fn namespaced(class: TtlClass, key: &str) -> String {
        format!("{}{}", class.prefix(), key)
    }

    /// Read and decode a cached value. Any backend or decode failure is
    /// logged and reported as a miss.
    pub async fn get_json<T: DeserializeOwned>(&self, class: TtlClass, key: &str) -> Option<T> {
        let cache_key = Self::namespaced(class, key);
        let bytes = match self.backend.get(&cache_key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(err) => {
                tracing::warn!(key = %cache_key, error = %err, "Cache read failed, treating as miss");
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => {
                tracing::debug!(key = %cache_key, "Cache hit");
                Some(value)
            }
            Err(err) => {
                tracing::warn!(key = %cache_key, error = %err, "Cached payload failed to decode, treating as miss");
                None
            }
        }
    }

    /// Encode and write a value with the class TTL. Best-effort: failures
    /// are logged, never surfaced.
    pub async fn put_json<T: Serialize>(&self, class: TtlClass, key: &str, value: &T) {
        let cache_key = Self::namespaced(class, key);
        let bytes = match serde_json::to_vec(value) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(key = %cache_key, error = %err, "Cache payload failed to encode, skipping write");
                return;
            }
        };

        if let Err(err) = self.backend.set(&cache_key, &bytes, class.ttl()).await {
            tracing::warn!(key = %cache_key, error = %err, "Cache write failed, skipping");
        } else {
            tracing::debug!(key = %cache_key, ttl_secs = class.ttl().as_secs(), "Cached value");
        }
    }

    /// Remove every key starting with `prefix` (e.g. a class prefix).
    /// Backend failure is logged and reported as zero removals.
    pub async fn invalidate(&self, prefix: &str) -> u64 {
        match self.backend.delete_prefix(prefix).await {
            Ok(deleted) => {
                tracing::info!(prefix = %prefix, deleted, "Invalidated cache keys");
                deleted
            }
            Err(err) => {
                tracing::warn!(prefix = %prefix, error = %err, "Cache invalidation failed");
                0
            }
        }
    }

    /// Per-class key counts. Classes whose count cannot be read report
    /// zero rather than failing the whole stats call.
    pub async fn stats(&self) -> CacheStats {
        let mut stats = CacheStats::default();
        for class in TtlClass::all() {
            let count = self
                .backend
                .count_prefix(class.prefix())
                .await
                .unwrap_or_else(|err| {
                    tracing::warn!(class = class.prefix(), error = %err, "Cache stats probe failed");
                    0
                });
            match class {
                TtlClass::Search => stats.search_keys = count,
                TtlClass::Intel => stats.intel_keys = count,
                TtlClass::Details => stats.details_keys = count,
                TtlClass::Popular => stats.popular_keys = count,
                TtlClass::Trends => stats.trends_keys = count,
            }
            stats.total_keys += count;
        }
        stats
    }

    /// Backend liveness probe.
    pub async fn health_check(&self) -> Result<(), CacheError> {
        self.backend.ping().await
    }
}
