//! Cache backend seam and the in-process implementation.
//!
//! The backend is the external key-value collaborator: the tiered store
//! owns all key naming and TTL decisions, the backend only stores bytes
//! with an expiry. Implementations must be safe for concurrent access.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use vicinity_core::CacheError;

/// Pluggable key-value backend.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Get the raw bytes stored under `key`, or `None` on a miss.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Store bytes under `key` with the given expiry.
    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError>;

    /// Remove every key starting with `prefix`; returns the number removed.
    async fn delete_prefix(&self, prefix: &str) -> Result<u64, CacheError>;

    /// Count live keys starting with `prefix`.
    async fn count_prefix(&self, prefix: &str) -> Result<u64, CacheError>;

    /// Liveness probe.
    async fn ping(&self) -> Result<(), CacheError>;
}

// ============================================================================
// IN-MEMORY BACKEND
// ============================================================================

struct StoredEntry {
    bytes: Vec<u8>,
    expires_at: Instant,
}

impl StoredEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at <= now
    }
}

/// In-process backend over a guarded hash map.
///
/// Expired entries are dropped lazily: on the read that finds them and
/// during prefix scans. Suitable for single-node deployments and tests;
/// a shared remote store plugs in behind the same trait.
#[derive(Default)]
pub struct MemoryBackend {
    entries: RwLock<HashMap<String, StoredEntry>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> CacheError {
        CacheError::Unavailable {
            reason: "backend lock poisoned".to_string(),
        }
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let now = Instant::now();
        {
            let entries = self.entries.read().map_err(|_| Self::poisoned())?;
            match entries.get(key) {
                Some(entry) if !entry.is_expired(now) => return Ok(Some(entry.bytes.clone())),
                Some(_) => {} // expired, fall through to remove
                None => return Ok(None),
            }
        }
        let mut entries = self.entries.write().map_err(|_| Self::poisoned())?;
        if entries.get(key).map(|e| e.is_expired(now)).unwrap_or(false) {
            entries.remove(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError> {
        let mut entries = self.entries.write().map_err(|_| Self::poisoned())?;
        entries.insert(
            key.to_string(),
            StoredEntry {
                bytes: value.to_vec(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn delete_prefix(&self, prefix: &str) -> Result<u64, CacheError> {
        let mut entries = self.entries.write().map_err(|_| Self::poisoned())?;
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        Ok((before - entries.len()) as u64)
    }

    async fn count_prefix(&self, prefix: &str) -> Result<u64, CacheError> {
        let now = Instant::now();
        let entries = self.entries.read().map_err(|_| Self::poisoned())?;
        Ok(entries
            .iter()
            .filter(|(key, entry)| key.starts_with(prefix) && !entry.is_expired(now))
            .count() as u64)
    }

    async fn ping(&self) -> Result<(), CacheError> {
        self.entries.read().map_err(|_| Self::poisoned())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_then_get_round_trips() -> Result<(), CacheError> {
        let backend = MemoryBackend::new();
        backend
            .set("search:abc", b"payload", Duration::from_secs(60))
            .await?;
        assert_eq!(backend.get("search:abc").await?, Some(b"payload".to_vec()));
        Ok(())
    }

    #[tokio::test]
    async fn test_get_misses_after_ttl_elapses() -> Result<(), CacheError> {
        let backend = MemoryBackend::new();
        backend
            .set("search:abc", b"payload", Duration::from_millis(30))
            .await?;
        std::thread::sleep(Duration::from_millis(60));
        assert_eq!(backend.get("search:abc").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_prefix_only_touches_matching_class() -> Result<(), CacheError> {
        let backend = MemoryBackend::new();
        backend.set("search:a", b"1", Duration::from_secs(60)).await?;
        backend.set("search:b", b"2", Duration::from_secs(60)).await?;
        backend.set("intel:a", b"3", Duration::from_secs(60)).await?;

        let deleted = backend.delete_prefix("search:").await?;
        assert_eq!(deleted, 2);
        assert_eq!(backend.get("intel:a").await?, Some(b"3".to_vec()));
        Ok(())
    }

    #[tokio::test]
    async fn test_count_prefix_excludes_expired_entries() -> Result<(), CacheError> {
        let backend = MemoryBackend::new();
        backend.set("intel:a", b"1", Duration::from_secs(60)).await?;
        backend.set("intel:b", b"2", Duration::from_millis(20)).await?;
        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(backend.count_prefix("intel:").await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_ping_succeeds() {
        assert!(MemoryBackend::new().ping().await.is_ok());
    }
}
