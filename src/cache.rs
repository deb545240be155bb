//! TTL-bounded cache stores
//!
//! The orchestrator consumes the [`ForecastCache`] capability; the concrete
//! store is chosen at startup and passed in explicitly. Two implementations
//! ship here: an in-process [`MemoryCache`] and a disk-backed
//! [`PersistentCache`] on fjall. Both treat an expired entry exactly like an
//! absent one and purge lazily on read.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use fjall::Keyspace;
use serde::{Deserialize, Serialize};
use tokio::task;

/// One stored payload plus its expiry instant (Unix seconds).
#[derive(Serialize, Deserialize, Clone)]
struct StoredEntry {
    payload: String,
    expires_at: u64,
}

impl StoredEntry {
    fn is_fresh(&self, now: u64) -> bool {
        now < self.expires_at
    }
}

fn now_epoch_secs() -> Result<u64> {
    Ok(SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs())
}

fn expiry_epoch_secs(ttl: Duration) -> Result<u64> {
    let expires_at = SystemTime::now()
        .checked_add(ttl)
        .ok_or(anyhow!("TTL overflow"))?
        .duration_since(UNIX_EPOCH)?
        .as_secs();
    Ok(expires_at)
}

/// Generic get/set-with-expiry store keyed by string.
///
/// A `get` must never return a payload whose age exceeds the TTL it was
/// stored with; expired entries behave like misses.
#[async_trait]
pub trait ForecastCache: Send + Sync {
    /// Retrieve a payload if present and not expired.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store a payload with a time-to-live.
    async fn put(&self, key: &str, payload: String, ttl: Duration) -> Result<()>;

    /// Manually remove a key.
    async fn remove(&self, key: &str) -> Result<()>;
}

/// In-process cache backed by a `HashMap`.
///
/// The mutex guards only the map itself; it is never held across an await,
/// so concurrent requests on different keys contend only for nanoseconds.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, StoredEntry>>,
}

impl MemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn insert_raw(&self, key: &str, payload: String, expires_at: u64) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("cache mutex poisoned"))?;
        entries.insert(key.to_string(), StoredEntry { payload, expires_at });
        Ok(())
    }
}

#[async_trait]
impl ForecastCache for MemoryCache {
    #[tracing::instrument(name = "memory_cache_get", level = "debug", skip(self))]
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let now = now_epoch_secs()?;
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("cache mutex poisoned"))?;

        match entries.get(key) {
            Some(entry) if entry.is_fresh(now) => {
                tracing::debug!("key found and still fresh");
                Ok(Some(entry.payload.clone()))
            }
            Some(_) => {
                tracing::debug!("key found but expired");
                entries.remove(key);
                Ok(None)
            }
            None => {
                tracing::debug!("key not found");
                Ok(None)
            }
        }
    }

    #[tracing::instrument(name = "memory_cache_put", level = "debug", skip(self, payload))]
    async fn put(&self, key: &str, payload: String, ttl: Duration) -> Result<()> {
        let expires_at = expiry_epoch_secs(ttl)?;
        self.insert_raw(key, payload, expires_at)
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("cache mutex poisoned"))?;
        entries.remove(key);
        Ok(())
    }
}

/// Disk-backed cache on a fjall keyspace, entries postcard-encoded.
/// Blocking store operations run on the blocking pool.
pub struct PersistentCache {
    store: Keyspace,
}

fn get_from_store(store: Keyspace, key: Vec<u8>) -> Result<Option<Vec<u8>>> {
    Ok(store.get(key)?.map(|v| v.to_vec()))
}

impl PersistentCache {
    /// Open (or create) the cache database at the given path.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let db = fjall::Database::builder(&path).open()?;
        let store = db.keyspace("forecasts", fjall::KeyspaceCreateOptions::default)?;
        Ok(PersistentCache { store })
    }
}

#[async_trait]
impl ForecastCache for PersistentCache {
    #[tracing::instrument(name = "persistent_cache_get", level = "debug", skip(self))]
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let store = self.store.clone();
        let key_bytes = key.as_bytes().to_vec();

        let maybe_bytes: Option<Vec<u8>> =
            task::spawn_blocking(move || get_from_store(store, key_bytes)).await??;

        let Some(bytes) = maybe_bytes else {
            tracing::debug!("key not found");
            return Ok(None);
        };

        let entry: StoredEntry = postcard::from_bytes(&bytes)?;
        if entry.is_fresh(now_epoch_secs()?) {
            tracing::debug!("key found and still fresh");
            Ok(Some(entry.payload))
        } else {
            tracing::debug!("key found but expired");
            self.remove(key).await?;
            Ok(None)
        }
    }

    #[tracing::instrument(name = "persistent_cache_put", level = "debug", skip(self, payload))]
    async fn put(&self, key: &str, payload: String, ttl: Duration) -> Result<()> {
        let store = self.store.clone();
        let key = key.as_bytes().to_vec();
        let entry = StoredEntry {
            payload,
            expires_at: expiry_epoch_secs(ttl)?,
        };
        let bytes = postcard::to_stdvec(&entry)?;

        // The store step is all-or-nothing: a failed disk write must surface
        // to the caller, not report success over a missing entry.
        task::spawn_blocking(move || store.insert(key, bytes)).await??;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let store = self.store.clone();
        let key = key.as_bytes().to_vec();
        task::spawn_blocking(move || store.remove(key)).await??;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THIRTY_MINUTES: Duration = Duration::from_secs(30 * 60);

    #[tokio::test]
    async fn test_memory_cache_round_trip() {
        let cache = MemoryCache::new();
        cache
            .put("forecast:28202:v1", "payload".to_string(), THIRTY_MINUTES)
            .await
            .unwrap();

        let hit = cache.get("forecast:28202:v1").await.unwrap();
        assert_eq!(hit.as_deref(), Some("payload"));

        let miss = cache.get("forecast:90210:v1").await.unwrap();
        assert_eq!(miss, None);
    }

    #[tokio::test]
    async fn test_memory_cache_ttl_boundary() {
        let cache = MemoryCache::new();
        let now = now_epoch_secs().unwrap();

        // Written 29 minutes ago with a 30-minute TTL: one minute of life left.
        cache
            .insert_raw("young", "fresh".to_string(), now + 60)
            .unwrap();
        // Written 31 minutes ago with a 30-minute TTL: expired a minute ago.
        cache
            .insert_raw("old", "stale".to_string(), now - 60)
            .unwrap();

        assert_eq!(cache.get("young").await.unwrap().as_deref(), Some("fresh"));
        assert_eq!(cache.get("old").await.unwrap(), None);
        // Expired entries are purged on read.
        assert!(!cache.entries.lock().unwrap().contains_key("old"));
    }

    #[tokio::test]
    async fn test_memory_cache_overwrite_is_last_write_wins() {
        let cache = MemoryCache::new();
        cache
            .put("key", "first".to_string(), THIRTY_MINUTES)
            .await
            .unwrap();
        cache
            .put("key", "second".to_string(), THIRTY_MINUTES)
            .await
            .unwrap();
        assert_eq!(cache.get("key").await.unwrap().as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_memory_cache_remove() {
        let cache = MemoryCache::new();
        cache
            .put("key", "value".to_string(), THIRTY_MINUTES)
            .await
            .unwrap();
        cache.remove("key").await.unwrap();
        assert_eq!(cache.get("key").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_persistent_cache_round_trip() {
        use rand::Rng;

        let suffix: u64 = rand::rng().random();
        let path = std::env::temp_dir().join(format!("zipcast-cache-test-{suffix}"));
        let cache = PersistentCache::new(&path).unwrap();

        cache
            .put("forecast:28202:v1", "payload".to_string(), THIRTY_MINUTES)
            .await
            .unwrap();
        let hit = cache.get("forecast:28202:v1").await.unwrap();
        assert_eq!(hit.as_deref(), Some("payload"));

        // Zero TTL expires immediately.
        cache
            .put("ephemeral", "gone".to_string(), Duration::ZERO)
            .await
            .unwrap();
        assert_eq!(cache.get("ephemeral").await.unwrap(), None);

        let _ = std::fs::remove_dir_all(&path);
    }
}
