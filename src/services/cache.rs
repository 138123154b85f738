use async_trait::async_trait;
use lru::LruCache;
use serde::{Serialize, de::DeserializeOwned};
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::cache_keys::CacheKey;
use crate::constants::CACHE_CAPACITY;

/// Opportunistic client-side storage. Entries may vanish at any time and are always
/// superseded by a fresh fetch.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: CacheKey) -> Option<serde_json::Value>;
    async fn put(&self, key: CacheKey, value: serde_json::Value);
    async fn remove(&self, key: CacheKey);
}

/// In-memory LRU implementation of [`CacheStore`]
#[derive(Clone)]
pub struct MemoryCache {
    entries: Arc<RwLock<LruCache<String, serde_json::Value>>>,
}

impl MemoryCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Arc::new(RwLock::new(LruCache::new(capacity))),
        }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(CACHE_CAPACITY)
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: CacheKey) -> Option<serde_json::Value> {
        // get() updates recency, so it needs the write lock
        let mut entries = self.entries.write().await;
        entries.get(key.as_str()).cloned()
    }

    async fn put(&self, key: CacheKey, value: serde_json::Value) {
        let mut entries = self.entries.write().await;
        entries.put(key.as_str().to_string(), value);
    }

    async fn remove(&self, key: CacheKey) {
        let mut entries = self.entries.write().await;
        entries.pop(key.as_str());
    }
}

/// Typed read. Undecodable entries are dropped and read as a miss.
pub async fn read_cached<T: DeserializeOwned>(store: &dyn CacheStore, key: CacheKey) -> Option<T> {
    let value = store.get(key).await?;
    match serde_json::from_value(value) {
        Ok(item) => {
            debug!("Cache hit for {}", key);
            Some(item)
        }
        Err(e) => {
            warn!("Discarding unreadable cache entry {}: {}", key, e);
            store.remove(key).await;
            None
        }
    }
}

pub async fn write_cached<T: Serialize>(store: &dyn CacheStore, key: CacheKey, item: &T) {
    match serde_json::to_value(item) {
        Ok(value) => store.put(key, value).await,
        Err(e) => warn!("Failed to serialize cache entry {}: {}", key, e),
    }
}
