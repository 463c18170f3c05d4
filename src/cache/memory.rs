//! In-memory cache implementation backed by a concurrent map.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::cache::{AppCache, CacheError};
use crate::config::settings::MemoryCacheConfig;

struct Entry {
    value: Vec<u8>,
    expires_at: Instant,
}

/// In-memory cache with per-entry TTL and a size limit.
///
/// Expired entries are dropped lazily on read. When the map is full,
/// inserting a new key first evicts whatever expired entries exist.
pub struct MemoryCache {
    store: DashMap<String, Entry>,
    max_size: usize,
    default_ttl: u64,
}

impl MemoryCache {
    pub fn new(config: &MemoryCacheConfig) -> Self {
        Self {
            store: DashMap::new(),
            max_size: config.max_size,
            default_ttl: config.ttl_seconds,
        }
    }

    fn evict_expired(&self) {
        let now = Instant::now();
        self.store.retain(|_, entry| entry.expires_at > now);
    }
}

#[async_trait]
impl AppCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        if let Some(entry) = self.store.get(key) {
            if entry.expires_at > Instant::now() {
                return Ok(Some(entry.value.clone()));
            }
        }
        self.store.remove(key);
        Ok(None)
    }

    async fn set(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl_seconds: Option<u64>,
    ) -> Result<(), CacheError> {
        if self.store.len() >= self.max_size && !self.store.contains_key(key) {
            self.evict_expired();
            if self.store.len() >= self.max_size {
                return Ok(());
            }
        }

        let ttl = ttl_seconds.unwrap_or(self.default_ttl);
        self.store.insert(
            key.to_string(),
            Entry {
                value,
                expires_at: Instant::now() + Duration::from_secs(ttl),
            },
        );
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.store.remove(key);
        Ok(())
    }

    async fn remove_prefix(&self, prefix: &str) -> Result<(), CacheError> {
        self.store.retain(|key, _| !key.starts_with(prefix));
        Ok(())
    }

    async fn clear(&self) -> Result<(), CacheError> {
        self.store.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_cache(max_size: usize, ttl_seconds: u64) -> MemoryCache {
        MemoryCache::new(&MemoryCacheConfig {
            max_size,
            ttl_seconds,
        })
    }

    #[tokio::test]
    async fn set_and_get_round_trip() {
        let cache = test_cache(10, 60);
        cache.set("k", b"hello".to_vec(), None).await.unwrap();
        assert_eq!(cache.get("k").await.unwrap(), Some(b"hello".to_vec()));
    }

    #[tokio::test]
    async fn missing_key_returns_none() {
        let cache = test_cache(10, 60);
        assert_eq!(cache.get("absent").await.unwrap(), None);
    }

    #[tokio::test]
    async fn expired_entry_is_gone() {
        let cache = test_cache(10, 0);
        cache.set("k", b"v".to_vec(), Some(0)).await.unwrap();
        assert_eq!(cache.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn remove_prefix_keeps_other_keys() {
        let cache = test_cache(10, 60);
        cache.set("barber:1", b"a".to_vec(), None).await.unwrap();
        cache.set("barber:2", b"b".to_vec(), None).await.unwrap();
        cache.set("service:1", b"c".to_vec(), None).await.unwrap();

        cache.remove_prefix("barber:").await.unwrap();

        assert_eq!(cache.get("barber:1").await.unwrap(), None);
        assert_eq!(cache.get("barber:2").await.unwrap(), None);
        assert_eq!(cache.get("service:1").await.unwrap(), Some(b"c".to_vec()));
    }

    #[tokio::test]
    async fn full_cache_drops_new_inserts() {
        let cache = test_cache(2, 60);
        cache.set("a", b"1".to_vec(), None).await.unwrap();
        cache.set("b", b"2".to_vec(), None).await.unwrap();
        cache.set("c", b"3".to_vec(), None).await.unwrap();

        assert_eq!(cache.get("c").await.unwrap(), None);
        // Existing keys can still be updated
        cache.set("a", b"updated".to_vec(), None).await.unwrap();
        assert_eq!(cache.get("a").await.unwrap(), Some(b"updated".to_vec()));
    }
}
