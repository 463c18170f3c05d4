//! Cache manager that dispatches to the configured backend.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::cache::keys::TtlClass;
use crate::cache::memory::MemoryCache;
use crate::cache::noop::NoOpCache;
use crate::cache::redis::RedisCache;
use crate::cache::{AppCache, CacheError};
use crate::config::settings::{CacheBackend, CacheConfig};

/// Cache manager that provides access to the configured cache backend.
///
/// A cache miss and a cache failure look the same to callers: the JSON
/// helpers log failures and degrade to the database path, so an
/// unavailable Redis never turns into a request error.
#[derive(Clone)]
pub struct CacheManager {
    backend: Arc<dyn AppCache>,
    enabled: bool,
}

impl CacheManager {
    /// Create a new cache manager with the given configuration.
    ///
    /// If caching is disabled, a NoOpCache is used.
    pub async fn new(config: &CacheConfig) -> Result<Self, CacheError> {
        let backend: Arc<dyn AppCache> = if !config.enabled {
            Arc::new(NoOpCache::new())
        } else {
            match config.backend {
                CacheBackend::Memory => Arc::new(MemoryCache::new(&config.memory)),
                CacheBackend::Redis => Arc::new(RedisCache::new(&config.redis).await?),
            }
        };

        Ok(Self {
            backend,
            enabled: config.enabled,
        })
    }

    /// A manager that never caches, for tests and disabled setups.
    pub fn disabled() -> Self {
        Self {
            backend: Arc::new(NoOpCache::new()),
            enabled: false,
        }
    }

    /// Check if caching is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Get a value from the cache.
    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        self.backend.get(key).await
    }

    /// Set a value in the cache.
    pub async fn set(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl_seconds: Option<u64>,
    ) -> Result<(), CacheError> {
        self.backend.set(key, value, ttl_seconds).await
    }

    /// Remove a value from the cache.
    pub async fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.backend.remove(key).await
    }

    /// Clear all values from the cache.
    pub async fn clear(&self) -> Result<(), CacheError> {
        self.backend.clear().await
    }

    // ========================================================================
    // JSON helpers used by the service layer
    // ========================================================================

    /// Fetch and deserialize a cached value.
    ///
    /// Failures (backend or deserialization) are logged and reported as a
    /// miss.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.backend.get(key).await {
            Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!(key, error = %e, "Discarding undeserializable cache entry");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(key, error = %e, "Cache read failed");
                None
            }
        }
    }

    /// Serialize and store a value under the given TTL class.
    ///
    /// Failures are logged and swallowed.
    pub async fn put_json<T: Serialize>(&self, key: &str, value: &T, ttl: TtlClass) {
        let bytes = match serde_json::to_vec(value) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(key, error = %e, "Failed to serialize value for cache");
                return;
            }
        };

        if let Err(e) = self.backend.set(key, bytes, Some(ttl.seconds())).await {
            warn!(key, error = %e, "Cache write failed");
        }
    }

    /// Remove a single entry, logging on failure.
    pub async fn invalidate(&self, key: &str) {
        if let Err(e) = self.backend.remove(key).await {
            warn!(key, error = %e, "Cache invalidation failed");
        }
    }

    /// Remove every entry under a key prefix, logging on failure.
    pub async fn invalidate_prefix(&self, prefix: &str) {
        if let Err(e) = self.backend.remove_prefix(prefix).await {
            warn!(prefix, error = %e, "Cache prefix invalidation failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::{MemoryCacheConfig, RedisCacheConfig};
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Snapshot {
        id: i32,
        name: String,
    }

    fn memory_config() -> CacheConfig {
        CacheConfig {
            enabled: true,
            backend: CacheBackend::Memory,
            memory: MemoryCacheConfig {
                max_size: 100,
                ttl_seconds: 60,
            },
            redis: RedisCacheConfig::default(),
        }
    }

    #[tokio::test]
    async fn json_helpers_round_trip() {
        let manager = CacheManager::new(&memory_config()).await.unwrap();
        let value = Snapshot {
            id: 7,
            name: "Tony".to_string(),
        };

        manager.put_json("barber:7:detail", &value, TtlClass::Medium).await;
        let cached: Option<Snapshot> = manager.get_json("barber:7:detail").await;
        assert_eq!(cached, Some(value));
    }

    #[tokio::test]
    async fn corrupt_entry_reads_as_miss() {
        let manager = CacheManager::new(&memory_config()).await.unwrap();
        manager
            .set("bad", b"not json".to_vec(), None)
            .await
            .unwrap();

        let cached: Option<Snapshot> = manager.get_json("bad").await;
        assert!(cached.is_none());
    }

    #[tokio::test]
    async fn disabled_manager_caches_nothing() {
        let manager = CacheManager::disabled();
        assert!(!manager.is_enabled());

        manager
            .put_json("k", &Snapshot { id: 1, name: "x".into() }, TtlClass::Short)
            .await;
        let cached: Option<Snapshot> = manager.get_json("k").await;
        assert!(cached.is_none());
    }
}
