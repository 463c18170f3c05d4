//! Cache module providing runtime-configurable caching with multiple backends.
//!
//! This module provides a unified caching interface that supports:
//! - Memory cache (in-process, fastest)
//! - Redis cache (distributed, network-based)
//!
//! # Configuration
//!
//! Configure caching in your TOML config file:
//!
//! ```toml
//! [cache]
//! enabled = true
//! backend = "redis"  # or "memory"
//!
//! [cache.memory]
//! max_size = 1000
//! ttl_seconds = 300
//!
//! [cache.redis]
//! url = "redis://127.0.0.1:6379"
//! ttl_seconds = 300
//! pool_size = 4
//! connection_timeout = 5
//! key_prefix = "shearbook"
//! ```

mod error;
pub mod keys;
mod manager;
mod memory;
mod noop;
mod redis;
mod traits;

pub use error::CacheError;
pub use keys::TtlClass;
pub use manager::CacheManager;
pub use traits::AppCache;

// Re-export config types
pub use crate::config::settings::{
    CacheBackend, CacheConfig, MemoryCacheConfig, RedisCacheConfig,
};
