//! Application state for Axum web framework.
//!
//! Contains shared services and resources that are accessible
//! across all request handlers.

use crate::api::middleware::RateLimiter;
use crate::cache::CacheManager;
use crate::config::JwtConfig;
use crate::db::AsyncDbPool;
use crate::repositories::Repositories;
use crate::services::Services;

/// Application state containing all shared services and resources.
///
/// This struct is designed to be used with Axum's State extractor.
/// Cloning is cheap since the components use Arc internally.
#[derive(Clone)]
pub struct AppState {
    /// All business logic services
    pub services: Services,
    /// Direct access to the database connection pool
    pub db_pool: AsyncDbPool,
    /// JWT configuration for token generation and validation
    pub jwt_config: JwtConfig,
    /// Cache manager shared with the service layer
    pub cache: CacheManager,
    /// Per-client request counters
    pub rate_limiter: RateLimiter,
}

impl AppState {
    /// Creates a new AppState wiring repositories and services to the pool.
    ///
    /// # Example
    /// ```ignore
    /// let pool = establish_async_connection_pool(&settings.database).await?;
    /// let cache = CacheManager::new(&settings.cache).await?;
    /// let state = AppState::new(pool, cache, settings.jwt.clone(), rate_limiter);
    /// ```
    pub fn new(
        pool: AsyncDbPool,
        cache: CacheManager,
        jwt_config: JwtConfig,
        rate_limiter: RateLimiter,
    ) -> Self {
        let repos = Repositories::new(pool.clone());
        let services = Services::new(repos, cache.clone(), jwt_config.clone());
        Self {
            services,
            db_pool: pool,
            jwt_config,
            cache,
            rate_limiter,
        }
    }
}
