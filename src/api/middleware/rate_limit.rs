//! Fixed-window rate limiting middleware.
//!
//! Counts requests per client IP in fixed windows. Counters live in a
//! concurrent map; a request that lands in a fresh window resets its
//! client's counter. Stale entries are swept opportunistically so the map
//! does not grow with the total number of clients ever seen.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use dashmap::DashMap;

use crate::config::RateLimitConfig;
use crate::error::AppError;
use crate::state::AppState;

struct Window {
    started_at: Instant,
    count: u32,
}

/// Shared rate limiter state, one counter per client IP.
#[derive(Clone)]
pub struct RateLimiter {
    windows: Arc<DashMap<IpAddr, Window>>,
    config: RateLimitConfig,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            windows: Arc::new(DashMap::new()),
            config,
        }
    }

    fn window_length(&self) -> Duration {
        Duration::from_secs(self.config.window_seconds)
    }

    /// Records a hit for the client and reports whether it is within the
    /// limit.
    pub fn check(&self, client: IpAddr) -> bool {
        if !self.config.enabled {
            return true;
        }

        let now = Instant::now();
        let window_length = self.window_length();

        let mut entry = self.windows.entry(client).or_insert(Window {
            started_at: now,
            count: 0,
        });

        if now.duration_since(entry.started_at) >= window_length {
            entry.started_at = now;
            entry.count = 0;
        }

        entry.count += 1;
        let allowed = entry.count <= self.config.max_requests;
        drop(entry);

        // Sweep once the map has clearly accumulated dead windows.
        if self.windows.len() > 4 * self.config.max_requests as usize {
            self.windows
                .retain(|_, w| now.duration_since(w.started_at) < window_length);
        }

        allowed
    }
}

/// Middleware that rejects clients exceeding the configured request budget
/// with 429.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !state.rate_limiter.check(addr.ip()) {
        return Err(AppError::RateLimited {
            message: "Too many requests, slow down".to_string(),
        });
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max_requests: u32, window_seconds: u64) -> RateLimiter {
        RateLimiter::new(RateLimitConfig {
            enabled: true,
            max_requests,
            window_seconds,
        })
    }

    fn ip(last: u8) -> IpAddr {
        IpAddr::from([127, 0, 0, last])
    }

    #[test]
    fn allows_up_to_the_limit() {
        let limiter = limiter(3, 60);
        assert!(limiter.check(ip(1)));
        assert!(limiter.check(ip(1)));
        assert!(limiter.check(ip(1)));
        assert!(!limiter.check(ip(1)));
    }

    #[test]
    fn clients_are_counted_separately() {
        let limiter = limiter(1, 60);
        assert!(limiter.check(ip(1)));
        assert!(limiter.check(ip(2)));
        assert!(!limiter.check(ip(1)));
    }

    #[test]
    fn disabled_limiter_always_allows() {
        let limiter = RateLimiter::new(RateLimitConfig {
            enabled: false,
            max_requests: 1,
            window_seconds: 60,
        });
        for _ in 0..10 {
            assert!(limiter.check(ip(1)));
        }
    }

    #[test]
    fn window_reset_restores_budget() {
        let limiter = limiter(1, 0);
        assert!(limiter.check(ip(1)));
        // window_seconds = 0 means every call starts a fresh window
        assert!(limiter.check(ip(1)));
    }
}
