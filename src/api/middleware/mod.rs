//! Middleware components for request processing.
//!
//! This module contains middleware for logging, request ID tracking,
//! rate limiting, error handling, and authentication.

mod auth;
mod error_handler;
mod logging;
mod rate_limit;
mod request_id;

pub use auth::AuthUser;
pub use logging::logging_middleware;
pub use rate_limit::{RateLimiter, rate_limit_middleware};
pub use request_id::{RequestId, request_id_middleware};
