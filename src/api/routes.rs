//! Router configuration for the API.
//!
//! This module provides centralized route registration and middleware
//! configuration for the application.

use axum::{Router, middleware};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;

use crate::api::handlers;
use crate::api::middleware::{logging_middleware, rate_limit_middleware, request_id_middleware};
use crate::state::AppState;

/// Creates the main application router with all routes and middleware.
///
/// Authentication is handled by the `AuthUser` extractor on protected
/// handlers rather than a router layer, so public and protected methods
/// can share a path.
///
/// # Middleware Order
/// Middleware is applied in reverse order of declaration (last added runs
/// first): request IDs are assigned before logging, and the rate limiter
/// sits inside logging so rejected requests still show up in the logs.
///
/// # Routes
/// - `/health` - Health, readiness, and liveness probes
/// - `/api/v1/auth` - Registration, login, token refresh
/// - `/api/v1/users` - Account profile
/// - `/api/v1/barbers` - Barber discovery and profile management
/// - `/api/v1/services` - Service catalog
/// - `/api/v1/categories` - Service categories
/// - `/api/v1/bookings` - Availability, bookings, schedules
/// - `/api/v1/reviews` - Review management
/// - `/api/v1/notifications` - Notification inbox
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .nest("/auth", handlers::auth::auth_routes())
        .nest("/users", handlers::users::user_routes())
        .nest(
            "/barbers",
            handlers::barbers::public_routes().merge(handlers::barbers::protected_routes()),
        )
        .nest(
            "/services",
            handlers::services::public_routes().merge(handlers::services::admin_routes()),
        )
        .nest("/categories", handlers::services::category_routes())
        .nest(
            "/bookings",
            handlers::bookings::public_routes().merge(handlers::bookings::protected_routes()),
        )
        .nest("/reviews", handlers::reviews::review_routes())
        .nest(
            "/notifications",
            handlers::notifications::notification_routes(),
        );

    Router::new()
        .merge(handlers::health::health_routes())
        .nest("/api/v1", api_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .with_state(state)
}
