//! Authentication request handlers.
//!
//! Registration, login, and token refresh. All routes here are public.

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};

use crate::api::dto::{ApiResponse, AuthResponse, LoginRequest, RefreshRequest, RegisterRequest};
use crate::error::AppError;
use crate::models::UserRole;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

/// Creates authentication routes.
///
/// Routes:
/// - POST /register - Create a customer account
/// - POST /login    - Exchange credentials for a token pair
/// - POST /refresh  - Exchange a refresh token for a fresh pair
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
}

/// POST /api/v1/auth/register - Register a new account
///
/// New accounts always start as customers; barber profiles are created
/// separately and role upgrades are an admin operation.
/// Returns 201 Created with the user and a token pair.
async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), AppError> {
    let (user, tokens) = state
        .services
        .users
        .register(
            payload.username,
            payload.email,
            &payload.password,
            payload.phone,
            UserRole::Customer,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(AuthResponse::new(user, tokens))),
    ))
}

/// POST /api/v1/auth/login - Authenticate with email and password
async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, AppError> {
    let (user, tokens) = state
        .services
        .users
        .authenticate(&payload.email, &payload.password)
        .await?;

    Ok(Json(ApiResponse::new(AuthResponse::new(user, tokens))))
}

/// POST /api/v1/auth/refresh - Refresh an access token
///
/// Validates the refresh token and issues a new token pair. The user record
/// is reloaded so role changes take effect on refresh.
async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RefreshRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, AppError> {
    let (user, tokens) = state.services.users.refresh(&payload.refresh_token).await?;

    Ok(Json(ApiResponse::new(AuthResponse::new(user, tokens))))
}
