//! Account profile handlers for the authenticated user.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, patch},
};

use crate::api::dto::{ApiResponse, UpdateProfileRequest, UpdateRoleRequest, UserResponse};
use crate::api::middleware::AuthUser;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

/// Creates account routes. All routes require authentication.
///
/// Routes:
/// - GET /me           - Current account profile
/// - PUT /me           - Update the current account
/// - PATCH /{id}/role  - Change an account's role (admin)
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_me).put(update_me))
        .route("/{id}/role", patch(update_role))
}

/// GET /api/v1/users/me - Current account profile
async fn get_me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let user = state.services.users.get_user(auth.user_id).await?;
    Ok(Json(ApiResponse::new(UserResponse::from(user))))
}

/// PUT /api/v1/users/me - Update the current account
///
/// A new password is re-hashed before storage. Email and username changes
/// surface duplicates as 409.
async fn update_me(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let user = state
        .services
        .users
        .update_profile(auth.user_id, payload.into_update_user())
        .await?;

    Ok(Json(ApiResponse::new(UserResponse::from(user))))
}

/// PATCH /api/v1/users/{id}/role - Change an account's role
///
/// Admin only. Promoting an account to `barber` is what unlocks barber
/// profile creation; a demotion takes effect on the next token refresh.
async fn update_role(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateRoleRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    auth.require_admin()?;

    let user = state.services.users.set_role(id, payload.role).await?;
    Ok(Json(ApiResponse::new(UserResponse::from(user))))
}
