//! Notification inbox handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
};
use validator::Validate;

use crate::api::dto::{
    ApiResponse, NotificationListParams, NotificationResponse, PaginationParams,
    UnreadCountResponse,
};
use crate::api::middleware::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Creates notification routes. All routes require authentication.
///
/// Routes:
/// - GET /              - Inbox, newest first
/// - GET /unread_count  - Unread badge count
/// - PATCH /{id}/read   - Mark one notification read
/// - POST /read-all     - Mark the whole inbox read
pub fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_notifications))
        .route("/unread_count", get(unread_count))
        .route("/{id}/read", patch(mark_read))
        .route("/read-all", post(mark_all_read))
}

/// GET /api/v1/notifications - Inbox listing
async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<NotificationListParams>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<ApiResponse<Vec<NotificationResponse>>>, AppError> {
    pagination.validate()?;

    let notifications = state
        .services
        .notifications
        .list(
            auth.user_id,
            params.unread_only,
            pagination.page,
            pagination.per_page,
        )
        .await?;

    let responses = notifications
        .into_iter()
        .map(NotificationResponse::from)
        .collect();
    Ok(Json(ApiResponse::new(responses)))
}

/// GET /api/v1/notifications/unread_count - Unread badge count
async fn unread_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<UnreadCountResponse>>, AppError> {
    let unread = state.services.notifications.unread_count(auth.user_id).await?;
    Ok(Json(ApiResponse::new(UnreadCountResponse { unread })))
}

/// PATCH /api/v1/notifications/{id}/read - Mark one notification read
///
/// 404 when the notification doesn't exist or belongs to someone else.
async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.services.notifications.mark_read(id, auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/notifications/read-all - Mark the whole inbox read
async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<StatusCode, AppError> {
    state.services.notifications.mark_all_read(auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
