//! Review request handlers.
//!
//! Listing a barber's reviews is public; writing requires an authenticated
//! customer who owns a completed booking.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
};
use validator::Validate;

use crate::api::dto::{
    ApiResponse, CreateReviewRequest, PaginationParams, ReviewResponse, UpdateReviewRequest,
};
use crate::api::middleware::AuthUser;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

/// Creates review routes. Listing is public, writing requires
/// authentication.
///
/// Routes:
/// - GET /barber/{barber_id} - Reviews for a barber, newest first
/// - POST /                  - Review a completed booking
/// - PUT /{id}               - Edit own review
/// - DELETE /{id}            - Delete own review
pub fn review_routes() -> Router<AppState> {
    Router::new()
        .route("/barber/{barber_id}", get(list_for_barber))
        .route("/", post(create_review))
        .route("/{id}", put(update_review).delete(delete_review))
}

/// GET /api/v1/reviews/barber/{barber_id} - Reviews for a barber
async fn list_for_barber(
    State(state): State<AppState>,
    Path(barber_id): Path<i32>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<ApiResponse<Vec<ReviewResponse>>>, AppError> {
    pagination.validate()?;

    // 404 before an empty listing for a barber that doesn't exist
    state.services.barbers.get_barber(barber_id).await?;

    let reviews = state
        .services
        .reviews
        .list_for_barber(barber_id, pagination.page, pagination.per_page)
        .await?;

    let responses = reviews.into_iter().map(ReviewResponse::from).collect();
    Ok(Json(ApiResponse::new(responses)))
}

/// POST /api/v1/reviews - Review a completed booking
///
/// The booking must belong to the caller and be completed; one review per
/// booking, a second attempt returns 409.
async fn create_review(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateReviewRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ReviewResponse>>), AppError> {
    let review = state
        .services
        .reviews
        .create_review(
            payload.booking_id,
            payload.rating,
            payload.comment,
            auth.requester(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(ReviewResponse::from(review))),
    ))
}

/// PUT /api/v1/reviews/{id} - Edit a review (author or admin)
async fn update_review(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateReviewRequest>,
) -> Result<Json<ApiResponse<ReviewResponse>>, AppError> {
    let review = state
        .services
        .reviews
        .update_review(id, payload.into_update_review(), auth.requester())
        .await?;

    Ok(Json(ApiResponse::new(ReviewResponse::from(review))))
}

/// DELETE /api/v1/reviews/{id} - Delete a review (author or admin)
async fn delete_review(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    state
        .services
        .reviews
        .delete_review(id, auth.requester())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
