//! Booking request handlers.
//!
//! Availability checks, guest lookup by booking number, and booking creation
//! are public; creation accepts an optional bearer token so an authenticated
//! customer gets linked to the booking. Everything else requires
//! authentication and is further scoped by role in the service layer.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post, put},
};
use validator::Validate;

use crate::api::dto::{
    ApiResponse, AvailabilityParams, AvailabilityResponse, BookingHistoryResponse,
    BookingListParams, BookingResponse, CancelRequest, CreateBookingRequest, PaginationParams,
    RescheduleRequest, ScheduleParams, UpdateStatusRequest,
};
use crate::api::middleware::AuthUser;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

/// Creates public booking routes.
///
/// Routes:
/// - GET /availability     - Check whether a slot is free
/// - GET /number/{number}  - Guest lookup by booking number
/// - POST /                - Create a booking (token optional)
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_booking))
        .route("/availability", get(check_availability))
        .route("/number/{number}", get(get_by_number))
}

/// Creates protected booking routes. All routes require authentication.
///
/// Routes:
/// - GET /                              - Current customer's bookings
/// - GET /{id}                          - Booking detail
/// - PATCH /{id}/status                 - Status transition
/// - PUT /{id}/reschedule               - Move to a new slot
/// - DELETE /{id}                       - Cancel
/// - GET /{id}/history                  - Audit trail
/// - GET /barber/{barber_id}/schedule   - A barber's schedule window
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_mine))
        .route("/{id}", get(get_booking).delete(cancel_booking))
        .route("/{id}/status", patch(update_status))
        .route("/{id}/reschedule", put(reschedule))
        .route("/{id}/history", get(get_history))
        .route("/barber/{barber_id}/schedule", get(barber_schedule))
}

/// GET /api/v1/bookings/availability - Check a slot
///
/// Returns whether the slot is free and the conflicting intervals when it is
/// not. The check is advisory; creation re-checks under a lock.
async fn check_availability(
    State(state): State<AppState>,
    Query(params): Query<AvailabilityParams>,
) -> Result<Json<ApiResponse<AvailabilityResponse>>, AppError> {
    params.validate()?;

    let availability = state
        .services
        .bookings
        .check_availability(
            params.barber_id,
            params.start_time.naive_utc(),
            params.duration,
        )
        .await?;

    Ok(Json(ApiResponse::new(AvailabilityResponse::from(
        availability,
    ))))
}

/// POST /api/v1/bookings - Create a booking
///
/// Works for guests and authenticated customers alike. With a valid bearer
/// token the booking is linked to the account; without one the contact
/// fields identify the customer and the booking number is the retrieval key.
/// Returns 201 Created, or 409 when the slot is taken.
async fn create_booking(
    State(state): State<AppState>,
    auth: Option<AuthUser>,
    ValidatedJson(payload): ValidatedJson<CreateBookingRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BookingResponse>>), AppError> {
    let requester = auth.map(|auth| auth.requester());

    let booking = state
        .services
        .bookings
        .create_booking(payload.into_create_booking(), requester)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(BookingResponse::from(booking))),
    ))
}

/// GET /api/v1/bookings/number/{number} - Guest lookup by booking number
async fn get_by_number(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> Result<Json<ApiResponse<BookingResponse>>, AppError> {
    let booking = state.services.bookings.get_by_number(&number).await?;
    Ok(Json(ApiResponse::new(BookingResponse::from(booking))))
}

/// GET /api/v1/bookings - Current customer's bookings, newest first
async fn list_mine(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<BookingListParams>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<ApiResponse<Vec<BookingResponse>>>, AppError> {
    pagination.validate()?;

    let bookings = state
        .services
        .bookings
        .list_for_customer(
            auth.requester(),
            params.status,
            pagination.page,
            pagination.per_page,
        )
        .await?;

    let responses = bookings.into_iter().map(BookingResponse::from).collect();
    Ok(Json(ApiResponse::new(responses)))
}

/// GET /api/v1/bookings/{id} - Booking detail
///
/// Customers see their own bookings, barbers the ones on their schedule,
/// admins everything.
async fn get_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<BookingResponse>>, AppError> {
    let booking = state
        .services
        .bookings
        .get_booking(id, auth.requester())
        .await?;

    Ok(Json(ApiResponse::new(BookingResponse::from(booking))))
}

/// PATCH /api/v1/bookings/{id}/status - Transition booking status
///
/// The allowed transitions depend on the caller's role; a disallowed
/// transition returns 422.
async fn update_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<ApiResponse<BookingResponse>>, AppError> {
    let booking = state
        .services
        .bookings
        .update_status(id, payload.status, auth.requester(), payload.reason)
        .await?;

    Ok(Json(ApiResponse::new(BookingResponse::from(booking))))
}

/// PUT /api/v1/bookings/{id}/reschedule - Move a booking to a new slot
async fn reschedule(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<RescheduleRequest>,
) -> Result<Json<ApiResponse<BookingResponse>>, AppError> {
    let booking = state
        .services
        .bookings
        .reschedule(
            id,
            payload.new_start_time.naive_utc(),
            payload.duration_minutes,
            auth.requester(),
            payload.reason,
        )
        .await?;

    Ok(Json(ApiResponse::new(BookingResponse::from(booking))))
}

/// DELETE /api/v1/bookings/{id} - Cancel a booking
///
/// The body is optional; when present it may carry a cancellation reason
/// for the audit trail.
async fn cancel_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
    payload: Option<Json<CancelRequest>>,
) -> Result<Json<ApiResponse<BookingResponse>>, AppError> {
    let reason = payload.and_then(|Json(p)| p.reason);

    let booking = state
        .services
        .bookings
        .cancel(id, auth.requester(), reason)
        .await?;

    Ok(Json(ApiResponse::new(BookingResponse::from(booking))))
}

/// GET /api/v1/bookings/{id}/history - Booking audit trail, oldest first
async fn get_history(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<BookingHistoryResponse>>>, AppError> {
    let entries = state.services.bookings.history(id, auth.requester()).await?;

    let responses = entries
        .into_iter()
        .map(BookingHistoryResponse::from)
        .collect();
    Ok(Json(ApiResponse::new(responses)))
}

/// GET /api/v1/bookings/barber/{barber_id}/schedule - Schedule window
///
/// Barbers see their own schedule; admins any barber's.
async fn barber_schedule(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(barber_id): Path<i32>,
    Query(params): Query<ScheduleParams>,
) -> Result<Json<ApiResponse<Vec<BookingResponse>>>, AppError> {
    let bookings = state
        .services
        .bookings
        .barber_schedule(
            barber_id,
            params.from.naive_utc(),
            params.to.naive_utc(),
            params.status,
            auth.requester(),
        )
        .await?;

    let responses = bookings.into_iter().map(BookingResponse::from).collect();
    Ok(Json(ApiResponse::new(responses)))
}
