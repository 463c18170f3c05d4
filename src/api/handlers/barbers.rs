//! Barber profile request handlers.
//!
//! Discovery endpoints (search, detail, stats, offerings, reviews) are
//! public. Profile management requires a staff account; a barber may only
//! manage their own profile unless they are an admin.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use validator::Validate;

use crate::api::dto::{
    ApiResponse, AssignServiceRequest, BarberResponse, BarberSearchParams, BarberStatsResponse,
    CreateBarberRequest, OfferingResponse, PageMeta, PaginationParams, UpdateBarberRequest,
};
use crate::api::middleware::AuthUser;
use crate::error::AppError;
use crate::models::{UpdateBarber, UserRole};
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

/// Creates public barber routes.
///
/// Routes:
/// - GET /             - Search active barbers
/// - GET /{id}         - Barber profile
/// - GET /{id}/stats   - Review statistics
/// - GET /{id}/services - Services offered, with effective prices
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(search_barbers))
        .route("/{id}", get(get_barber))
        .route("/{id}/stats", get(get_stats))
        .route("/{id}/services", get(list_offerings))
}

/// Creates barber management routes. All routes require authentication.
///
/// Routes:
/// - POST /                             - Create own barber profile (staff)
/// - PUT /{id}                          - Update profile (owner or admin)
/// - DELETE /{id}                       - Deactivate profile (owner or admin)
/// - POST /{id}/services                - Assign a catalog service
/// - DELETE /{id}/services/{service_id} - Remove an assignment
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_barber))
        .route("/{id}", put(update_barber).delete(deactivate_barber))
        .route("/{id}/services", post(assign_service))
        .route("/{id}/services/{service_id}", delete(unassign_service))
}

/// GET /api/v1/barbers - Search active barbers
///
/// `q` filters by display name, case-insensitive. Results are paginated and
/// wrapped with page metadata.
async fn search_barbers(
    State(state): State<AppState>,
    Query(search): Query<BarberSearchParams>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<ApiResponse<Vec<BarberResponse>>>, AppError> {
    search.validate()?;
    pagination.validate()?;

    let page = state
        .services
        .barbers
        .search(search.q.as_deref(), pagination.page, pagination.per_page)
        .await?;

    let meta = PageMeta::new(pagination.page, pagination.per_page, page.total);
    let barbers = page.barbers.into_iter().map(BarberResponse::from).collect();
    Ok(Json(ApiResponse::paginated(barbers, meta)))
}

/// GET /api/v1/barbers/{id} - Barber profile
async fn get_barber(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<BarberResponse>>, AppError> {
    let barber = state.services.barbers.get_barber(id).await?;
    Ok(Json(ApiResponse::new(BarberResponse::from(barber))))
}

/// GET /api/v1/barbers/{id}/stats - Review statistics
async fn get_stats(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<BarberStatsResponse>>, AppError> {
    let stats = state.services.barbers.stats(id).await?;
    Ok(Json(ApiResponse::new(BarberStatsResponse::from(stats))))
}

/// GET /api/v1/barbers/{id}/services - Services offered by the barber
///
/// Each entry carries the effective price: the barber's override when set,
/// the catalog base price otherwise.
async fn list_offerings(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<OfferingResponse>>>, AppError> {
    // 404 before an empty listing for a barber that doesn't exist
    state.services.barbers.get_barber(id).await?;

    let offerings = state.services.catalog.barber_offerings(id).await?;
    let responses = offerings
        .into_iter()
        .map(|(service, price)| OfferingResponse::new(service, price))
        .collect();
    Ok(Json(ApiResponse::new(responses)))
}

/// POST /api/v1/barbers - Create a barber profile for the current user
///
/// Requires a barber or admin account. A user gets at most one profile;
/// a second attempt returns 409.
async fn create_barber(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateBarberRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BarberResponse>>), AppError> {
    auth.require_staff()?;

    let barber = state
        .services
        .barbers
        .create_profile(payload.into_new_barber(auth.user_id))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(BarberResponse::from(barber))),
    ))
}

/// PUT /api/v1/barbers/{id} - Update a barber profile
async fn update_barber(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateBarberRequest>,
) -> Result<Json<ApiResponse<BarberResponse>>, AppError> {
    ensure_owner_or_admin(&state, &auth, id).await?;

    let barber = state
        .services
        .barbers
        .update_profile(id, payload.into_update_barber())
        .await?;

    Ok(Json(ApiResponse::new(BarberResponse::from(barber))))
}

/// DELETE /api/v1/barbers/{id} - Deactivate a barber profile
///
/// Soft delete: the profile stays for existing bookings but drops out of
/// search and can no longer be booked.
async fn deactivate_barber(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<BarberResponse>>, AppError> {
    ensure_owner_or_admin(&state, &auth, id).await?;

    let update = UpdateBarber {
        display_name: None,
        bio: None,
        address: None,
        latitude: None,
        longitude: None,
        active: Some(false),
    };
    let barber = state.services.barbers.update_profile(id, update).await?;

    Ok(Json(ApiResponse::new(BarberResponse::from(barber))))
}

/// POST /api/v1/barbers/{id}/services - Assign a catalog service
async fn assign_service(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<AssignServiceRequest>,
) -> Result<StatusCode, AppError> {
    ensure_owner_or_admin(&state, &auth, id).await?;

    state
        .services
        .catalog
        .assign_service(id, payload.service_id, payload.price_override)
        .await?;

    Ok(StatusCode::CREATED)
}

/// DELETE /api/v1/barbers/{id}/services/{service_id} - Remove an assignment
async fn unassign_service(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, service_id)): Path<(i32, i32)>,
) -> Result<StatusCode, AppError> {
    ensure_owner_or_admin(&state, &auth, id).await?;

    state.services.catalog.unassign_service(id, service_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Admins manage any profile; barbers only the one linked to their account.
async fn ensure_owner_or_admin(
    state: &AppState,
    auth: &AuthUser,
    barber_id: i32,
) -> Result<(), AppError> {
    if auth.role == UserRole::Admin {
        return Ok(());
    }

    let barber = state.services.barbers.get_barber(barber_id).await?;
    if barber.user_id == auth.user_id {
        Ok(())
    } else {
        Err(AppError::forbidden("You do not manage this barber profile"))
    }
}
