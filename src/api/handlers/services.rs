//! Service catalog request handlers.
//!
//! The catalog is publicly readable. Creating and editing services and
//! categories is an admin operation.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
};

use crate::api::dto::{
    ApiResponse, CategoryResponse, CreateCategoryRequest, CreateServiceRequest, ServiceListParams,
    ServiceResponse, UpdateServiceRequest,
};
use crate::api::middleware::AuthUser;
use crate::error::AppError;
use crate::models::UpdateService;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

/// Creates public catalog routes.
///
/// Routes:
/// - GET /     - List active services, optionally by category
/// - GET /{id} - Service detail
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_services))
        .route("/{id}", get(get_service))
}

/// Creates admin catalog routes. All routes require an admin account.
///
/// Routes:
/// - POST /       - Create a service
/// - PUT /{id}    - Update a service
/// - DELETE /{id} - Deactivate a service
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_service))
        .route("/{id}", put(update_service).delete(deactivate_service))
}

/// Creates category routes, nested at /categories.
///
/// Routes:
/// - GET /  - List categories (public)
/// - POST / - Create a category (admin)
pub fn category_routes() -> Router<AppState> {
    Router::new().route("/", get(list_categories).post(create_category))
}

/// GET /api/v1/services - List active catalog services
async fn list_services(
    State(state): State<AppState>,
    Query(params): Query<ServiceListParams>,
) -> Result<Json<ApiResponse<Vec<ServiceResponse>>>, AppError> {
    let services = state.services.catalog.list_services(params.category_id).await?;
    let responses = services.into_iter().map(ServiceResponse::from).collect();
    Ok(Json(ApiResponse::new(responses)))
}

/// GET /api/v1/services/{id} - Service detail
async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ServiceResponse>>, AppError> {
    let service = state.services.catalog.get_service(id).await?;
    Ok(Json(ApiResponse::new(ServiceResponse::from(service))))
}

/// GET /api/v1/categories - List categories
async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<CategoryResponse>>>, AppError> {
    let categories = state.services.catalog.list_categories().await?;
    let responses = categories.into_iter().map(CategoryResponse::from).collect();
    Ok(Json(ApiResponse::new(responses)))
}

/// POST /api/v1/services - Create a catalog service (admin)
async fn create_service(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateServiceRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ServiceResponse>>), AppError> {
    auth.require_admin()?;

    let service = state
        .services
        .catalog
        .create_service(payload.into_new_service())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(ServiceResponse::from(service))),
    ))
}

/// PUT /api/v1/services/{id} - Update a catalog service (admin)
async fn update_service(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateServiceRequest>,
) -> Result<Json<ApiResponse<ServiceResponse>>, AppError> {
    auth.require_admin()?;

    let service = state
        .services
        .catalog
        .update_service(id, payload.into_update_service())
        .await?;

    Ok(Json(ApiResponse::new(ServiceResponse::from(service))))
}

/// DELETE /api/v1/services/{id} - Deactivate a catalog service (admin)
///
/// Soft delete: existing bookings keep referencing the service; it just
/// stops being offered.
async fn deactivate_service(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ServiceResponse>>, AppError> {
    auth.require_admin()?;

    let update = UpdateService {
        category_id: None,
        name: None,
        description: None,
        duration_minutes: None,
        price: None,
        active: Some(false),
    };
    let service = state.services.catalog.update_service(id, update).await?;

    Ok(Json(ApiResponse::new(ServiceResponse::from(service))))
}

/// POST /api/v1/categories - Create a category (admin)
async fn create_category(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CategoryResponse>>), AppError> {
    auth.require_admin()?;

    let category = state
        .services
        .catalog
        .create_category(payload.into_new_category())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(CategoryResponse::from(category))),
    ))
}
