//! Error handler for converting AppError to HTTP responses.
//!
//! This module implements the IntoResponse trait for AppError,
//! providing consistent error response formatting across the API.
//! Internal failure details are logged, never serialized to the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use crate::api::dto::ErrorResponse;
use crate::error::AppError;

impl IntoResponse for AppError {
    /// Converts an AppError into an HTTP response.
    ///
    /// # Status Code Mapping
    /// - Validation / ValidationErrors / BadRequest → 400
    /// - Unauthorized → 401
    /// - Forbidden → 403
    /// - NotFound → 404
    /// - Duplicate / Conflict → 409
    /// - InvalidTransition → 422
    /// - RateLimited → 429
    /// - Database / Internal → 500
    /// - ConnectionPool → 503
    fn into_response(self) -> Response {
        let (status, error_response) = match &self {
            AppError::NotFound {
                entity,
                field,
                value,
            } => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new(
                    "NOT_FOUND",
                    &format!("{} with {}={} not found", entity, field, value),
                ),
            ),
            AppError::Duplicate {
                entity,
                field,
                value,
            } => (
                StatusCode::CONFLICT,
                ErrorResponse::new(
                    "DUPLICATE",
                    &format!("{} with {}='{}' already exists", entity, field, value),
                ),
            ),
            AppError::Conflict { message } => (
                StatusCode::CONFLICT,
                ErrorResponse::new("BOOKING_CONFLICT", message),
            ),
            AppError::InvalidTransition { from, to } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse::new(
                    "INVALID_TRANSITION",
                    &format!("Cannot transition booking from {} to {}", from, to),
                ),
            ),
            AppError::Validation { field, reason } => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("VALIDATION_ERROR", &format!("{}: {}", field, reason)),
            ),
            AppError::ValidationErrors { errors } => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("VALIDATION_ERROR", "Request validation failed").with_details(
                    json!({
                        "fields": errors,
                    }),
                ),
            ),
            AppError::BadRequest { message } => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("BAD_REQUEST", message),
            ),
            AppError::Unauthorized { message } => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse::new("UNAUTHORIZED", message),
            ),
            AppError::Forbidden { message } => (
                StatusCode::FORBIDDEN,
                ErrorResponse::new("FORBIDDEN", message),
            ),
            AppError::RateLimited { message } => (
                StatusCode::TOO_MANY_REQUESTS,
                ErrorResponse::new("RATE_LIMITED", message),
            ),
            AppError::Database { operation, source } => {
                error!(operation = %operation, error = %source, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("DATABASE_ERROR", "A database error occurred"),
                )
            }
            AppError::ConnectionPool { source } => {
                error!(error = %source, "Connection pool error");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorResponse::new("SERVICE_UNAVAILABLE", "Database connection unavailable"),
                )
            }
            AppError::Internal { source } => {
                error!(error = %source, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("INTERNAL_ERROR", "An internal error occurred"),
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationFieldError;

    fn status_of(error: AppError) -> StatusCode {
        error.into_response().status()
    }

    #[test]
    fn status_code_mapping() {
        assert_eq!(
            status_of(AppError::not_found("Booking", 7)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AppError::Duplicate {
                entity: "User".into(),
                field: "email".into(),
                value: "a@b.c".into(),
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(AppError::Conflict {
                message: "slot taken".into()
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(AppError::InvalidTransition {
                from: "completed".into(),
                to: "pending".into(),
            }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(AppError::Validation {
                field: "start_time".into(),
                reason: "must be in the future".into(),
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::ValidationErrors {
                errors: vec![ValidationFieldError {
                    field: "rating".into(),
                    message: "out of range".into(),
                }],
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Unauthorized {
                message: "no token".into()
            }),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(AppError::forbidden("nope")),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of(AppError::RateLimited {
                message: "slow down".into()
            }),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            status_of(AppError::Internal {
                source: anyhow::anyhow!("boom"),
            }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn internal_details_are_not_leaked() {
        let response = AppError::Internal {
            source: anyhow::anyhow!("secret connection string"),
        }
        .into_response();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(!body.contains("secret connection string"));
        assert!(body.contains("INTERNAL_ERROR"));
    }
}
