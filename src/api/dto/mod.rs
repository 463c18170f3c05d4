//! Data Transfer Objects for API requests and responses.
//!
//! DTOs are organized by domain:
//! - `auth` / `user` - Account and authentication DTOs
//! - `barber` / `service` - Profile and catalog DTOs
//! - `booking` - Booking, availability, and history DTOs
//! - `review` / `notification` - Review and inbox DTOs
//! - `envelope` / `error` / `pagination` - Common wrappers

mod auth;
mod barber;
mod booking;
mod envelope;
mod error;
mod notification;
mod pagination;
mod review;
mod service;
mod user;

pub use auth::{AuthResponse, LoginRequest, RefreshRequest, RegisterRequest};
pub use barber::{
    BarberResponse, BarberSearchParams, BarberStatsResponse, CreateBarberRequest,
    UpdateBarberRequest,
};
pub use booking::{
    AvailabilityParams, AvailabilityResponse, BookingHistoryResponse, BookingListParams,
    BookingResponse, CancelRequest, ConflictResponse, CreateBookingRequest, RescheduleRequest,
    ScheduleParams, UpdateStatusRequest,
};
pub use envelope::ApiResponse;
pub use error::ErrorResponse;
pub use notification::{NotificationListParams, NotificationResponse, UnreadCountResponse};
pub use pagination::{PageMeta, PaginationParams};
pub use review::{CreateReviewRequest, ReviewResponse, UpdateReviewRequest};
pub use service::{
    AssignServiceRequest, CategoryResponse, CreateCategoryRequest, CreateServiceRequest,
    OfferingResponse, ServiceListParams, ServiceResponse, UpdateServiceRequest,
};
pub use user::{UpdateProfileRequest, UpdateRoleRequest, UserResponse};

use chrono::NaiveDateTime;

/// Timestamps are rendered as UTC RFC3339 with millisecond precision.
pub(crate) fn format_timestamp(t: NaiveDateTime) -> String {
    t.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}
