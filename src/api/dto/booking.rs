//! Booking DTOs.

use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::api::dto::format_timestamp;
use crate::models::{Booking, BookingHistory, BookingStatus};
use crate::services::{Availability, CreateBooking};

/// Request body for creating a booking.
///
/// Timestamps arrive as RFC3339 and are stored as UTC.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateBookingRequest {
    #[validate(range(min = 1, message = "barber_id must be positive"))]
    pub barber_id: i32,
    #[validate(range(min = 1, message = "service_id must be positive"))]
    pub service_id: i32,
    #[schema(value_type = String, format = "date-time")]
    pub start_time: DateTime<Utc>,
    #[validate(range(min = 15, max = 480, message = "duration_minutes must be between 15 and 480"))]
    pub duration_minutes: i32,
    #[validate(length(min = 2, max = 100, message = "Customer name must be between 2 and 100 characters"))]
    pub customer_name: String,
    #[validate(length(min = 5, max = 30, message = "Customer phone must be between 5 and 30 characters"))]
    pub customer_phone: String,
    #[validate(email(message = "Invalid email format"))]
    pub customer_email: Option<String>,
    #[validate(length(max = 2000, message = "Notes must be at most 2000 characters"))]
    pub notes: Option<String>,
}

impl CreateBookingRequest {
    pub fn into_create_booking(self) -> CreateBooking {
        CreateBooking {
            barber_id: self.barber_id,
            service_id: self.service_id,
            start_time: self.start_time.naive_utc(),
            duration_minutes: self.duration_minutes,
            customer_name: self.customer_name,
            customer_phone: self.customer_phone,
            customer_email: self.customer_email,
            notes: self.notes,
        }
    }
}

/// Query parameters for the availability check.
#[derive(Debug, Deserialize, IntoParams, Validate)]
pub struct AvailabilityParams {
    #[validate(range(min = 1, message = "barber_id must be positive"))]
    pub barber_id: i32,
    #[param(value_type = String, format = "date-time")]
    pub start_time: DateTime<Utc>,
    /// Duration in minutes
    #[validate(range(min = 15, max = 480, message = "duration must be between 15 and 480"))]
    pub duration: i32,
}

/// Request body for a status transition.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    pub status: BookingStatus,
    pub reason: Option<String>,
}

/// Request body for rescheduling.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct RescheduleRequest {
    #[schema(value_type = String, format = "date-time")]
    pub new_start_time: DateTime<Utc>,
    #[validate(range(min = 15, max = 480, message = "duration_minutes must be between 15 and 480"))]
    pub duration_minutes: i32,
    #[validate(length(max = 2000, message = "Reason must be at most 2000 characters"))]
    pub reason: Option<String>,
}

/// Optional request body for cancellation.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CancelRequest {
    pub reason: Option<String>,
}

/// Query parameters for a customer's booking listing.
#[derive(Debug, Deserialize, IntoParams)]
pub struct BookingListParams {
    pub status: Option<BookingStatus>,
}

/// Query parameters for a barber's schedule window.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ScheduleParams {
    #[param(value_type = String, format = "date-time")]
    pub from: DateTime<Utc>,
    #[param(value_type = String, format = "date-time")]
    pub to: DateTime<Utc>,
    pub status: Option<BookingStatus>,
}

/// Response body for a booking.
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingResponse {
    pub id: i32,
    pub booking_number: String,
    pub barber_id: i32,
    pub service_id: i32,
    pub customer_id: Option<i32>,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub start_time: String,
    pub end_time: String,
    pub duration_minutes: i32,
    pub status: BookingStatus,
    #[schema(value_type = String)]
    pub price: BigDecimal,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id,
            booking_number: booking.booking_number,
            barber_id: booking.barber_id,
            service_id: booking.service_id,
            customer_id: booking.customer_id,
            customer_name: booking.customer_name,
            customer_phone: booking.customer_phone,
            customer_email: booking.customer_email,
            start_time: format_timestamp(booking.start_time),
            end_time: format_timestamp(booking.end_time),
            duration_minutes: booking.duration_minutes,
            status: booking.status,
            price: booking.price,
            notes: booking.notes,
            created_at: format_timestamp(booking.created_at),
            updated_at: format_timestamp(booking.updated_at),
        }
    }
}

/// A conflicting booking in an availability response; only the interval is
/// exposed, not the other customer's details.
#[derive(Debug, Serialize, ToSchema)]
pub struct ConflictResponse {
    pub id: i32,
    pub start_time: String,
    pub end_time: String,
}

/// Response body for the availability check.
#[derive(Debug, Serialize, ToSchema)]
pub struct AvailabilityResponse {
    pub available: bool,
    pub conflicts: Vec<ConflictResponse>,
}

impl From<Availability> for AvailabilityResponse {
    fn from(availability: Availability) -> Self {
        Self {
            available: availability.available,
            conflicts: availability
                .conflicts
                .into_iter()
                .map(|b| ConflictResponse {
                    id: b.id,
                    start_time: format_timestamp(b.start_time),
                    end_time: format_timestamp(b.end_time),
                })
                .collect(),
        }
    }
}

/// Response body for a booking history entry.
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingHistoryResponse {
    pub id: i64,
    pub action: String,
    pub old_status: Option<String>,
    pub new_status: Option<String>,
    pub old_start_time: Option<String>,
    pub new_start_time: Option<String>,
    pub actor_id: Option<i32>,
    pub actor_role: String,
    pub reason: Option<String>,
    pub created_at: String,
}

impl From<BookingHistory> for BookingHistoryResponse {
    fn from(entry: BookingHistory) -> Self {
        let fmt = |t: Option<NaiveDateTime>| t.map(format_timestamp);
        Self {
            id: entry.id,
            action: entry.action,
            old_status: entry.old_status,
            new_status: entry.new_status,
            old_start_time: fmt(entry.old_start_time),
            new_start_time: fmt(entry.new_start_time),
            actor_id: entry.actor_id,
            actor_role: entry.actor_role,
            reason: entry.reason,
            created_at: format_timestamp(entry.created_at),
        }
    }
}
