//! Barber profile DTOs.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::api::dto::format_timestamp;
use crate::models::{Barber, NewBarber, UpdateBarber};
use crate::services::BarberStats;

/// Request body for creating a barber profile.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateBarberRequest {
    #[validate(length(min = 2, max = 100, message = "Display name must be between 2 and 100 characters"))]
    pub display_name: String,
    #[validate(length(max = 2000, message = "Bio must be at most 2000 characters"))]
    pub bio: Option<String>,
    #[validate(length(max = 255, message = "Address must be at most 255 characters"))]
    pub address: Option<String>,
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub longitude: Option<f64>,
}

impl CreateBarberRequest {
    pub fn into_new_barber(self, user_id: i32) -> NewBarber {
        NewBarber {
            user_id,
            display_name: self.display_name,
            bio: self.bio,
            address: self.address,
            latitude: self.latitude,
            longitude: self.longitude,
            active: true,
        }
    }
}

/// Request body for updating a barber profile.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateBarberRequest {
    #[validate(length(min = 2, max = 100, message = "Display name must be between 2 and 100 characters"))]
    pub display_name: Option<String>,
    #[validate(length(max = 2000, message = "Bio must be at most 2000 characters"))]
    pub bio: Option<String>,
    #[validate(length(max = 255, message = "Address must be at most 255 characters"))]
    pub address: Option<String>,
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub longitude: Option<f64>,
    pub active: Option<bool>,
}

impl UpdateBarberRequest {
    pub fn into_update_barber(self) -> UpdateBarber {
        UpdateBarber {
            display_name: self.display_name,
            bio: self.bio,
            address: self.address,
            latitude: self.latitude,
            longitude: self.longitude,
            active: self.active,
        }
    }
}

/// Query parameters for barber search.
#[derive(Debug, Deserialize, IntoParams, Validate)]
pub struct BarberSearchParams {
    /// Case-insensitive substring match on the display name
    #[validate(length(min = 1, max = 100, message = "Query must be between 1 and 100 characters"))]
    pub q: Option<String>,
}

/// Response body for a barber profile.
#[derive(Debug, Serialize, ToSchema)]
pub struct BarberResponse {
    pub id: i32,
    pub user_id: i32,
    pub display_name: String,
    pub bio: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Barber> for BarberResponse {
    fn from(barber: Barber) -> Self {
        Self {
            id: barber.id,
            user_id: barber.user_id,
            display_name: barber.display_name,
            bio: barber.bio,
            address: barber.address,
            latitude: barber.latitude,
            longitude: barber.longitude,
            active: barber.active,
            created_at: format_timestamp(barber.created_at),
            updated_at: format_timestamp(barber.updated_at),
        }
    }
}

/// Response body for barber review statistics.
#[derive(Debug, Serialize, ToSchema)]
pub struct BarberStatsResponse {
    pub barber_id: i32,
    pub average_rating: Option<f64>,
    pub review_count: i64,
}

impl From<BarberStats> for BarberStatsResponse {
    fn from(stats: BarberStats) -> Self {
        Self {
            barber_id: stats.barber_id,
            average_rating: stats.average_rating,
            review_count: stats.review_count,
        }
    }
}
