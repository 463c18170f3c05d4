//! Review DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::dto::format_timestamp;
use crate::models::{Review, UpdateReview};

/// Request body for creating a review.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateReviewRequest {
    #[validate(range(min = 1, message = "booking_id must be positive"))]
    pub booking_id: i32,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,
    #[validate(length(max = 2000, message = "Comment must be at most 2000 characters"))]
    pub comment: Option<String>,
}

/// Request body for editing a review.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateReviewRequest {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: Option<i32>,
    #[validate(length(max = 2000, message = "Comment must be at most 2000 characters"))]
    pub comment: Option<String>,
}

impl UpdateReviewRequest {
    pub fn into_update_review(self) -> UpdateReview {
        UpdateReview {
            rating: self.rating,
            comment: self.comment,
        }
    }
}

/// Response body for a review.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewResponse {
    pub id: i32,
    pub booking_id: i32,
    pub barber_id: i32,
    pub customer_id: i32,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            booking_id: review.booking_id,
            barber_id: review.barber_id,
            customer_id: review.customer_id,
            rating: review.rating,
            comment: review.comment,
            created_at: format_timestamp(review.created_at),
            updated_at: format_timestamp(review.updated_at),
        }
    }
}
