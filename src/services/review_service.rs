//! Review service.
//!
//! A review may only be written by the customer who owns the booking, and
//! only once the booking is completed.

use crate::cache::{CacheManager, keys};
use crate::error::{AppError, AppResult};
use crate::models::{BookingStatus, NewReview, Review, UpdateReview, UserRole};
use crate::repositories::{BookingRepository, ReviewRepository};
use crate::services::booking_service::Requester;

#[derive(Clone)]
pub struct ReviewService {
    repo: ReviewRepository,
    bookings: BookingRepository,
    cache: CacheManager,
}

impl ReviewService {
    pub fn new(repo: ReviewRepository, bookings: BookingRepository, cache: CacheManager) -> Self {
        Self {
            repo,
            bookings,
            cache,
        }
    }

    pub async fn create_review(
        &self,
        booking_id: i32,
        rating: i32,
        comment: Option<String>,
        requester: Requester,
    ) -> AppResult<Review> {
        let booking = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::not_found("Booking", booking_id))?;

        if booking.customer_id != Some(requester.user_id) {
            return Err(AppError::forbidden("Only the booking's customer can review it"));
        }

        if booking.status != BookingStatus::Completed {
            return Err(AppError::BadRequest {
                message: "Only completed bookings can be reviewed".to_string(),
            });
        }

        if self.repo.find_by_booking(booking_id).await?.is_some() {
            return Err(AppError::Duplicate {
                entity: "Review".to_string(),
                field: "booking_id".to_string(),
                value: booking_id.to_string(),
            });
        }

        let review = self
            .repo
            .create(NewReview {
                booking_id,
                barber_id: booking.barber_id,
                customer_id: requester.user_id,
                rating,
                comment,
            })
            .await?;

        self.invalidate_stats(booking.barber_id).await;
        Ok(review)
    }

    pub async fn list_for_barber(
        &self,
        barber_id: i32,
        page: i64,
        per_page: i64,
    ) -> AppResult<Vec<Review>> {
        let offset = (page - 1) * per_page;
        self.repo.list_by_barber(barber_id, per_page, offset).await
    }

    /// Authors may edit their own review; admins may edit any.
    pub async fn update_review(
        &self,
        review_id: i32,
        update: UpdateReview,
        requester: Requester,
    ) -> AppResult<Review> {
        let review = self.owned_review(review_id, requester).await?;
        let updated = self.repo.update(review.id, update).await?;

        self.invalidate_stats(updated.barber_id).await;
        Ok(updated)
    }

    pub async fn delete_review(&self, review_id: i32, requester: Requester) -> AppResult<()> {
        let review = self.owned_review(review_id, requester).await?;
        self.repo.delete(review.id).await?;

        self.invalidate_stats(review.barber_id).await;
        Ok(())
    }

    async fn owned_review(&self, review_id: i32, requester: Requester) -> AppResult<Review> {
        let review = self
            .repo
            .find_by_id(review_id)
            .await?
            .ok_or_else(|| AppError::not_found("Review", review_id))?;

        if requester.role != UserRole::Admin && review.customer_id != requester.user_id {
            return Err(AppError::forbidden("Not your review"));
        }

        Ok(review)
    }

    async fn invalidate_stats(&self, barber_id: i32) {
        self.cache
            .invalidate(&keys::barber_stats_key(barber_id))
            .await;
    }
}
