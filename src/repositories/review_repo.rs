//! Review repository.

use bigdecimal::BigDecimal;
use diesel::dsl::avg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::AppError;
use crate::models::{NewReview, Review, UpdateReview};

#[derive(Clone)]
pub struct ReviewRepository {
    pool: AsyncDbPool,
}

impl ReviewRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new_review: NewReview) -> Result<Review, AppError> {
        use crate::schema::reviews::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::insert_into(reviews)
            .values(&new_review)
            .returning(Review::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    pub async fn find_by_id(&self, review_id: i32) -> Result<Option<Review>, AppError> {
        use crate::schema::reviews::dsl::*;
        let mut conn = self.pool.get().await?;

        reviews
            .filter(id.eq(review_id))
            .select(Review::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    /// Each booking gets at most one review; the unique index enforces it,
    /// this lookup lets the service report it before hitting the constraint.
    pub async fn find_by_booking(&self, for_booking: i32) -> Result<Option<Review>, AppError> {
        use crate::schema::reviews::dsl::*;
        let mut conn = self.pool.get().await?;

        reviews
            .filter(booking_id.eq(for_booking))
            .select(Review::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    pub async fn list_by_barber(
        &self,
        for_barber: i32,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Review>, AppError> {
        use crate::schema::reviews::dsl::*;
        let mut conn = self.pool.get().await?;

        reviews
            .filter(barber_id.eq(for_barber))
            .select(Review::as_select())
            .order(created_at.desc())
            .limit(limit)
            .offset(offset)
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    pub async fn update(
        &self,
        review_id: i32,
        update_data: UpdateReview,
    ) -> Result<Review, AppError> {
        use crate::schema::reviews::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::update(reviews.filter(id.eq(review_id)))
            .set(&update_data)
            .returning(Review::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    pub async fn delete(&self, review_id: i32) -> Result<usize, AppError> {
        use crate::schema::reviews::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::delete(reviews.filter(id.eq(review_id)))
            .execute(&mut conn)
            .await
            .map_err(AppError::from)
    }

    /// Average rating and review count for a barber.
    pub async fn stats(&self, for_barber: i32) -> Result<(Option<BigDecimal>, i64), AppError> {
        use crate::schema::reviews::dsl::*;
        let mut conn = self.pool.get().await?;

        let average: Option<BigDecimal> = reviews
            .filter(barber_id.eq(for_barber))
            .select(avg(rating))
            .get_result(&mut conn)
            .await?;

        let total: i64 = reviews
            .filter(barber_id.eq(for_barber))
            .count()
            .get_result(&mut conn)
            .await?;

        Ok((average, total))
    }
}
