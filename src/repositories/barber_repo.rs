//! Barber profile repository.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::AppError;
use crate::models::{Barber, NewBarber, UpdateBarber};

#[derive(Clone)]
pub struct BarberRepository {
    pool: AsyncDbPool,
}

impl BarberRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new_barber: NewBarber) -> Result<Barber, AppError> {
        use crate::schema::barbers::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::insert_into(barbers)
            .values(&new_barber)
            .returning(Barber::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    pub async fn find_by_id(&self, barber_id: i32) -> Result<Option<Barber>, AppError> {
        use crate::schema::barbers::dsl::*;
        let mut conn = self.pool.get().await?;

        barbers
            .filter(id.eq(barber_id))
            .select(Barber::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    /// Finds the barber profile owned by a user account, if any.
    pub async fn find_by_user_id(&self, owner_id: i32) -> Result<Option<Barber>, AppError> {
        use crate::schema::barbers::dsl::*;
        let mut conn = self.pool.get().await?;

        barbers
            .filter(user_id.eq(owner_id))
            .select(Barber::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    pub async fn update(
        &self,
        barber_id: i32,
        update_data: UpdateBarber,
    ) -> Result<Barber, AppError> {
        use crate::schema::barbers::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::update(barbers.filter(id.eq(barber_id)))
            .set(&update_data)
            .returning(Barber::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    /// Lists active barbers, optionally filtered by a case-insensitive
    /// substring match on the display name.
    pub async fn search(
        &self,
        query: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Barber>, AppError> {
        use crate::schema::barbers::dsl::*;
        let mut conn = self.pool.get().await?;

        let mut statement = barbers
            .filter(active.eq(true))
            .select(Barber::as_select())
            .order(display_name.asc())
            .limit(limit)
            .offset(offset)
            .into_boxed();

        if let Some(q) = query {
            statement = statement.filter(display_name.ilike(format!("%{}%", q)));
        }

        statement.load(&mut conn).await.map_err(AppError::from)
    }

    /// Counts active barbers matching the same filter as `search`.
    pub async fn count_search(&self, query: Option<&str>) -> Result<i64, AppError> {
        use crate::schema::barbers::dsl::*;
        let mut conn = self.pool.get().await?;

        let mut statement = barbers
            .filter(active.eq(true))
            .count()
            .into_boxed();

        if let Some(q) = query {
            statement = statement.filter(display_name.ilike(format!("%{}%", q)));
        }

        statement
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }
}
