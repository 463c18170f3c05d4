//! Service catalog repository: services, categories, and the barber-service
//! assignment table.

use bigdecimal::BigDecimal;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::AppError;
use crate::models::{
    BarberService, Category, NewBarberService, NewCategory, NewService, Service, UpdateService,
};

#[derive(Clone)]
pub struct ServiceRepository {
    pool: AsyncDbPool,
}

impl ServiceRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    // ========================================================================
    // Services
    // ========================================================================

    pub async fn create(&self, new_service: NewService) -> Result<Service, AppError> {
        use crate::schema::services::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::insert_into(services)
            .values(&new_service)
            .returning(Service::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    pub async fn find_by_id(&self, service_id: i32) -> Result<Option<Service>, AppError> {
        use crate::schema::services::dsl::*;
        let mut conn = self.pool.get().await?;

        services
            .filter(id.eq(service_id))
            .select(Service::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    /// Lists active services, optionally restricted to one category.
    pub async fn list_active(&self, by_category: Option<i32>) -> Result<Vec<Service>, AppError> {
        use crate::schema::services::dsl::*;
        let mut conn = self.pool.get().await?;

        let mut statement = services
            .filter(active.eq(true))
            .select(Service::as_select())
            .order(name.asc())
            .into_boxed();

        if let Some(cat) = by_category {
            statement = statement.filter(category_id.eq(cat));
        }

        statement.load(&mut conn).await.map_err(AppError::from)
    }

    pub async fn update(
        &self,
        service_id: i32,
        update_data: UpdateService,
    ) -> Result<Service, AppError> {
        use crate::schema::services::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::update(services.filter(id.eq(service_id)))
            .set(&update_data)
            .returning(Service::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    // ========================================================================
    // Categories
    // ========================================================================

    pub async fn create_category(&self, new_category: NewCategory) -> Result<Category, AppError> {
        use crate::schema::categories::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::insert_into(categories)
            .values(&new_category)
            .returning(Category::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        use crate::schema::categories::dsl::*;
        let mut conn = self.pool.get().await?;

        categories
            .select(Category::as_select())
            .order(name.asc())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    // ========================================================================
    // Barber-service assignments
    // ========================================================================

    pub async fn assign_to_barber(
        &self,
        assignment: NewBarberService,
    ) -> Result<BarberService, AppError> {
        use crate::schema::barber_services::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::insert_into(barber_services)
            .values(&assignment)
            .returning(BarberService::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    pub async fn remove_from_barber(
        &self,
        for_barber: i32,
        for_service: i32,
    ) -> Result<usize, AppError> {
        use crate::schema::barber_services::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::delete(
            barber_services
                .filter(barber_id.eq(for_barber))
                .filter(service_id.eq(for_service)),
        )
        .execute(&mut conn)
        .await
        .map_err(AppError::from)
    }

    /// Lists the services a barber offers, paired with any per-barber price
    /// override.
    pub async fn list_for_barber(
        &self,
        for_barber: i32,
    ) -> Result<Vec<(Service, Option<BigDecimal>)>, AppError> {
        use crate::schema::{barber_services, services};
        let mut conn = self.pool.get().await?;

        barber_services::table
            .inner_join(services::table)
            .filter(barber_services::barber_id.eq(for_barber))
            .filter(services::active.eq(true))
            .select((Service::as_select(), barber_services::price_override))
            .order(services::name.asc())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    /// Looks up a barber's assignment for one service, if it exists.
    pub async fn find_assignment(
        &self,
        for_barber: i32,
        for_service: i32,
    ) -> Result<Option<BarberService>, AppError> {
        use crate::schema::barber_services::dsl::*;
        let mut conn = self.pool.get().await?;

        barber_services
            .filter(barber_id.eq(for_barber))
            .filter(service_id.eq(for_service))
            .select(BarberService::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }
}
