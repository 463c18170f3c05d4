//! Service catalog: categories, services, and barber assignments.
//!
//! The catalog is near-static reference data, so reads go through the cache
//! with a day-long TTL and every write clears the catalog prefix.

use bigdecimal::BigDecimal;

use crate::cache::{CacheManager, TtlClass, keys};
use crate::error::{AppError, AppResult};
use crate::models::{
    BarberService, Category, NewBarberService, NewCategory, NewService, Service, UpdateService,
};
use crate::repositories::ServiceRepository;

#[derive(Clone)]
pub struct CatalogService {
    repo: ServiceRepository,
    cache: CacheManager,
}

impl CatalogService {
    pub fn new(repo: ServiceRepository, cache: CacheManager) -> Self {
        Self { repo, cache }
    }

    pub async fn get_service(&self, id: i32) -> AppResult<Service> {
        let key = keys::service_key(id);
        if let Some(cached) = self.cache.get_json::<Service>(&key).await {
            return Ok(cached);
        }

        let service = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Service", id))?;

        self.cache.put_json(&key, &service, TtlClass::Day).await;
        Ok(service)
    }

    pub async fn list_services(&self, category_id: Option<i32>) -> AppResult<Vec<Service>> {
        // Only the unfiltered listing is cached; filtered views are cheap
        // enough to read through.
        if category_id.is_none() {
            if let Some(cached) = self.cache.get_json::<Vec<Service>>(keys::CATALOG_KEY).await {
                return Ok(cached);
            }
        }

        let services = self.repo.list_active(category_id).await?;

        if category_id.is_none() {
            self.cache
                .put_json(keys::CATALOG_KEY, &services, TtlClass::Day)
                .await;
        }
        Ok(services)
    }

    pub async fn create_service(&self, new_service: NewService) -> AppResult<Service> {
        let service = self.repo.create(new_service).await?;
        self.invalidate_catalog().await;
        Ok(service)
    }

    pub async fn update_service(&self, id: i32, update: UpdateService) -> AppResult<Service> {
        self.get_service(id).await?;
        let service = self.repo.update(id, update).await?;
        self.invalidate_catalog().await;
        Ok(service)
    }

    pub async fn list_categories(&self) -> AppResult<Vec<Category>> {
        self.repo.list_categories().await
    }

    pub async fn create_category(&self, new_category: NewCategory) -> AppResult<Category> {
        self.repo.create_category(new_category).await
    }

    // ========================================================================
    // Barber assignments
    // ========================================================================

    /// Assigns a service to a barber, optionally with a price override.
    pub async fn assign_service(
        &self,
        barber_id: i32,
        service_id: i32,
        price_override: Option<BigDecimal>,
    ) -> AppResult<BarberService> {
        // Existence check keeps a dangling service_id from becoming a raw
        // foreign key violation message.
        self.get_service(service_id).await?;

        let assignment = self
            .repo
            .assign_to_barber(NewBarberService {
                barber_id,
                service_id,
                price_override,
            })
            .await?;

        self.cache
            .invalidate_prefix(&keys::barber_prefix(barber_id))
            .await;
        Ok(assignment)
    }

    pub async fn unassign_service(&self, barber_id: i32, service_id: i32) -> AppResult<()> {
        let removed = self.repo.remove_from_barber(barber_id, service_id).await?;
        if removed == 0 {
            return Err(AppError::NotFound {
                entity: "BarberService".to_string(),
                field: "service_id".to_string(),
                value: service_id.to_string(),
            });
        }

        self.cache
            .invalidate_prefix(&keys::barber_prefix(barber_id))
            .await;
        Ok(())
    }

    /// Services a barber offers, with the effective price (override if set,
    /// base price otherwise).
    pub async fn barber_offerings(
        &self,
        barber_id: i32,
    ) -> AppResult<Vec<(Service, BigDecimal)>> {
        let rows = self.repo.list_for_barber(barber_id).await?;
        Ok(rows
            .into_iter()
            .map(|(service, override_price)| {
                let effective = override_price.unwrap_or_else(|| service.price.clone());
                (service, effective)
            })
            .collect())
    }

    /// The price and duration a booking for this barber and service would
    /// get. Fails if the barber does not offer the service.
    pub async fn effective_offering(
        &self,
        barber_id: i32,
        service_id: i32,
    ) -> AppResult<(Service, BigDecimal)> {
        let service = self.get_service(service_id).await?;

        let assignment = self
            .repo
            .find_assignment(barber_id, service_id)
            .await?
            .ok_or_else(|| AppError::BadRequest {
                message: format!("Barber {} does not offer service {}", barber_id, service_id),
            })?;

        let price = assignment
            .price_override
            .unwrap_or_else(|| service.price.clone());
        Ok((service, price))
    }

    async fn invalidate_catalog(&self) {
        self.cache.invalidate_prefix(keys::CATALOG_PREFIX).await;
        self.cache.invalidate_prefix(keys::SERVICE_PREFIX).await;
    }
}
