//! Barber profile service with cache read-through.

use serde::{Deserialize, Serialize};

use crate::cache::{CacheManager, TtlClass, keys};
use crate::error::{AppError, AppResult};
use crate::models::{Barber, NewBarber, UpdateBarber};
use crate::repositories::{BarberRepository, ReviewRepository};

/// Aggregated review statistics for a barber.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarberStats {
    pub barber_id: i32,
    /// None when the barber has no reviews yet.
    pub average_rating: Option<f64>,
    pub review_count: i64,
}

/// One page of a barber search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarberPage {
    pub barbers: Vec<Barber>,
    pub total: i64,
}

#[derive(Clone)]
pub struct BarberService {
    repo: BarberRepository,
    reviews: ReviewRepository,
    cache: CacheManager,
}

impl BarberService {
    pub fn new(repo: BarberRepository, reviews: ReviewRepository, cache: CacheManager) -> Self {
        Self {
            repo,
            reviews,
            cache,
        }
    }

    /// Creates a barber profile for a user account. A user gets at most one
    /// profile.
    pub async fn create_profile(&self, new_barber: NewBarber) -> AppResult<Barber> {
        if self.repo.find_by_user_id(new_barber.user_id).await?.is_some() {
            return Err(AppError::Duplicate {
                entity: "Barber".to_string(),
                field: "user_id".to_string(),
                value: new_barber.user_id.to_string(),
            });
        }

        let barber = self.repo.create(new_barber).await?;
        self.cache.invalidate_prefix(keys::BARBER_SEARCH_PREFIX).await;
        Ok(barber)
    }

    pub async fn get_barber(&self, id: i32) -> AppResult<Barber> {
        let key = keys::barber_key(id);
        if let Some(cached) = self.cache.get_json::<Barber>(&key).await {
            return Ok(cached);
        }

        let barber = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Barber", id))?;

        self.cache.put_json(&key, &barber, TtlClass::Medium).await;
        Ok(barber)
    }

    /// The profile owned by a user account, for `/barbers/me` style access.
    pub async fn get_by_user(&self, user_id: i32) -> AppResult<Barber> {
        self.repo
            .find_by_user_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound {
                entity: "Barber".to_string(),
                field: "user_id".to_string(),
                value: user_id.to_string(),
            })
    }

    pub async fn update_profile(&self, id: i32, update: UpdateBarber) -> AppResult<Barber> {
        self.get_barber(id).await?;
        let barber = self.repo.update(id, update).await?;

        self.cache.invalidate_prefix(&keys::barber_prefix(id)).await;
        self.cache.invalidate_prefix(keys::BARBER_SEARCH_PREFIX).await;
        Ok(barber)
    }

    /// Paginated search over active barbers. Result pages are cached briefly
    /// since new profiles and renames should show up quickly.
    pub async fn search(
        &self,
        query: Option<&str>,
        page: i64,
        per_page: i64,
    ) -> AppResult<BarberPage> {
        let key = keys::barber_search_key(query, page, per_page);
        if let Some(cached) = self.cache.get_json::<BarberPage>(&key).await {
            return Ok(cached);
        }

        let offset = (page - 1) * per_page;
        let barbers = self.repo.search(query, per_page, offset).await?;
        let total = self.repo.count_search(query).await?;

        let result = BarberPage { barbers, total };
        self.cache.put_json(&key, &result, TtlClass::Short).await;
        Ok(result)
    }

    /// Review statistics, cached long since the aggregate query is the
    /// expensive part. Review writes invalidate the barber prefix.
    pub async fn stats(&self, barber_id: i32) -> AppResult<BarberStats> {
        let key = keys::barber_stats_key(barber_id);
        if let Some(cached) = self.cache.get_json::<BarberStats>(&key).await {
            return Ok(cached);
        }

        // 404 for stats of a barber that doesn't exist
        self.get_barber(barber_id).await?;

        let (average, count) = self.reviews.stats(barber_id).await?;
        let stats = BarberStats {
            barber_id,
            average_rating: average.map(|a| {
                use bigdecimal::ToPrimitive;
                a.to_f64().unwrap_or(0.0)
            }),
            review_count: count,
        };

        self.cache.put_json(&key, &stats, TtlClass::Long).await;
        Ok(stats)
    }
}
