//! Service layer for business logic operations.
//!
//! Services encapsulate business logic and coordinate between
//! repositories and handlers.

mod barber_service;
mod booking_service;
mod catalog_service;
mod notification_service;
mod review_service;
mod user_service;

pub use barber_service::{BarberPage, BarberService, BarberStats};
pub use booking_service::{
    Availability, BookingService, CreateBooking, MIN_DURATION_MINUTES, Requester,
    generate_booking_number, validate_slot,
};
pub use catalog_service::CatalogService;
pub use notification_service::NotificationService;
pub use review_service::ReviewService;
pub use user_service::{TokenPair, UserService};

use crate::cache::CacheManager;
use crate::config::JwtConfig;
use crate::repositories::Repositories;

/// Aggregates all services for convenient access.
///
/// This struct is designed to be used as Axum application state.
/// Cloning is cheap since underlying pools use `Arc` internally.
#[derive(Clone)]
pub struct Services {
    pub users: UserService,
    pub barbers: BarberService,
    pub catalog: CatalogService,
    pub bookings: BookingService,
    pub reviews: ReviewService,
    pub notifications: NotificationService,
}

impl Services {
    /// Creates a new Services instance from Repositories.
    pub fn new(repos: Repositories, cache: CacheManager, jwt_config: JwtConfig) -> Self {
        let catalog = CatalogService::new(repos.services.clone(), cache.clone());

        Self {
            users: UserService::new(repos.users, jwt_config),
            barbers: BarberService::new(
                repos.barbers.clone(),
                repos.reviews.clone(),
                cache.clone(),
            ),
            bookings: BookingService::new(
                repos.bookings.clone(),
                repos.barbers,
                repos.notifications.clone(),
                catalog.clone(),
                cache.clone(),
            ),
            reviews: ReviewService::new(repos.reviews, repos.bookings, cache),
            notifications: NotificationService::new(repos.notifications),
            catalog,
        }
    }
}
