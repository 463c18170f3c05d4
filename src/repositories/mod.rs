//! Repository layer for data access operations.
//!
//! Provides async CRUD operations for all domain entities.

mod barber_repo;
mod booking_repo;
mod notification_repo;
mod review_repo;
mod service_repo;
mod user_repo;

pub use barber_repo::BarberRepository;
pub use booking_repo::{Actor, BookingRepository};
pub use notification_repo::NotificationRepository;
pub use review_repo::ReviewRepository;
pub use service_repo::ServiceRepository;
pub use user_repo::UserRepository;

use crate::db::AsyncDbPool;

/// Aggregates all repositories for convenient access.
///
/// Since `AsyncDbPool` uses `Arc` internally, cloning is cheap.
#[derive(Clone)]
pub struct Repositories {
    pub users: UserRepository,
    pub barbers: BarberRepository,
    pub services: ServiceRepository,
    pub bookings: BookingRepository,
    pub reviews: ReviewRepository,
    pub notifications: NotificationRepository,
}

impl Repositories {
    /// Creates a new Repositories instance with all repositories initialized.
    pub fn new(pool: AsyncDbPool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            barbers: BarberRepository::new(pool.clone()),
            services: ServiceRepository::new(pool.clone()),
            bookings: BookingRepository::new(pool.clone()),
            reviews: ReviewRepository::new(pool.clone()),
            notifications: NotificationRepository::new(pool),
        }
    }
}
