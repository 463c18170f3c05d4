//! Domain models mapped to the database schema.

mod barber;
mod booking;
mod notification;
mod review;
mod service;
mod user;

pub use barber::{Barber, NewBarber, UpdateBarber};
pub use booking::{
    ACTIVE_STATUSES, Booking, BookingHistory, BookingStatus, NewBooking, NewBookingHistory,
    history_action, intervals_overlap, transition_allowed,
};
pub use notification::{NewNotification, Notification, notification_kind};
pub use review::{NewReview, Review, UpdateReview};
pub use service::{
    BarberService, Category, NewBarberService, NewCategory, NewService, Service, UpdateService,
};
pub use user::{NewUser, UpdateUser, User, UserRole};
