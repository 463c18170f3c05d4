//! HTTP request handlers for API endpoints.
//!
//! This module contains all request handlers organized by resource type.

pub mod auth;
pub mod barbers;
pub mod bookings;
pub mod health;
pub mod notifications;
pub mod reviews;
pub mod services;
pub mod users;
