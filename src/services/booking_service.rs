//! Booking service: availability checks, creation, status transitions,
//! rescheduling, and listings.
//!
//! The service validates and authorizes; the repository re-runs the conflict
//! check inside the insert/update transaction, so a validation pass here is
//! never the last word on slot availability.

use bigdecimal::BigDecimal;
use chrono::{Duration, NaiveDateTime, Utc};
use rand::Rng;
use tracing::warn;

use crate::cache::{CacheManager, keys};
use crate::error::{AppError, AppResult};
use crate::models::{
    Booking, BookingHistory, BookingStatus, NewBooking, NewNotification, UserRole,
    notification_kind,
};
use crate::repositories::{
    Actor, BarberRepository, BookingRepository, NotificationRepository,
};
use crate::services::catalog_service::CatalogService;

/// Shortest bookable appointment.
pub const MIN_DURATION_MINUTES: i32 = 15;

const BOOKING_NUMBER_SUFFIX_LEN: usize = 6;
const BOOKING_NUMBER_CHARSET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";

/// An authenticated caller, as seen by the service layer.
#[derive(Debug, Clone, Copy)]
pub struct Requester {
    pub user_id: i32,
    pub role: UserRole,
}

impl Requester {
    fn actor(&self) -> Actor {
        Actor {
            user_id: Some(self.user_id),
            role: self.role,
        }
    }
}

/// Outcome of an availability query.
#[derive(Debug, Clone)]
pub struct Availability {
    pub available: bool,
    pub conflicts: Vec<Booking>,
}

/// Fields a caller supplies to create a booking.
#[derive(Debug, Clone)]
pub struct CreateBooking {
    pub barber_id: i32,
    pub service_id: i32,
    pub start_time: NaiveDateTime,
    pub duration_minutes: i32,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub notes: Option<String>,
}

#[derive(Clone)]
pub struct BookingService {
    bookings: BookingRepository,
    barbers: BarberRepository,
    notifications: NotificationRepository,
    catalog: CatalogService,
    cache: CacheManager,
}

impl BookingService {
    pub fn new(
        bookings: BookingRepository,
        barbers: BarberRepository,
        notifications: NotificationRepository,
        catalog: CatalogService,
        cache: CacheManager,
    ) -> Self {
        Self {
            bookings,
            barbers,
            notifications,
            catalog,
            cache,
        }
    }

    /// Read-only availability check for a candidate slot.
    pub async fn check_availability(
        &self,
        barber_id: i32,
        start_time: NaiveDateTime,
        duration_minutes: i32,
    ) -> AppResult<Availability> {
        self.barbers
            .find_by_id(barber_id)
            .await?
            .ok_or_else(|| AppError::not_found("Barber", barber_id))?;

        let end_time = validate_slot(start_time, duration_minutes, Utc::now().naive_utc())?;

        let conflicts = self
            .bookings
            .find_conflicts(barber_id, start_time, end_time, None)
            .await?;

        Ok(Availability {
            available: conflicts.is_empty(),
            conflicts,
        })
    }

    /// Creates a booking in `pending` status.
    ///
    /// `requester` is None for guest bookings; a registered customer is
    /// linked via `customer_id` so the booking shows up in their listings.
    pub async fn create_booking(
        &self,
        request: CreateBooking,
        requester: Option<Requester>,
    ) -> AppResult<Booking> {
        let barber = self
            .barbers
            .find_by_id(request.barber_id)
            .await?
            .ok_or_else(|| AppError::not_found("Barber", request.barber_id))?;
        if !barber.active {
            return Err(AppError::BadRequest {
                message: format!("Barber {} is not accepting bookings", barber.id),
            });
        }

        let end_time = validate_slot(
            request.start_time,
            request.duration_minutes,
            Utc::now().naive_utc(),
        )?;

        let (_, price) = self
            .catalog
            .effective_offering(request.barber_id, request.service_id)
            .await?;

        let actor = requester.map(|r| r.actor()).unwrap_or(Actor {
            user_id: None,
            role: UserRole::Customer,
        });

        let booking = self
            .create_with_fresh_number(&request, end_time, price, actor)
            .await?;

        self.invalidate_barber_caches(booking.barber_id).await;

        self.notify(
            barber.user_id,
            notification_kind::BOOKING_CREATED,
            "New booking",
            format!(
                "Booking {} for {} at {}",
                booking.booking_number, booking.customer_name, booking.start_time
            ),
        )
        .await;

        Ok(booking)
    }

    pub async fn get_booking(&self, id: i32, requester: Requester) -> AppResult<Booking> {
        let booking = self
            .bookings
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Booking", id))?;

        self.ensure_can_access(&booking, requester).await?;
        Ok(booking)
    }

    /// Guest lookup by the human-readable booking number.
    pub async fn get_by_number(&self, number: &str) -> AppResult<Booking> {
        self.bookings
            .find_by_number(number)
            .await?
            .ok_or_else(|| AppError::NotFound {
                entity: "Booking".to_string(),
                field: "booking_number".to_string(),
                value: number.to_string(),
            })
    }

    /// Applies a status transition. Ownership is checked first (Forbidden),
    /// then the role-gated transition table (InvalidTransition) inside the
    /// repository transaction.
    pub async fn update_status(
        &self,
        id: i32,
        to: BookingStatus,
        requester: Requester,
        reason: Option<String>,
    ) -> AppResult<Booking> {
        let booking = self.get_booking(id, requester).await?;

        let updated = self
            .bookings
            .update_status_checked(booking.id, to, requester.actor(), reason)
            .await?;

        self.invalidate_barber_caches(updated.barber_id).await;
        self.notify_participants(
            &updated,
            notification_kind::BOOKING_STATUS,
            "Booking status changed",
            format!(
                "Booking {} is now {}",
                updated.booking_number,
                updated.status.as_str()
            ),
        )
        .await;

        Ok(updated)
    }

    /// Cancels a booking; sugar over the `cancelled` transition.
    pub async fn cancel(
        &self,
        id: i32,
        requester: Requester,
        reason: Option<String>,
    ) -> AppResult<Booking> {
        self.update_status(id, BookingStatus::Cancelled, requester, reason)
            .await
    }

    /// Moves a booking to a new slot, preserving its status.
    pub async fn reschedule(
        &self,
        id: i32,
        new_start: NaiveDateTime,
        duration_minutes: i32,
        requester: Requester,
        reason: Option<String>,
    ) -> AppResult<Booking> {
        let booking = self.get_booking(id, requester).await?;

        if booking.status.is_terminal() {
            return Err(AppError::InvalidTransition {
                from: booking.status.as_str().to_string(),
                to: booking.status.as_str().to_string(),
            });
        }

        let new_end = validate_slot(new_start, duration_minutes, Utc::now().naive_utc())?;

        let updated = self
            .bookings
            .reschedule_checked(booking.id, new_start, new_end, requester.actor(), reason)
            .await?;

        self.invalidate_barber_caches(updated.barber_id).await;
        self.notify_participants(
            &updated,
            notification_kind::BOOKING_RESCHEDULED,
            "Booking rescheduled",
            format!(
                "Booking {} moved to {}",
                updated.booking_number, updated.start_time
            ),
        )
        .await;

        Ok(updated)
    }

    /// A customer's own bookings.
    pub async fn list_for_customer(
        &self,
        requester: Requester,
        status: Option<BookingStatus>,
        page: i64,
        per_page: i64,
    ) -> AppResult<Vec<Booking>> {
        let offset = (page - 1) * per_page;
        self.bookings
            .list_by_customer(requester.user_id, status, per_page, offset)
            .await
    }

    /// A barber's schedule within a window. Barbers see their own; admins see
    /// any.
    pub async fn barber_schedule(
        &self,
        barber_id: i32,
        from: NaiveDateTime,
        to: NaiveDateTime,
        status: Option<BookingStatus>,
        requester: Requester,
    ) -> AppResult<Vec<Booking>> {
        if requester.role != UserRole::Admin {
            let barber = self
                .barbers
                .find_by_id(barber_id)
                .await?
                .ok_or_else(|| AppError::not_found("Barber", barber_id))?;
            if barber.user_id != requester.user_id {
                return Err(AppError::forbidden("Not your schedule"));
            }
        }

        self.bookings
            .list_by_barber(barber_id, from, to, status)
            .await
    }

    /// Audit trail for a booking.
    pub async fn history(&self, id: i32, requester: Requester) -> AppResult<Vec<BookingHistory>> {
        self.get_booking(id, requester).await?;
        self.bookings.history(id).await
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Retries the insert a few times when the generated booking number
    /// collides with an existing one.
    async fn create_with_fresh_number(
        &self,
        request: &CreateBooking,
        end_time: NaiveDateTime,
        price: BigDecimal,
        actor: Actor,
    ) -> AppResult<Booking> {
        const MAX_ATTEMPTS: usize = 3;

        for attempt in 1..=MAX_ATTEMPTS {
            let new_booking = NewBooking {
                booking_number: generate_booking_number(Utc::now().naive_utc()),
                barber_id: request.barber_id,
                service_id: request.service_id,
                customer_id: actor.user_id,
                customer_name: request.customer_name.clone(),
                customer_phone: request.customer_phone.clone(),
                customer_email: request.customer_email.clone(),
                start_time: request.start_time,
                end_time,
                duration_minutes: request.duration_minutes,
                status: BookingStatus::Pending,
                price: price.clone(),
                notes: request.notes.clone(),
            };

            match self.bookings.create_checked(new_booking, actor).await {
                Err(AppError::Duplicate { ref field, .. })
                    if field == "booking_number" && attempt < MAX_ATTEMPTS =>
                {
                    continue;
                }
                other => return other,
            }
        }

        unreachable!("loop returns on the final attempt")
    }

    async fn ensure_can_access(&self, booking: &Booking, requester: Requester) -> AppResult<()> {
        match requester.role {
            UserRole::Admin => Ok(()),
            UserRole::Customer => {
                if booking.customer_id == Some(requester.user_id) {
                    Ok(())
                } else {
                    Err(AppError::forbidden("Not your booking"))
                }
            }
            UserRole::Barber => {
                let barber = self
                    .barbers
                    .find_by_id(booking.barber_id)
                    .await?
                    .ok_or_else(|| AppError::not_found("Barber", booking.barber_id))?;
                if barber.user_id == requester.user_id {
                    Ok(())
                } else {
                    Err(AppError::forbidden("Not your booking"))
                }
            }
        }
    }

    /// Stats and search pages derived from this barber's bookings go stale on
    /// every booking write.
    async fn invalidate_barber_caches(&self, barber_id: i32) {
        self.cache
            .invalidate(&keys::barber_stats_key(barber_id))
            .await;
        self.cache
            .invalidate_prefix(keys::BARBER_SEARCH_PREFIX)
            .await;
    }

    /// Notify the barber and, when registered, the customer.
    async fn notify_participants(&self, booking: &Booking, kind: &str, title: &str, body: String) {
        match self.barbers.find_by_id(booking.barber_id).await {
            Ok(Some(barber)) => {
                self.notify(barber.user_id, kind, title, body.clone()).await;
            }
            Ok(None) => {}
            Err(e) => warn!(booking_id = booking.id, error = %e, "Failed to resolve barber for notification"),
        }

        if let Some(customer_id) = booking.customer_id {
            self.notify(customer_id, kind, title, body).await;
        }
    }

    /// Notifications are best-effort: a failure is logged and never fails the
    /// booking operation it decorates.
    async fn notify(&self, user_id: i32, kind: &str, title: &str, body: String) {
        let result = self
            .notifications
            .create(NewNotification {
                user_id,
                kind: kind.to_string(),
                title: title.to_string(),
                body,
            })
            .await;

        if let Err(e) = result {
            warn!(user_id, kind, error = %e, "Failed to record notification");
        }
    }
}

/// Validates a candidate slot and returns its end time.
///
/// The slot must start strictly in the future and run for at least
/// [`MIN_DURATION_MINUTES`].
pub fn validate_slot(
    start: NaiveDateTime,
    duration_minutes: i32,
    now: NaiveDateTime,
) -> AppResult<NaiveDateTime> {
    if duration_minutes < MIN_DURATION_MINUTES {
        return Err(AppError::Validation {
            field: "duration_minutes".to_string(),
            reason: format!("must be at least {} minutes", MIN_DURATION_MINUTES),
        });
    }

    if start <= now {
        return Err(AppError::Validation {
            field: "start_time".to_string(),
            reason: "must be in the future".to_string(),
        });
    }

    Ok(start + Duration::minutes(i64::from(duration_minutes)))
}

/// Builds a human-readable booking number: `BK-YYYYMMDD-XXXXXX`.
///
/// The suffix alphabet omits easily-confused characters (0/O, 1/I/L).
pub fn generate_booking_number(now: NaiveDateTime) -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..BOOKING_NUMBER_SUFFIX_LEN)
        .map(|_| {
            let idx = rng.random_range(0..BOOKING_NUMBER_CHARSET.len());
            BOOKING_NUMBER_CHARSET[idx] as char
        })
        .collect();

    format!("BK-{}-{}", now.format("%Y%m%d"), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, 25)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn slot_in_the_past_is_rejected() {
        let err = validate_slot(dt(9, 0), 30, dt(10, 0)).unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "start_time"));
    }

    #[test]
    fn slot_starting_exactly_now_is_rejected() {
        let err = validate_slot(dt(10, 0), 30, dt(10, 0)).unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "start_time"));
    }

    #[test]
    fn slot_below_minimum_duration_is_rejected() {
        let err = validate_slot(dt(12, 0), 14, dt(10, 0)).unwrap_err();
        assert!(
            matches!(err, AppError::Validation { ref field, .. } if field == "duration_minutes")
        );
    }

    #[test]
    fn valid_slot_computes_end_time() {
        let end = validate_slot(dt(12, 0), 45, dt(10, 0)).unwrap();
        assert_eq!(end, dt(12, 45));
    }

    #[test]
    fn minimum_duration_is_accepted() {
        let end = validate_slot(dt(12, 0), MIN_DURATION_MINUTES, dt(10, 0)).unwrap();
        assert_eq!(end, dt(12, 15));
    }

    #[test]
    fn booking_number_has_expected_shape() {
        let now = dt(12, 0);
        let number = generate_booking_number(now);

        assert!(number.starts_with("BK-20260825-"));
        let suffix = number.rsplit('-').next().unwrap();
        assert_eq!(suffix.len(), BOOKING_NUMBER_SUFFIX_LEN);
        assert!(suffix
            .bytes()
            .all(|b| BOOKING_NUMBER_CHARSET.contains(&b)));
    }

    #[test]
    fn booking_numbers_are_not_constant() {
        let now = dt(12, 0);
        let a = generate_booking_number(now);
        let b = generate_booking_number(now);
        // Astronomically unlikely to collide with a 31^6 suffix space.
        assert_ne!(a, b);
    }
}
