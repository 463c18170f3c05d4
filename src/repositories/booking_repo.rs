//! Booking repository.
//!
//! Conflict checking and the writes it protects run inside a single
//! transaction that first locks the barber row. Two concurrent requests for
//! the same barber therefore serialize, and the second one sees the first
//! one's booking when it runs its own overlap query.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult};
use crate::models::{
    ACTIVE_STATUSES, Barber, Booking, BookingHistory, BookingStatus, NewBooking,
    NewBookingHistory, UserRole, history_action, transition_allowed,
};

#[derive(Clone)]
pub struct BookingRepository {
    pool: AsyncDbPool,
}

/// Who is performing a booking mutation, for the history trail.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub user_id: Option<i32>,
    pub role: UserRole,
}

impl BookingRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, booking_id: i32) -> AppResult<Option<Booking>> {
        use crate::schema::bookings::dsl::*;
        let mut conn = self.pool.get().await?;

        bookings
            .filter(id.eq(booking_id))
            .select(Booking::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    pub async fn find_by_number(&self, number: &str) -> AppResult<Option<Booking>> {
        use crate::schema::bookings::dsl::*;
        let mut conn = self.pool.get().await?;

        bookings
            .filter(booking_number.eq(number))
            .select(Booking::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    /// Active bookings for a barber that overlap the half-open interval
    /// `[slot_start, slot_end)`.
    ///
    /// This read is advisory: the authoritative check runs again inside the
    /// create/reschedule transaction.
    pub async fn find_conflicts(
        &self,
        for_barber: i32,
        slot_start: NaiveDateTime,
        slot_end: NaiveDateTime,
        exclude_booking: Option<i32>,
    ) -> AppResult<Vec<Booking>> {
        let mut conn = self.pool.get().await?;
        Self::conflicts_query(&mut conn, for_barber, slot_start, slot_end, exclude_booking).await
    }

    /// Creates a booking after an in-transaction conflict check, writing the
    /// `created` history entry in the same transaction.
    pub async fn create_checked(&self, new_booking: NewBooking, actor: Actor) -> AppResult<Booking> {
        let mut conn = self.pool.get().await?;

        conn.transaction::<Booking, AppError, _>(|conn| {
            async move {
                Self::lock_barber_row(conn, new_booking.barber_id).await?;

                let conflicts = Self::conflicts_query(
                    conn,
                    new_booking.barber_id,
                    new_booking.start_time,
                    new_booking.end_time,
                    None,
                )
                .await?;
                if !conflicts.is_empty() {
                    return Err(AppError::Conflict {
                        message: format!(
                            "Requested slot overlaps {} existing booking(s)",
                            conflicts.len()
                        ),
                    });
                }

                let booking: Booking = {
                    use crate::schema::bookings::dsl::*;
                    diesel::insert_into(bookings)
                        .values(&new_booking)
                        .returning(Booking::as_returning())
                        .get_result(conn)
                        .await?
                };

                Self::insert_history(
                    conn,
                    NewBookingHistory {
                        booking_id: booking.id,
                        action: history_action::CREATED.to_string(),
                        old_status: None,
                        new_status: Some(booking.status.as_str().to_string()),
                        old_start_time: None,
                        new_start_time: Some(booking.start_time),
                        actor_id: actor.user_id,
                        actor_role: actor.role.as_str().to_string(),
                        reason: None,
                    },
                )
                .await?;

                Ok(booking)
            }
            .scope_boxed()
        })
        .await
    }

    /// Moves a booking to a new slot after re-running the conflict check
    /// (excluding the booking itself) under the barber-row lock.
    pub async fn reschedule_checked(
        &self,
        booking_id: i32,
        new_start: NaiveDateTime,
        new_end: NaiveDateTime,
        actor: Actor,
        reason: Option<String>,
    ) -> AppResult<Booking> {
        let mut conn = self.pool.get().await?;

        conn.transaction::<Booking, AppError, _>(|conn| {
            async move {
                let booking = Self::lock_booking_row(conn, booking_id).await?;
                Self::lock_barber_row(conn, booking.barber_id).await?;

                let conflicts = Self::conflicts_query(
                    conn,
                    booking.barber_id,
                    new_start,
                    new_end,
                    Some(booking.id),
                )
                .await?;
                if !conflicts.is_empty() {
                    return Err(AppError::Conflict {
                        message: format!(
                            "Requested slot overlaps {} existing booking(s)",
                            conflicts.len()
                        ),
                    });
                }

                let updated: Booking = {
                    use crate::schema::bookings::dsl::*;
                    diesel::update(bookings.filter(id.eq(booking.id)))
                        .set((
                            start_time.eq(new_start),
                            end_time.eq(new_end),
                            updated_at.eq(diesel::dsl::now),
                        ))
                        .returning(Booking::as_returning())
                        .get_result(conn)
                        .await?
                };

                Self::insert_history(
                    conn,
                    NewBookingHistory {
                        booking_id: booking.id,
                        action: history_action::RESCHEDULED.to_string(),
                        old_status: None,
                        new_status: None,
                        old_start_time: Some(booking.start_time),
                        new_start_time: Some(new_start),
                        actor_id: actor.user_id,
                        actor_role: actor.role.as_str().to_string(),
                        reason,
                    },
                )
                .await?;

                Ok(updated)
            }
            .scope_boxed()
        })
        .await
    }

    /// Applies a status transition, re-reading the current status under a row
    /// lock so a concurrent transition cannot be overwritten.
    pub async fn update_status_checked(
        &self,
        booking_id: i32,
        to: BookingStatus,
        actor: Actor,
        reason: Option<String>,
    ) -> AppResult<Booking> {
        let mut conn = self.pool.get().await?;

        conn.transaction::<Booking, AppError, _>(|conn| {
            async move {
                let booking = Self::lock_booking_row(conn, booking_id).await?;

                if !transition_allowed(booking.status, to, actor.role) {
                    return Err(AppError::InvalidTransition {
                        from: booking.status.as_str().to_string(),
                        to: to.as_str().to_string(),
                    });
                }

                let updated: Booking = {
                    use crate::schema::bookings::dsl::*;
                    diesel::update(bookings.filter(id.eq(booking.id)))
                        .set((status.eq(to), updated_at.eq(diesel::dsl::now)))
                        .returning(Booking::as_returning())
                        .get_result(conn)
                        .await?
                };

                Self::insert_history(
                    conn,
                    NewBookingHistory {
                        booking_id: booking.id,
                        action: history_action::STATUS_CHANGED.to_string(),
                        old_status: Some(booking.status.as_str().to_string()),
                        new_status: Some(to.as_str().to_string()),
                        old_start_time: None,
                        new_start_time: None,
                        actor_id: actor.user_id,
                        actor_role: actor.role.as_str().to_string(),
                        reason,
                    },
                )
                .await?;

                Ok(updated)
            }
            .scope_boxed()
        })
        .await
    }

    /// Bookings made by a customer, newest first.
    pub async fn list_by_customer(
        &self,
        for_customer: i32,
        with_status: Option<BookingStatus>,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<Booking>> {
        use crate::schema::bookings::dsl::*;
        let mut conn = self.pool.get().await?;

        let mut statement = bookings
            .filter(customer_id.eq(for_customer))
            .select(Booking::as_select())
            .order(start_time.desc())
            .limit(limit)
            .offset(offset)
            .into_boxed();

        if let Some(s) = with_status {
            statement = statement.filter(status.eq(s));
        }

        statement.load(&mut conn).await.map_err(AppError::from)
    }

    /// A barber's bookings inside a time window, soonest first.
    pub async fn list_by_barber(
        &self,
        for_barber: i32,
        from: NaiveDateTime,
        to: NaiveDateTime,
        with_status: Option<BookingStatus>,
    ) -> AppResult<Vec<Booking>> {
        use crate::schema::bookings::dsl::*;
        let mut conn = self.pool.get().await?;

        let mut statement = bookings
            .filter(barber_id.eq(for_barber))
            .filter(start_time.ge(from))
            .filter(start_time.lt(to))
            .select(Booking::as_select())
            .order(start_time.asc())
            .into_boxed();

        if let Some(s) = with_status {
            statement = statement.filter(status.eq(s));
        }

        statement.load(&mut conn).await.map_err(AppError::from)
    }

    /// History entries for a booking, oldest first.
    pub async fn history(&self, for_booking: i32) -> AppResult<Vec<BookingHistory>> {
        use crate::schema::booking_history::dsl::*;
        let mut conn = self.pool.get().await?;

        booking_history
            .filter(booking_id.eq(for_booking))
            .select(BookingHistory::as_select())
            .order(created_at.asc())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    // ========================================================================
    // Transaction helpers
    // ========================================================================

    async fn lock_barber_row(conn: &mut AsyncPgConnection, for_barber: i32) -> AppResult<Barber> {
        use crate::schema::barbers::dsl::*;

        barbers
            .filter(id.eq(for_barber))
            .select(Barber::as_select())
            .for_update()
            .first(conn)
            .await
            .optional()?
            .ok_or_else(|| AppError::not_found("Barber", for_barber))
    }

    async fn lock_booking_row(conn: &mut AsyncPgConnection, booking_id: i32) -> AppResult<Booking> {
        use crate::schema::bookings::dsl::*;

        bookings
            .filter(id.eq(booking_id))
            .select(Booking::as_select())
            .for_update()
            .first(conn)
            .await
            .optional()?
            .ok_or_else(|| AppError::not_found("Booking", booking_id))
    }

    async fn conflicts_query(
        conn: &mut AsyncPgConnection,
        for_barber: i32,
        slot_start: NaiveDateTime,
        slot_end: NaiveDateTime,
        exclude_booking: Option<i32>,
    ) -> AppResult<Vec<Booking>> {
        use crate::schema::bookings::dsl::*;

        // Half-open overlap: existing.start < slot_end AND existing.end > slot_start
        let mut statement = bookings
            .filter(barber_id.eq(for_barber))
            .filter(status.eq_any(ACTIVE_STATUSES))
            .filter(start_time.lt(slot_end))
            .filter(end_time.gt(slot_start))
            .select(Booking::as_select())
            .order(start_time.asc())
            .into_boxed();

        if let Some(excluded) = exclude_booking {
            statement = statement.filter(id.ne(excluded));
        }

        statement.load(conn).await.map_err(AppError::from)
    }

    async fn insert_history(
        conn: &mut AsyncPgConnection,
        entry: NewBookingHistory,
    ) -> AppResult<()> {
        use crate::schema::booking_history::dsl::*;

        diesel::insert_into(booking_history)
            .values(&entry)
            .execute(conn)
            .await?;
        Ok(())
    }
}
