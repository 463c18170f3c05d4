//! Booking models and the booking status state machine.
//!
//! The transition table and the interval-overlap predicate live here so the
//! scheduling rules are data-driven and testable without a database.

use chrono::NaiveDateTime;
use diesel::AsExpression;
use diesel::FromSqlRow;
use diesel::deserialize::{self, FromSql};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::serialize::{self, Output, ToSql};
use diesel::sql_types::Text;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::models::UserRole;

/// Lifecycle status of a booking.
///
/// Non-terminal statuses occupy the barber's time slot; terminal statuses
/// free it and accept no further transitions.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    utoipa::ToSchema,
    AsExpression,
    FromSqlRow,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    NoShow,
}

/// Statuses that still occupy a time slot. Only these count for conflicts.
pub const ACTIVE_STATUSES: [BookingStatus; 3] = [
    BookingStatus::Pending,
    BookingStatus::Confirmed,
    BookingStatus::InProgress,
];

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::InProgress => "in_progress",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::NoShow => "no_show",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BookingStatus::Completed | BookingStatus::Cancelled | BookingStatus::NoShow
        )
    }

    pub const ALL: [BookingStatus; 6] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::InProgress,
        BookingStatus::Completed,
        BookingStatus::Cancelled,
        BookingStatus::NoShow,
    ];
}

impl std::str::FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "in_progress" => Ok(BookingStatus::InProgress),
            "completed" => Ok(BookingStatus::Completed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "no_show" => Ok(BookingStatus::NoShow),
            other => Err(format!("Unrecognized booking status: {}", other)),
        }
    }
}

impl diesel::query_builder::QueryId for BookingStatus {
    type QueryId = BookingStatus;
    const HAS_STATIC_QUERY_ID: bool = false;
}

impl ToSql<Text, Pg> for BookingStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(serialize::IsNull::No)
    }
}

impl FromSql<Text, Pg> for BookingStatus {
    fn from_sql(
        bytes: <Pg as diesel::backend::Backend>::RawValue<'_>,
    ) -> deserialize::Result<Self> {
        let s = <String as FromSql<Text, Pg>>::from_sql(bytes)?;
        s.parse().map_err(|e: String| e.into())
    }
}

/// Checks whether the role-gated transition `from -> to` is permitted.
///
/// Ownership (a customer may only touch their own booking) is checked by the
/// caller before this table is consulted. Terminal statuses have no rows.
pub fn transition_allowed(from: BookingStatus, to: BookingStatus, actor: UserRole) -> bool {
    use BookingStatus::*;

    match (from, to) {
        (Pending, Confirmed) => actor.is_staff(),
        (Pending, Cancelled) | (Confirmed, Cancelled) => true,
        (Confirmed, InProgress) => actor.is_staff(),
        (InProgress, Completed) => actor.is_staff(),
        (f, NoShow) if !f.is_terminal() => actor.is_staff(),
        _ => false,
    }
}

/// Half-open interval overlap test for `[a_start, a_end)` and
/// `[b_start, b_end)`. A booking that ends exactly when another begins does
/// not conflict.
pub fn intervals_overlap(
    a_start: NaiveDateTime,
    a_end: NaiveDateTime,
    b_start: NaiveDateTime,
    b_end: NaiveDateTime,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// Booking model for reading from database
#[derive(Debug, Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::bookings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Booking {
    pub id: i32,
    pub booking_number: String,
    pub barber_id: i32,
    pub service_id: i32,
    pub customer_id: Option<i32>,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub duration_minutes: i32,
    pub status: BookingStatus,
    pub price: BigDecimal,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// NewBooking model for inserting new records
#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::bookings)]
pub struct NewBooking {
    pub booking_number: String,
    pub barber_id: i32,
    pub service_id: i32,
    pub customer_id: Option<i32>,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub duration_minutes: i32,
    pub status: BookingStatus,
    pub price: BigDecimal,
    pub notes: Option<String>,
}

/// Audit record for booking mutations (status changes and reschedules).
#[derive(Debug, Queryable, Selectable, Serialize, Clone)]
#[diesel(table_name = crate::schema::booking_history)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BookingHistory {
    pub id: i64,
    pub booking_id: i32,
    pub action: String,
    pub old_status: Option<String>,
    pub new_status: Option<String>,
    pub old_start_time: Option<NaiveDateTime>,
    pub new_start_time: Option<NaiveDateTime>,
    pub actor_id: Option<i32>,
    pub actor_role: String,
    pub reason: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::booking_history)]
pub struct NewBookingHistory {
    pub booking_id: i32,
    pub action: String,
    pub old_status: Option<String>,
    pub new_status: Option<String>,
    pub old_start_time: Option<NaiveDateTime>,
    pub new_start_time: Option<NaiveDateTime>,
    pub actor_id: Option<i32>,
    pub actor_role: String,
    pub reason: Option<String>,
}

/// History action labels.
pub mod history_action {
    pub const CREATED: &str = "created";
    pub const STATUS_CHANGED: &str = "status_changed";
    pub const RESCHEDULED: &str = "rescheduled";
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn ts(hour: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 14)
            .unwrap()
            .and_hms_opt(hour, min, 0)
            .unwrap()
    }

    #[test]
    fn terminal_statuses() {
        assert!(!BookingStatus::Pending.is_terminal());
        assert!(!BookingStatus::Confirmed.is_terminal());
        assert!(!BookingStatus::InProgress.is_terminal());
        assert!(BookingStatus::Completed.is_terminal());
        assert!(BookingStatus::Cancelled.is_terminal());
        assert!(BookingStatus::NoShow.is_terminal());
    }

    #[test]
    fn active_statuses_are_exactly_the_non_terminal_ones() {
        for status in BookingStatus::ALL {
            assert_eq!(ACTIVE_STATUSES.contains(&status), !status.is_terminal());
        }
    }

    #[test]
    fn back_to_back_bookings_do_not_overlap() {
        // [10:00, 10:45) and [10:45, 11:30) share only the boundary instant
        assert!(!intervals_overlap(ts(10, 0), ts(10, 45), ts(10, 45), ts(11, 30)));
        assert!(!intervals_overlap(ts(10, 45), ts(11, 30), ts(10, 0), ts(10, 45)));
    }

    #[test]
    fn partial_and_contained_overlaps_detected() {
        // 15-minute overlap
        assert!(intervals_overlap(ts(10, 0), ts(10, 45), ts(10, 30), ts(11, 15)));
        // fully contained
        assert!(intervals_overlap(ts(10, 0), ts(12, 0), ts(10, 30), ts(11, 0)));
        // identical
        assert!(intervals_overlap(ts(10, 0), ts(10, 45), ts(10, 0), ts(10, 45)));
        // disjoint
        assert!(!intervals_overlap(ts(10, 0), ts(10, 45), ts(12, 0), ts(12, 45)));
    }

    /// Exhaustive check of the transition table: every (from, to, actor)
    /// triple outside the documented set must be rejected.
    #[test]
    fn transition_table_is_exhaustive() {
        use BookingStatus::*;
        use UserRole::*;

        let allowed: &[(BookingStatus, BookingStatus, &[UserRole])] = &[
            (Pending, Confirmed, &[Barber, Admin]),
            (Pending, Cancelled, &[Customer, Barber, Admin]),
            (Confirmed, InProgress, &[Barber, Admin]),
            (Confirmed, Cancelled, &[Customer, Barber, Admin]),
            (InProgress, Completed, &[Barber, Admin]),
            (Pending, NoShow, &[Barber, Admin]),
            (Confirmed, NoShow, &[Barber, Admin]),
            (InProgress, NoShow, &[Barber, Admin]),
        ];

        for from in BookingStatus::ALL {
            for to in BookingStatus::ALL {
                for actor in [Customer, Barber, Admin] {
                    let expected = allowed
                        .iter()
                        .any(|(f, t, roles)| *f == from && *t == to && roles.contains(&actor));
                    assert_eq!(
                        transition_allowed(from, to, actor),
                        expected,
                        "transition {:?} -> {:?} by {:?}",
                        from,
                        to,
                        actor
                    );
                }
            }
        }
    }

    #[test]
    fn terminal_states_accept_no_transition() {
        for from in [
            BookingStatus::Completed,
            BookingStatus::Cancelled,
            BookingStatus::NoShow,
        ] {
            for to in BookingStatus::ALL {
                for actor in [UserRole::Customer, UserRole::Barber, UserRole::Admin] {
                    assert!(!transition_allowed(from, to, actor));
                }
            }
        }
    }

    #[test]
    fn customer_cannot_jump_pending_to_completed() {
        assert!(!transition_allowed(
            BookingStatus::Pending,
            BookingStatus::Completed,
            UserRole::Customer
        ));
        assert!(!transition_allowed(
            BookingStatus::Pending,
            BookingStatus::Completed,
            UserRole::Barber
        ));
    }

    proptest! {
        /// Overlap is symmetric in its two intervals.
        #[test]
        fn overlap_is_symmetric(a in 0i64..10_000, b in 1i64..500, c in 0i64..10_000, d in 1i64..500) {
            let base = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
            let a_start = base + chrono::Duration::minutes(a);
            let a_end = a_start + chrono::Duration::minutes(b);
            let b_start = base + chrono::Duration::minutes(c);
            let b_end = b_start + chrono::Duration::minutes(d);
            prop_assert_eq!(
                intervals_overlap(a_start, a_end, b_start, b_end),
                intervals_overlap(b_start, b_end, a_start, a_end)
            );
        }

        /// A booking never overlaps an interval that starts at or after its end.
        #[test]
        fn no_overlap_past_end(a in 0i64..10_000, b in 1i64..500, gap in 0i64..500, d in 1i64..500) {
            let base = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
            let a_start = base + chrono::Duration::minutes(a);
            let a_end = a_start + chrono::Duration::minutes(b);
            let b_start = a_end + chrono::Duration::minutes(gap);
            let b_end = b_start + chrono::Duration::minutes(d);
            prop_assert!(!intervals_overlap(a_start, a_end, b_start, b_end));
        }
    }
}
