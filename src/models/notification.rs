use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// In-app notification addressed to a user.
#[derive(Debug, Queryable, Selectable, Serialize, Clone)]
#[diesel(table_name = crate::schema::notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Notification {
    pub id: i64,
    pub user_id: i32,
    pub kind: String,
    pub title: String,
    pub body: String,
    pub read: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable, Deserialize, Clone)]
#[diesel(table_name = crate::schema::notifications)]
pub struct NewNotification {
    pub user_id: i32,
    pub kind: String,
    pub title: String,
    pub body: String,
}

/// Notification kind labels used by the booking flow.
pub mod notification_kind {
    pub const BOOKING_CREATED: &str = "booking_created";
    pub const BOOKING_STATUS: &str = "booking_status";
    pub const BOOKING_RESCHEDULED: &str = "booking_rescheduled";
}
