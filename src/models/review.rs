use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// Review of a completed booking, authored by its customer. Rating 1-5.
#[derive(Debug, Queryable, Selectable, Serialize, Clone)]
#[diesel(table_name = crate::schema::reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Review {
    pub id: i32,
    pub booking_id: i32,
    pub barber_id: i32,
    pub customer_id: i32,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Insertable, Deserialize, Clone)]
#[diesel(table_name = crate::schema::reviews)]
pub struct NewReview {
    pub booking_id: i32,
    pub barber_id: i32,
    pub customer_id: i32,
    pub rating: i32,
    pub comment: Option<String>,
}

#[derive(Debug, AsChangeset, Deserialize, Clone, Default)]
#[diesel(table_name = crate::schema::reviews)]
pub struct UpdateReview {
    pub rating: Option<i32>,
    pub comment: Option<String>,
}
