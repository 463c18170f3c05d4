use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// Catalog service (haircut, shave, ...), optionally grouped by category.
#[derive(Debug, Queryable, Selectable, Serialize, Deserialize, Clone)]
#[diesel(table_name = crate::schema::services)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Service {
    pub id: i32,
    pub category_id: Option<i32>,
    pub name: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub price: BigDecimal,
    pub active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Insertable, Deserialize, Clone)]
#[diesel(table_name = crate::schema::services)]
pub struct NewService {
    pub category_id: Option<i32>,
    pub name: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub price: BigDecimal,
    pub active: bool,
}

#[derive(Debug, AsChangeset, Deserialize, Clone, Default)]
#[diesel(table_name = crate::schema::services)]
pub struct UpdateService {
    pub category_id: Option<i32>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub duration_minutes: Option<i32>,
    pub price: Option<BigDecimal>,
    pub active: Option<bool>,
}

#[derive(Debug, Queryable, Selectable, Serialize, Deserialize, Clone)]
#[diesel(table_name = crate::schema::categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable, Deserialize, Clone)]
#[diesel(table_name = crate::schema::categories)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
}

/// Link between a barber and a catalog service they offer, with an optional
/// per-barber price override.
#[derive(Debug, Queryable, Selectable, Serialize, Deserialize, Clone)]
#[diesel(table_name = crate::schema::barber_services)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BarberService {
    pub id: i32,
    pub barber_id: i32,
    pub service_id: i32,
    pub price_override: Option<BigDecimal>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable, Deserialize, Clone)]
#[diesel(table_name = crate::schema::barber_services)]
pub struct NewBarberService {
    pub barber_id: i32,
    pub service_id: i32,
    pub price_override: Option<BigDecimal>,
}
