//! Service catalog DTOs.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::api::dto::format_timestamp;
use crate::models::{Category, NewCategory, NewService, Service, UpdateService};

/// Request body for creating a catalog service.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateServiceRequest {
    pub category_id: Option<i32>,
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    pub name: String,
    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,
    #[validate(range(min = 15, max = 480, message = "Duration must be between 15 and 480 minutes"))]
    pub duration_minutes: i32,
    #[schema(value_type = String, example = "35.00")]
    pub price: BigDecimal,
}

impl CreateServiceRequest {
    pub fn into_new_service(self) -> NewService {
        NewService {
            category_id: self.category_id,
            name: self.name,
            description: self.description,
            duration_minutes: self.duration_minutes,
            price: self.price,
            active: true,
        }
    }
}

/// Request body for updating a catalog service.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateServiceRequest {
    pub category_id: Option<i32>,
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,
    #[validate(range(min = 15, max = 480, message = "Duration must be between 15 and 480 minutes"))]
    pub duration_minutes: Option<i32>,
    #[schema(value_type = Option<String>)]
    pub price: Option<BigDecimal>,
    pub active: Option<bool>,
}

impl UpdateServiceRequest {
    pub fn into_update_service(self) -> UpdateService {
        UpdateService {
            category_id: self.category_id,
            name: self.name,
            description: self.description,
            duration_minutes: self.duration_minutes,
            price: self.price,
            active: self.active,
        }
    }
}

/// Request body for creating a category.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    pub name: String,
    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,
}

impl CreateCategoryRequest {
    pub fn into_new_category(self) -> NewCategory {
        NewCategory {
            name: self.name,
            description: self.description,
        }
    }
}

/// Query parameters for service listings.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ServiceListParams {
    /// Restrict the listing to one category
    pub category_id: Option<i32>,
}

/// Request body for assigning a service to a barber.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct AssignServiceRequest {
    pub service_id: i32,
    /// Per-barber price override; base price applies when absent
    #[schema(value_type = Option<String>)]
    pub price_override: Option<BigDecimal>,
}

/// Response body for a catalog service.
#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceResponse {
    pub id: i32,
    pub category_id: Option<i32>,
    pub name: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    #[schema(value_type = String)]
    pub price: BigDecimal,
    pub active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Service> for ServiceResponse {
    fn from(service: Service) -> Self {
        Self {
            id: service.id,
            category_id: service.category_id,
            name: service.name,
            description: service.description,
            duration_minutes: service.duration_minutes,
            price: service.price,
            active: service.active,
            created_at: format_timestamp(service.created_at),
            updated_at: format_timestamp(service.updated_at),
        }
    }
}

/// A service as offered by a specific barber, with the effective price.
#[derive(Debug, Serialize, ToSchema)]
pub struct OfferingResponse {
    pub service: ServiceResponse,
    #[schema(value_type = String)]
    pub effective_price: BigDecimal,
}

impl OfferingResponse {
    pub fn new(service: Service, effective_price: BigDecimal) -> Self {
        Self {
            service: ServiceResponse::from(service),
            effective_price,
        }
    }
}

/// Response body for a category.
#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: String,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            description: category.description,
            created_at: format_timestamp(category.created_at),
        }
    }
}
