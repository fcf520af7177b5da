//! Customer model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Customer record. Customer CRUD lives in the back-office screens; this
/// server only looks customers up to validate staff-created reservations.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub id_or_passport: String,
    pub license: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

/// Free-text customer details supplied by an unauthenticated visitor when
/// requesting a pre-contract. Not bound to a customer id until signing.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, validator::Validate)]
pub struct ProspectiveCustomer {
    #[validate(length(min = 1, message = "customer name is required"))]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}
