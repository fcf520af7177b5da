//! Vehicle model and related types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::enums::{VehicleCategory, VehicleStatus};

/// Vehicle model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Vehicle {
    pub id: String,
    pub make: String,
    pub model: String,
    pub plate: String,
    pub category: VehicleCategory,
    pub status: VehicleStatus,
    pub price_per_day: Decimal,
    pub insurance_cost: Decimal,
    pub deductible: Decimal,
}

impl Vehicle {
    /// Denormalized descriptive name copied onto reservations and contracts
    pub fn display_name(&self) -> String {
        format!("{} {}", self.make, self.model)
    }
}
