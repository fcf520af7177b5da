//! Reservation model, embedded inspections, and request types

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::enums::{FuelLevel, ReservationStatus};

/// Calendar-day count between pickup and dropoff, minimum 1
pub fn rental_days(pickup: NaiveDate, dropoff: NaiveDate) -> i64 {
    (dropoff - pickup).num_days().max(1)
}

/// Vehicle condition captured at departure or return. Owned by the
/// reservation (stored as an embedded JSONB document) and immutable once
/// written.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VehicleInspection {
    /// Photo URLs in fixed order: front, right, back, left
    pub photos: Vec<String>,
    pub notes: String,
    pub fuel_level: FuelLevel,
    pub mileage: i32,
    pub signature_url: String,
    pub timestamp: DateTime<Utc>,
}

/// Reservation model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Reservation {
    pub id: String,
    pub customer_id: String,
    /// Snapshot of the customer's name at booking time, never re-synced
    pub customer_name: String,
    pub vehicle_id: String,
    /// Snapshot of "make model" at booking time, never re-synced
    pub vehicle_name: String,
    pub pickup_date: NaiveDate,
    pub dropoff_date: NaiveDate,
    pub status: ReservationStatus,
    /// Who created the booking (staff display name or "Online System")
    pub agent: String,
    /// Per-day insurance rate
    pub insurance_cost: Decimal,
    pub total_cost: Decimal,
    #[schema(value_type = Option<VehicleInspection>)]
    pub departure_inspection: Option<Json<VehicleInspection>>,
    #[schema(value_type = Option<VehicleInspection>)]
    pub return_inspection: Option<Json<VehicleInspection>>,
    pub contract_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Staff request to create a reservation (bypassing the contract flow)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateReservation {
    #[validate(length(min = 1, message = "customer_id is required"))]
    pub customer_id: String,
    #[validate(length(min = 1, message = "vehicle_id is required"))]
    pub vehicle_id: String,
    pub pickup_date: NaiveDate,
    pub dropoff_date: NaiveDate,
    #[serde(default = "default_status")]
    pub status: ReservationStatus,
    /// Per-day insurance rate chosen for the booking
    pub insurance_cost: Decimal,
}

fn default_status() -> ReservationStatus {
    ReservationStatus::Upcoming
}

/// Staff request to edit an existing reservation
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateReservation {
    #[validate(length(min = 1, message = "vehicle_id is required"))]
    pub vehicle_id: String,
    pub pickup_date: NaiveDate,
    pub dropoff_date: NaiveDate,
    pub status: ReservationStatus,
    pub insurance_cost: Decimal,
}

/// Fully-resolved write passed to the repository once validation, costing
/// and the advisory availability check have run
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub customer_id: String,
    pub customer_name: String,
    pub vehicle_id: String,
    pub vehicle_name: String,
    pub pickup_date: NaiveDate,
    pub dropoff_date: NaiveDate,
    pub status: ReservationStatus,
    pub agent: String,
    pub insurance_cost: Decimal,
    pub total_cost: Decimal,
    pub contract_id: Option<Uuid>,
}
