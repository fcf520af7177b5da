//! Rental contract model and request types

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::customer::ProspectiveCustomer;
use super::enums::{ContractLanguage, ContractStatus};

/// Departure-inspection snapshot denormalized onto the contract for audit
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DepartureDetails {
    pub mileage: i32,
    pub fuel_level: super::enums::FuelLevel,
    pub notes: String,
    pub photos: Vec<String>,
}

/// Contract model from database
///
/// Customer fields are free text until the visitor signs; `reservation_id`
/// and `customer_id` stay empty for a pre-contract.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Contract {
    pub id: Uuid,
    pub reservation_id: Option<String>,
    pub customer_id: Option<String>,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub vehicle_id: String,
    pub vehicle_name: String,
    pub pickup_date: NaiveDate,
    pub dropoff_date: NaiveDate,
    pub total_cost: Decimal,
    pub status: ContractStatus,
    pub language: String,
    /// Generated contract body text
    pub content: String,
    pub client_signature_url: Option<String>,
    pub client_id_photo_url: Option<String>,
    pub agent_signature_url: Option<String>,
    #[schema(value_type = Option<DepartureDetails>)]
    pub departure_details: Option<Json<DepartureDetails>>,
    pub created_at: DateTime<Utc>,
    pub signed_at: Option<DateTime<Utc>>,
}

/// Vehicle fields the booking form sends when requesting a pre-contract
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct PreContractVehicle {
    #[validate(length(min = 1, message = "vehicle.id is required"))]
    pub id: String,
    #[validate(length(min = 1, message = "vehicle.make is required"))]
    pub make: String,
    #[validate(length(min = 1, message = "vehicle.model is required"))]
    pub model: String,
}

/// Public request to create a pre-contract for review and signature
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreatePreContract {
    #[validate(nested)]
    pub vehicle: PreContractVehicle,
    #[validate(nested)]
    pub customer_data: ProspectiveCustomer,
    pub pickup_date: NaiveDate,
    pub dropoff_date: NaiveDate,
    /// Per-day insurance rate quoted to the visitor
    #[serde(default)]
    pub insurance_cost: Decimal,
    pub total_cost: Decimal,
    #[serde(default)]
    pub language: ContractLanguage,
}

/// Fully-resolved pre-contract write, content already generated
#[derive(Debug, Clone)]
pub struct NewContract {
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub vehicle_id: String,
    pub vehicle_name: String,
    pub pickup_date: NaiveDate,
    pub dropoff_date: NaiveDate,
    pub total_cost: Decimal,
    pub language: ContractLanguage,
    pub content: String,
}

/// Everything the finalize transaction stamps onto the contract. The
/// signer's identity also backs the customer row the new reservation
/// references.
#[derive(Debug, Clone)]
pub struct ContractSignature {
    pub customer_id: String,
    pub customer_name: String,
    pub client_signature_url: String,
    pub client_id_photo_url: String,
    pub signed_at: DateTime<Utc>,
}
