//! Shared domain enums
//!
//! Wire representations keep the exact strings the booking frontend and the
//! stored documents already use (e.g. fuel levels are `"3/4"`, not an
//! identifier), so historic data keeps deserializing.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// VehicleStatus
// ---------------------------------------------------------------------------

/// Fleet status of a vehicle. `Maintenance` is set by the maintenance
/// workflow; this server only ever flips between `Available` and `Rented`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "vehicle_status")]
pub enum VehicleStatus {
    Available,
    Rented,
    Maintenance,
}

impl std::fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            VehicleStatus::Available => "Available",
            VehicleStatus::Rented => "Rented",
            VehicleStatus::Maintenance => "Maintenance",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// VehicleCategory
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "vehicle_category")]
pub enum VehicleCategory {
    Economy,
    Sedan,
    #[serde(rename = "SUV")]
    #[sqlx(rename = "SUV")]
    Suv,
    Luxury,
}

impl std::fmt::Display for VehicleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            VehicleCategory::Economy => "Economy",
            VehicleCategory::Sedan => "Sedan",
            VehicleCategory::Suv => "SUV",
            VehicleCategory::Luxury => "Luxury",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// ReservationStatus
// ---------------------------------------------------------------------------

/// Reservation lifecycle. Transitions are owned by the reservation state
/// machine: Upcoming -> Active -> Completed, Cancelled only from Upcoming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "reservation_status")]
pub enum ReservationStatus {
    Upcoming,
    Active,
    Completed,
    Cancelled,
}

impl ReservationStatus {
    /// A reservation in this status holds its vehicle
    pub fn occupies_vehicle(&self) -> bool {
        matches!(self, ReservationStatus::Upcoming | ReservationStatus::Active)
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ReservationStatus::Upcoming => "Upcoming",
            ReservationStatus::Active => "Active",
            ReservationStatus::Completed => "Completed",
            ReservationStatus::Cancelled => "Cancelled",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// ContractStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "contract_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    PendingSignature,
    SignedByClient,
    Pending,
    Signed,
    Completed,
    Cancelled,
}

impl std::fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ContractStatus::PendingSignature => "pending_signature",
            ContractStatus::SignedByClient => "signed_by_client",
            ContractStatus::Pending => "pending",
            ContractStatus::Signed => "signed",
            ContractStatus::Completed => "completed",
            ContractStatus::Cancelled => "cancelled",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// FuelLevel
// ---------------------------------------------------------------------------

/// Fuel gauge reading captured during an inspection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum FuelLevel {
    Full,
    #[serde(rename = "3/4")]
    ThreeQuarters,
    #[serde(rename = "1/2")]
    Half,
    #[serde(rename = "1/4")]
    Quarter,
    Empty,
}

impl std::fmt::Display for FuelLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FuelLevel::Full => "Full",
            FuelLevel::ThreeQuarters => "3/4",
            FuelLevel::Half => "1/2",
            FuelLevel::Quarter => "1/4",
            FuelLevel::Empty => "Empty",
        };
        write!(f, "{}", label)
    }
}

impl std::str::FromStr for FuelLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Full" => Ok(FuelLevel::Full),
            "3/4" => Ok(FuelLevel::ThreeQuarters),
            "1/2" => Ok(FuelLevel::Half),
            "1/4" => Ok(FuelLevel::Quarter),
            "Empty" => Ok(FuelLevel::Empty),
            _ => Err(format!("Invalid fuel level: {}", s)),
        }
    }
}

// ---------------------------------------------------------------------------
// InspectionDirection
// ---------------------------------------------------------------------------

/// Which end of the rental an inspection belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InspectionDirection {
    Departure,
    Return,
}

impl std::fmt::Display for InspectionDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            InspectionDirection::Departure => "departure",
            InspectionDirection::Return => "return",
        };
        write!(f, "{}", label)
    }
}

impl std::str::FromStr for InspectionDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "departure" => Ok(InspectionDirection::Departure),
            "return" => Ok(InspectionDirection::Return),
            _ => Err(format!("Invalid inspection direction: {}", s)),
        }
    }
}

// ---------------------------------------------------------------------------
// ContractLanguage
// ---------------------------------------------------------------------------

/// Language the draft generator writes the contract in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContractLanguage {
    En,
    #[default]
    Es,
}

impl std::fmt::Display for ContractLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ContractLanguage::En => "en",
            ContractLanguage::Es => "es",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// InvoiceStatus / PaymentMethod
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "invoice_status")]
pub enum InvoiceStatus {
    Paid,
    Pending,
    Overdue,
    Draft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "payment_method")]
pub enum PaymentMethod {
    #[serde(rename = "Credit Card")]
    #[sqlx(rename = "Credit Card")]
    CreditCard,
    #[serde(rename = "Bank Transfer")]
    #[sqlx(rename = "Bank Transfer")]
    BankTransfer,
    Cash,
    #[serde(rename = "N/A")]
    #[sqlx(rename = "N/A")]
    NotApplicable,
}
