//! Data models for the Virtus rental server

pub mod contract;
pub mod customer;
pub mod enums;
pub mod invoice;
pub mod reservation;
pub mod user;
pub mod vehicle;

// Re-export commonly used types
pub use contract::Contract;
pub use customer::Customer;
pub use enums::{ContractStatus, FuelLevel, InspectionDirection, ReservationStatus, VehicleStatus};
pub use invoice::Invoice;
pub use reservation::{Reservation, VehicleInspection};
pub use user::{Role, UserClaims};
pub use vehicle::Vehicle;
