//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{contracts, health, reservations, vehicles};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Virtus Rental API",
        version = "1.0.0",
        description = "Vehicle Rental Management REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html"),
        contact(name = "Virtus Team", email = "contact@virtusrental.com")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Vehicles
        vehicles::list_vehicles,
        vehicles::get_vehicle,
        vehicles::check_availability,
        // Reservations
        reservations::list_reservations,
        reservations::get_reservation,
        reservations::create_reservation,
        reservations::update_reservation,
        reservations::cancel_reservation,
        reservations::generate_checklist,
        reservations::smart_reply,
        // Inspections
        reservations::record_inspection,
        reservations::get_inspection,
        // Contracts
        contracts::create_contract,
        contracts::get_contract,
        contracts::finalize_contract,
    ),
    components(
        schemas(
            // Vehicles
            crate::models::vehicle::Vehicle,
            crate::models::enums::VehicleStatus,
            crate::models::enums::VehicleCategory,
            vehicles::AvailabilityResponse,
            // Customers
            crate::models::customer::Customer,
            crate::models::customer::ProspectiveCustomer,
            // Reservations
            crate::models::reservation::Reservation,
            crate::models::reservation::CreateReservation,
            crate::models::reservation::UpdateReservation,
            crate::models::reservation::VehicleInspection,
            crate::models::enums::ReservationStatus,
            crate::models::enums::FuelLevel,
            reservations::ReservationResponse,
            reservations::SmartReplyRequest,
            reservations::SmartReplyResponse,
            crate::services::drafts::ChecklistDraft,
            // Contracts
            crate::models::contract::Contract,
            crate::models::contract::CreatePreContract,
            crate::models::contract::PreContractVehicle,
            crate::models::contract::DepartureDetails,
            crate::models::enums::ContractStatus,
            crate::models::enums::ContractLanguage,
            contracts::CreateContractResponse,
            contracts::FinalizeContractResponse,
            // Invoices
            crate::models::invoice::Invoice,
            crate::models::enums::InvoiceStatus,
            crate::models::enums::PaymentMethod,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "vehicles", description = "Fleet and availability"),
        (name = "reservations", description = "Reservation lifecycle"),
        (name = "inspections", description = "Departure and return inspections"),
        (name = "contracts", description = "Rental contract lifecycle")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
