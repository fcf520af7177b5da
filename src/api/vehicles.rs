//! Fleet and availability endpoints (public booking flow reads)

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::AppResult,
    models::{enums::VehicleStatus, vehicle::Vehicle},
};

#[derive(Deserialize, IntoParams)]
pub struct ListVehiclesQuery {
    /// Filter by fleet status
    pub status: Option<VehicleStatus>,
}

#[derive(Deserialize, IntoParams)]
pub struct AvailabilityQuery {
    pub pickup: NaiveDate,
    pub dropoff: NaiveDate,
    /// Reservation to ignore when editing an existing booking
    pub exclude: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct AvailabilityResponse {
    pub available: bool,
    /// Blocking booking's pickup date, when not available
    pub conflict_pickup_date: Option<NaiveDate>,
    /// Blocking booking's dropoff date, when not available
    pub conflict_dropoff_date: Option<NaiveDate>,
}

/// List the fleet
#[utoipa::path(
    get,
    path = "/vehicles",
    tag = "vehicles",
    params(ListVehiclesQuery),
    responses(
        (status = 200, description = "Fleet listing", body = Vec<Vehicle>)
    )
)]
pub async fn list_vehicles(
    State(state): State<crate::AppState>,
    Query(query): Query<ListVehiclesQuery>,
) -> AppResult<Json<Vec<Vehicle>>> {
    let vehicles = state.services.fleet.list(query.status).await?;
    Ok(Json(vehicles))
}

/// Get a vehicle
#[utoipa::path(
    get,
    path = "/vehicles/{id}",
    tag = "vehicles",
    params(("id" = String, Path, description = "Vehicle ID")),
    responses(
        (status = 200, description = "Vehicle details", body = Vehicle),
        (status = 404, description = "Vehicle not found")
    )
)]
pub async fn get_vehicle(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vehicle>> {
    let vehicle = state.services.fleet.get(&id).await?;
    Ok(Json(vehicle))
}

/// Advisory availability check for a date range. The authoritative guard
/// runs inside the booking transaction.
#[utoipa::path(
    get,
    path = "/vehicles/{id}/availability",
    tag = "vehicles",
    params(
        ("id" = String, Path, description = "Vehicle ID"),
        AvailabilityQuery
    ),
    responses(
        (status = 200, description = "Availability verdict", body = AvailabilityResponse),
        (status = 400, description = "Invalid date range"),
        (status = 404, description = "Vehicle not found")
    )
)]
pub async fn check_availability(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<AvailabilityResponse>> {
    if query.dropoff < query.pickup {
        return Err(crate::error::AppError::Validation(
            "The drop-off date cannot be before the pickup date.".to_string(),
        ));
    }
    // 404 for unknown vehicles rather than a vacuous "available"
    state.services.fleet.get(&id).await?;

    let conflict = state
        .services
        .availability
        .find_conflict(&id, query.pickup, query.dropoff, query.exclude.as_deref())
        .await?;

    Ok(Json(match conflict {
        Some(c) => AvailabilityResponse {
            available: false,
            conflict_pickup_date: Some(c.pickup_date),
            conflict_dropoff_date: Some(c.dropoff_date),
        },
        None => AvailabilityResponse {
            available: true,
            conflict_pickup_date: None,
            conflict_dropoff_date: None,
        },
    }))
}
