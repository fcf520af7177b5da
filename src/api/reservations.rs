//! Reservation management endpoints (authenticated staff operations)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::Multipart;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::{FuelLevel, InspectionDirection},
        invoice::Invoice,
        reservation::{CreateReservation, Reservation, UpdateReservation, VehicleInspection},
    },
    services::drafts::ChecklistDraft,
    services::inspections::{InspectionSubmission, PHOTO_ANGLES},
};

use super::AuthenticatedUser;

#[derive(Serialize, ToSchema)]
pub struct ReservationResponse {
    pub reservation: Reservation,
    /// Draft invoice generated for the booking total, when the invoice
    /// collaborator succeeded
    pub invoice: Option<Invoice>,
}

#[derive(Deserialize, ToSchema)]
pub struct SmartReplyRequest {
    /// Customer's free-text question
    pub query: String,
}

#[derive(Serialize, ToSchema)]
pub struct SmartReplyResponse {
    pub reply: String,
}

/// List all reservations
#[utoipa::path(
    get,
    path = "/reservations",
    tag = "reservations",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All reservations", body = Vec<Reservation>)
    )
)]
pub async fn list_reservations(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Reservation>>> {
    claims.require_staff()?;
    let reservations = state.services.reservations.list().await?;
    Ok(Json(reservations))
}

/// Get a reservation
#[utoipa::path(
    get,
    path = "/reservations/{id}",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation details", body = Reservation),
        (status = 404, description = "Reservation not found")
    )
)]
pub async fn get_reservation(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<Reservation>> {
    claims.require_staff()?;
    let reservation = state.services.reservations.get(&id).await?;
    Ok(Json(reservation))
}

/// Create a reservation (staff path, bypassing the contract flow)
#[utoipa::path(
    post,
    path = "/reservations",
    tag = "reservations",
    security(("bearer_auth" = [])),
    request_body = CreateReservation,
    responses(
        (status = 201, description = "Reservation created", body = ReservationResponse),
        (status = 400, description = "Invalid dates or missing fields"),
        (status = 404, description = "Customer or vehicle not found"),
        (status = 409, description = "Date range conflicts with an existing booking")
    )
)]
pub async fn create_reservation(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateReservation>,
) -> AppResult<(StatusCode, Json<ReservationResponse>)> {
    claims.require_staff()?;
    let (reservation, invoice) = state.services.reservations.create(request, &claims).await?;
    Ok((
        StatusCode::CREATED,
        Json(ReservationResponse { reservation, invoice }),
    ))
}

/// Edit a reservation
#[utoipa::path(
    put,
    path = "/reservations/{id}",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Reservation ID")),
    request_body = UpdateReservation,
    responses(
        (status = 200, description = "Reservation updated", body = ReservationResponse),
        (status = 404, description = "Reservation or vehicle not found"),
        (status = 409, description = "Date range conflicts with an existing booking")
    )
)]
pub async fn update_reservation(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateReservation>,
) -> AppResult<Json<ReservationResponse>> {
    claims.require_staff()?;
    let (reservation, invoice) = state
        .services
        .reservations
        .update(&id, request, &claims)
        .await?;
    Ok(Json(ReservationResponse { reservation, invoice }))
}

/// Cancel an Upcoming reservation
#[utoipa::path(
    post,
    path = "/reservations/{id}/cancel",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation cancelled", body = Reservation),
        (status = 404, description = "Reservation not found"),
        (status = 422, description = "Reservation is not Upcoming")
    )
)]
pub async fn cancel_reservation(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<Reservation>> {
    claims.require_staff()?;
    let reservation = state.services.reservations.cancel(&id, &claims).await?;
    Ok(Json(reservation))
}

/// Record a departure or return inspection, driving the matching status
/// transition
#[utoipa::path(
    post,
    path = "/reservations/{id}/inspections/{direction}",
    tag = "inspections",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Reservation ID"),
        ("direction" = String, Path, description = "departure or return")
    ),
    request_body(
        content = Vec<u8>,
        content_type = "multipart/form-data",
        description = "mileage, fuel_level, notes, photo_front/right/back/left, signature"
    ),
    responses(
        (status = 200, description = "Inspection recorded", body = Reservation),
        (status = 400, description = "Fewer than four photos or malformed fields"),
        (status = 404, description = "Reservation not found"),
        (status = 409, description = "Inspection already recorded for this direction"),
        (status = 422, description = "Reservation is not in the required status")
    )
)]
pub async fn record_inspection(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path((id, direction)): Path<(String, String)>,
    multipart: Multipart,
) -> AppResult<Json<Reservation>> {
    claims.require_staff()?;
    let direction: InspectionDirection = direction
        .parse()
        .map_err(AppError::Validation)?;

    let submission = read_inspection_parts(multipart).await?;
    let reservation = state
        .services
        .inspections
        .record(&id, direction, submission, &claims)
        .await?;
    Ok(Json(reservation))
}

/// View a recorded inspection (read-only, no side effects)
#[utoipa::path(
    get,
    path = "/reservations/{id}/inspections/{direction}",
    tag = "inspections",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Reservation ID"),
        ("direction" = String, Path, description = "departure or return")
    ),
    responses(
        (status = 200, description = "Recorded inspection", body = VehicleInspection),
        (status = 404, description = "Reservation or inspection not found")
    )
)]
pub async fn get_inspection(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path((id, direction)): Path<(String, String)>,
) -> AppResult<Json<VehicleInspection>> {
    claims.require_staff()?;
    let direction: InspectionDirection = direction
        .parse()
        .map_err(AppError::Validation)?;
    let inspection = state.services.inspections.get(&id, direction).await?;
    Ok(Json(inspection))
}

/// Generate an inspection checklist for the reserved vehicle
#[utoipa::path(
    post,
    path = "/reservations/{id}/checklist",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Generated checklist", body = ChecklistDraft),
        (status = 404, description = "Reservation not found"),
        (status = 502, description = "Draft generator failed")
    )
)]
pub async fn generate_checklist(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<ChecklistDraft>> {
    claims.require_staff()?;
    let checklist = state.services.reservations.checklist(&id).await?;
    Ok(Json(checklist))
}

/// Generate a reply to a customer query in the reservation's context
#[utoipa::path(
    post,
    path = "/reservations/{id}/reply",
    tag = "reservations",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Reservation ID")),
    request_body = SmartReplyRequest,
    responses(
        (status = 200, description = "Generated reply", body = SmartReplyResponse),
        (status = 404, description = "Reservation not found"),
        (status = 502, description = "Draft generator failed")
    )
)]
pub async fn smart_reply(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<String>,
    Json(request): Json<SmartReplyRequest>,
) -> AppResult<Json<SmartReplyResponse>> {
    claims.require_staff()?;
    let reply = state
        .services
        .reservations
        .smart_reply(&id, &request.query)
        .await?;
    Ok(Json(SmartReplyResponse { reply }))
}

async fn read_inspection_parts(mut multipart: Multipart) -> AppResult<InspectionSubmission> {
    let mut mileage: Option<i32> = None;
    let mut fuel_level: Option<FuelLevel> = None;
    let mut notes = String::new();
    let mut photos: [Option<Bytes>; 4] = [None, None, None, None];
    let mut signature = Bytes::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "mileage" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read mileage: {}", e)))?;
                mileage = Some(
                    text.parse()
                        .map_err(|_| AppError::Validation("mileage must be an integer".to_string()))?,
                );
            }
            "fuel_level" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read fuel_level: {}", e)))?;
                fuel_level = Some(text.parse().map_err(AppError::Validation)?);
            }
            "notes" => {
                notes = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read notes: {}", e)))?;
            }
            "signature" => {
                signature = field.bytes().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read signature: {}", e))
                })?;
            }
            _ => {
                if let Some(angle) = name.strip_prefix("photo_") {
                    if let Some(slot) = PHOTO_ANGLES.iter().position(|a| *a == angle) {
                        photos[slot] = Some(field.bytes().await.map_err(|e| {
                            AppError::Validation(format!("Failed to read {}: {}", name, e))
                        })?);
                    }
                }
            }
        }
    }

    let mileage =
        mileage.ok_or_else(|| AppError::Validation("mileage is required".to_string()))?;
    let fuel_level =
        fuel_level.ok_or_else(|| AppError::Validation("fuel_level is required".to_string()))?;

    Ok(InspectionSubmission {
        mileage,
        fuel_level,
        notes,
        photos: photos.into_iter().flatten().collect(),
        signature,
    })
}
