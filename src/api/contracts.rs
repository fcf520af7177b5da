//! Contract lifecycle endpoints
//!
//! Pre-contract creation is public (the booking form calls it before the
//! visitor has an account); finalization requires the signer's bearer
//! token and a multipart upload of the ID photo and signature image.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::Multipart;
use bytes::Bytes;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::contract::{Contract, CreatePreContract},
};

use super::AuthenticatedUser;

#[derive(Serialize, ToSchema)]
pub struct CreateContractResponse {
    pub success: bool,
    /// Newly created pre-contract ID
    pub contract_id: Uuid,
}

#[derive(Serialize, ToSchema)]
pub struct FinalizeContractResponse {
    pub success: bool,
    /// Newly confirmed reservation ID
    pub reservation_id: String,
}

/// Create a pre-contract for review and signature
#[utoipa::path(
    post,
    path = "/contracts",
    tag = "contracts",
    request_body = CreatePreContract,
    responses(
        (status = 201, description = "Pre-contract created", body = CreateContractResponse),
        (status = 400, description = "Missing or malformed booking data"),
        (status = 404, description = "Vehicle not found"),
        (status = 502, description = "Draft generator failed")
    )
)]
pub async fn create_contract(
    State(state): State<crate::AppState>,
    Json(request): Json<CreatePreContract>,
) -> AppResult<(StatusCode, Json<CreateContractResponse>)> {
    let contract = state.services.contracts.create_pre_contract(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateContractResponse {
            success: true,
            contract_id: contract.id,
        }),
    ))
}

/// Get a contract
#[utoipa::path(
    get,
    path = "/contracts/{id}",
    tag = "contracts",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Contract ID")),
    responses(
        (status = 200, description = "Contract details", body = Contract),
        (status = 404, description = "Contract not found")
    )
)]
pub async fn get_contract(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Contract>> {
    let contract = state.services.contracts.get(id).await?;
    Ok(Json(contract))
}

/// Finalize a signed pre-contract into a confirmed reservation
#[utoipa::path(
    post,
    path = "/contracts/{id}/finalize",
    tag = "contracts",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Contract ID")),
    request_body(content = Vec<u8>, content_type = "multipart/form-data", description = "idPhoto and signature image parts"),
    responses(
        (status = 200, description = "Reservation confirmed", body = FinalizeContractResponse),
        (status = 400, description = "Missing idPhoto or signature"),
        (status = 404, description = "Contract not found"),
        (status = 409, description = "Vehicle no longer available")
    )
)]
pub async fn finalize_contract(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> AppResult<Json<FinalizeContractResponse>> {
    let (id_photo, signature) = read_finalize_parts(multipart).await?;

    let reservation = state
        .services
        .contracts
        .finalize(id, id_photo, signature, &claims)
        .await?;

    Ok(Json(FinalizeContractResponse {
        success: true,
        reservation_id: reservation.id,
    }))
}

async fn read_finalize_parts(mut multipart: Multipart) -> AppResult<(Bytes, Bytes)> {
    let mut id_photo = Bytes::new();
    let mut signature = Bytes::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read part {}: {}", name, e)))?;
        match name.as_str() {
            "idPhoto" | "id_photo" => id_photo = data,
            "signature" => signature = data,
            _ => {}
        }
    }

    if id_photo.is_empty() || signature.is_empty() {
        return Err(AppError::Validation(
            "Missing contractId, idPhoto, or signature.".to_string(),
        ));
    }
    Ok((id_photo, signature))
}
