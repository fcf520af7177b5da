//! Contract lifecycle orchestration
//!
//! A pre-contract lets an unauthenticated visitor review generated terms
//! before any reservation exists. Finalization converts a signed
//! pre-contract into a confirmed reservation; the double-booking guard
//! lives in the repository transaction.

use bytes::Bytes;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        contract::{Contract, ContractSignature, CreatePreContract, NewContract},
        enums::ContractStatus,
        reservation::{rental_days, Reservation},
        user::UserClaims,
    },
    repository::Repository,
};

use super::{
    drafts::{ContractDraftRequest, DraftGenerator},
    storage::ObjectStorage,
};

#[derive(Clone)]
pub struct ContractsService {
    repository: Repository,
    drafts: Arc<dyn DraftGenerator>,
    storage: Arc<dyn ObjectStorage>,
}

impl ContractsService {
    pub fn new(
        repository: Repository,
        drafts: Arc<dyn DraftGenerator>,
        storage: Arc<dyn ObjectStorage>,
    ) -> Self {
        Self {
            repository,
            drafts,
            storage,
        }
    }

    /// Get contract by ID
    pub async fn get(&self, id: Uuid) -> AppResult<Contract> {
        self.repository.contracts.get_by_id(id).await
    }

    /// Create a pre-contract: validate the booking facts, generate the
    /// contract text, and persist it in pending_signature. No reservation
    /// or vehicle state is touched.
    pub async fn create_pre_contract(&self, request: CreatePreContract) -> AppResult<Contract> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        if request.dropoff_date < request.pickup_date {
            return Err(AppError::Validation(
                "The drop-off date cannot be before the pickup date.".to_string(),
            ));
        }

        // The booking form sends vehicle fields, but the stored record is
        // the source of truth for the plate and pricing
        let vehicle = self.repository.vehicles.get_by_id(&request.vehicle.id).await?;

        let content = self
            .drafts
            .contract_text(&ContractDraftRequest {
                client_name: request.customer_data.name.clone(),
                client_id: "PENDIENTE".to_string(),
                vehicle_model: vehicle.display_name(),
                vehicle_plate: vehicle.plate.clone(),
                rental_days: rental_days(request.pickup_date, request.dropoff_date),
                start_date: request.pickup_date,
                end_date: request.dropoff_date,
                total_price: request.total_cost,
                language: request.language,
            })
            .await?;

        let contract = self
            .repository
            .contracts
            .create(&NewContract {
                customer_name: request.customer_data.name,
                customer_email: request.customer_data.email,
                customer_phone: request.customer_data.phone,
                vehicle_id: vehicle.id.clone(),
                vehicle_name: vehicle.display_name(),
                pickup_date: request.pickup_date,
                dropoff_date: request.dropoff_date,
                total_cost: request.total_cost,
                language: request.language,
                content,
            })
            .await?;

        tracing::info!(contract = %contract.id, vehicle = %contract.vehicle_id, "Pre-contract created");
        Ok(contract)
    }

    /// Finalize a signed pre-contract into a confirmed reservation.
    ///
    /// The artifact uploads happen before the transaction; a failure there
    /// leaves no partial state. The transaction itself re-reads the vehicle
    /// under lock and aborts with a conflict if it is no longer Available.
    pub async fn finalize(
        &self,
        contract_id: Uuid,
        id_photo: Bytes,
        signature: Bytes,
        claims: &UserClaims,
    ) -> AppResult<Reservation> {
        if id_photo.is_empty() || signature.is_empty() {
            return Err(AppError::Validation(
                "Missing contractId, idPhoto, or signature.".to_string(),
            ));
        }

        let contract = self.repository.contracts.get_by_id(contract_id).await?;
        if contract.status != ContractStatus::PendingSignature {
            return Err(AppError::InvalidTransition(format!(
                "Contract is not awaiting signature (current status: {})",
                contract.status
            )));
        }

        let uid = &claims.sub;
        let id_photo_url = self
            .storage
            .upload(
                &format!("documents/{}/{}-id.jpg", uid, contract_id),
                id_photo,
                "image/jpeg",
            )
            .await?;
        let signature_url = self
            .storage
            .upload(
                &format!("signatures/{}/{}-sig.png", uid, contract_id),
                signature,
                "image/png",
            )
            .await?;

        let reservation = self
            .repository
            .contracts
            .finalize(
                &contract,
                &ContractSignature {
                    customer_id: uid.clone(),
                    customer_name: claims.name.clone(),
                    client_signature_url: signature_url,
                    client_id_photo_url: id_photo_url,
                    signed_at: Utc::now(),
                },
            )
            .await?;

        tracing::info!(
            contract = %contract_id,
            reservation = %reservation.id,
            "Contract signed and reservation confirmed"
        );
        Ok(reservation)
    }
}
