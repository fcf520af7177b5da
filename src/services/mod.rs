//! Business logic services

pub mod availability;
pub mod contracts;
pub mod drafts;
pub mod fleet;
pub mod inspections;
pub mod reservations;
pub mod storage;

use std::sync::Arc;

use crate::{
    config::{DraftsConfig, StorageConfig},
    error::AppResult,
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub fleet: fleet::FleetService,
    pub availability: availability::AvailabilityService,
    pub reservations: reservations::ReservationsService,
    pub contracts: contracts::ContractsService,
    pub inspections: inspections::InspectionsService,
}

impl Services {
    /// Create all services with HTTP collaborator clients
    pub fn new(
        repository: Repository,
        storage_config: &StorageConfig,
        drafts_config: &DraftsConfig,
    ) -> AppResult<Self> {
        let drafts: Arc<dyn drafts::DraftGenerator> =
            Arc::new(drafts::HttpDraftGenerator::new(drafts_config)?);
        let storage: Arc<dyn storage::ObjectStorage> =
            Arc::new(storage::HttpObjectStorage::new(storage_config)?);
        Ok(Self::with_collaborators(repository, drafts, storage))
    }

    /// Wire services around explicit collaborators (tests inject mocks here)
    pub fn with_collaborators(
        repository: Repository,
        drafts: Arc<dyn drafts::DraftGenerator>,
        storage: Arc<dyn storage::ObjectStorage>,
    ) -> Self {
        let availability = availability::AvailabilityService::new(repository.clone());
        Self {
            fleet: fleet::FleetService::new(repository.clone()),
            availability: availability.clone(),
            reservations: reservations::ReservationsService::new(
                repository.clone(),
                availability,
                drafts.clone(),
            ),
            contracts: contracts::ContractsService::new(
                repository.clone(),
                drafts,
                storage.clone(),
            ),
            inspections: inspections::InspectionsService::new(repository, storage),
        }
    }
}
