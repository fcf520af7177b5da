//! Fleet read service for the public booking flow

use crate::{
    error::AppResult,
    models::{enums::VehicleStatus, vehicle::Vehicle},
    repository::Repository,
};

#[derive(Clone)]
pub struct FleetService {
    repository: Repository,
}

impl FleetService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn get(&self, id: &str) -> AppResult<Vehicle> {
        self.repository.vehicles.get_by_id(id).await
    }

    pub async fn list(&self, status: Option<VehicleStatus>) -> AppResult<Vec<Vehicle>> {
        self.repository.vehicles.list(status).await
    }
}
