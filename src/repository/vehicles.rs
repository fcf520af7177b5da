//! Vehicles repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult, ErrorCode},
    models::{enums::VehicleStatus, vehicle::Vehicle},
};

#[derive(Clone)]
pub struct VehiclesRepository {
    pool: Pool<Postgres>,
}

impl VehiclesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get vehicle by ID
    pub async fn get_by_id(&self, id: &str) -> AppResult<Vehicle> {
        sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(
                    ErrorCode::NoSuchVehicle,
                    format!("Vehicle with id {} not found", id),
                )
            })
    }

    /// List the fleet, optionally filtered by status
    pub async fn list(&self, status: Option<VehicleStatus>) -> AppResult<Vec<Vehicle>> {
        let vehicles = match status {
            Some(status) => {
                sqlx::query_as::<_, Vehicle>(
                    "SELECT * FROM vehicles WHERE status = $1 ORDER BY make, model",
                )
                .bind(status)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles ORDER BY make, model")
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(vehicles)
    }
}
