//! Contracts repository
//!
//! Finalization is the authoritative double-booking guard: the vehicle is
//! re-read under lock and the reservation insert, the vehicle flip and the
//! contract update all commit together or not at all.

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult, ErrorCode},
    models::{
        contract::{Contract, ContractSignature, NewContract},
        enums::{ContractStatus, ReservationStatus, VehicleStatus},
        reservation::{rental_days, Reservation},
    },
};

use super::reservations::{lock_vehicle, next_reservation_id, set_vehicle_status};

#[derive(Clone)]
pub struct ContractsRepository {
    pool: Pool<Postgres>,
}

impl ContractsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get contract by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Contract> {
        sqlx::query_as::<_, Contract>("SELECT * FROM contracts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(
                    ErrorCode::NoSuchContract,
                    format!("Contract with id {} not found", id),
                )
            })
    }

    /// Persist a new pre-contract in pending_signature. Touches no
    /// reservation or vehicle state.
    pub async fn create(&self, new: &NewContract) -> AppResult<Contract> {
        let contract = sqlx::query_as::<_, Contract>(
            r#"
            INSERT INTO contracts (
                id, customer_name, customer_email, customer_phone,
                vehicle_id, vehicle_name, pickup_date, dropoff_date,
                total_cost, status, language, content
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.customer_name)
        .bind(&new.customer_email)
        .bind(&new.customer_phone)
        .bind(&new.vehicle_id)
        .bind(&new.vehicle_name)
        .bind(new.pickup_date)
        .bind(new.dropoff_date)
        .bind(new.total_cost)
        .bind(ContractStatus::PendingSignature)
        .bind(new.language.to_string())
        .bind(&new.content)
        .fetch_one(&self.pool)
        .await?;
        Ok(contract)
    }

    /// Convert a signed pre-contract into a confirmed reservation.
    ///
    /// One transaction: lock the vehicle and abort unless it is still
    /// Available, draw the next booking id, insert the Upcoming
    /// reservation, flip the vehicle to Rented, and stamp the contract
    /// signed_by_client with the signer artifacts and the new id.
    pub async fn finalize(
        &self,
        contract: &Contract,
        signature: &ContractSignature,
    ) -> AppResult<Reservation> {
        let mut tx = self.pool.begin().await?;

        let vehicle = lock_vehicle(&mut tx, &contract.vehicle_id).await?;
        if vehicle.status != VehicleStatus::Available {
            tx.rollback().await?;
            return Err(AppError::Conflict(
                ErrorCode::VehicleNotAvailable,
                "Vehicle is no longer available.".to_string(),
            ));
        }

        // First-time signers have no customer row yet; mirror their
        // identity into one so the reservation and contract can reference
        // it. The back-office screens fill in the document details later.
        sqlx::query(
            r#"
            INSERT INTO customers (id, name, email, phone, id_or_passport, license, address)
            VALUES ($1, $2, $3, $4, '', '', '')
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(&signature.customer_id)
        .bind(&signature.customer_name)
        .bind(contract.customer_email.as_deref().unwrap_or_default())
        .bind(contract.customer_phone.as_deref().unwrap_or_default())
        .execute(&mut *tx)
        .await?;

        let reservation_id = next_reservation_id(&mut tx).await?;

        let days = rental_days(contract.pickup_date, contract.dropoff_date);
        let insurance_cost = insurance_from_total(contract.total_cost, vehicle.price_per_day, days);

        let reservation = sqlx::query_as::<_, Reservation>(
            r#"
            INSERT INTO reservations (
                id, customer_id, customer_name, vehicle_id, vehicle_name,
                pickup_date, dropoff_date, status, agent, insurance_cost,
                total_cost, contract_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'Online System', $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(&reservation_id)
        .bind(&signature.customer_id)
        .bind(&contract.customer_name)
        .bind(&contract.vehicle_id)
        .bind(&contract.vehicle_name)
        .bind(contract.pickup_date)
        .bind(contract.dropoff_date)
        .bind(ReservationStatus::Upcoming)
        .bind(insurance_cost)
        .bind(contract.total_cost)
        .bind(contract.id)
        .fetch_one(&mut *tx)
        .await?;

        set_vehicle_status(&mut tx, &contract.vehicle_id, VehicleStatus::Rented).await?;

        sqlx::query(
            r#"
            UPDATE contracts
            SET status = $2, customer_id = $3, client_signature_url = $4,
                client_id_photo_url = $5, signed_at = $6, reservation_id = $7
            WHERE id = $1
            "#,
        )
        .bind(contract.id)
        .bind(ContractStatus::SignedByClient)
        .bind(&signature.customer_id)
        .bind(&signature.client_signature_url)
        .bind(&signature.client_id_photo_url)
        .bind(signature.signed_at)
        .bind(&reservation_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(reservation)
    }
}

/// The contract total already includes insurance; back-derive the total
/// insurance component from the stored per-day vehicle price.
fn insurance_from_total(
    total_cost: rust_decimal::Decimal,
    price_per_day: rust_decimal::Decimal,
    days: i64,
) -> rust_decimal::Decimal {
    total_cost - price_per_day * rust_decimal::Decimal::from(days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn insurance_is_the_total_minus_the_base_rental() {
        // 3 days at 50/day with 15/day insurance: total 195, insurance 45
        let insurance = insurance_from_total(Decimal::new(195, 0), Decimal::new(50, 0), 3);
        assert_eq!(insurance, Decimal::new(45, 0));
    }

    #[test]
    fn zero_insurance_quotes_back_derive_to_zero() {
        let insurance = insurance_from_total(Decimal::new(150, 0), Decimal::new(50, 0), 3);
        assert_eq!(insurance, Decimal::ZERO);
    }
}
