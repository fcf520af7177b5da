//! Reservations repository
//!
//! Every status-changing operation runs in a single transaction that locks
//! the vehicle row, re-checks its preconditions, and reconciles the vehicle
//! status before commit. The advisory availability check in the service
//! layer is never trusted at write time.

use chrono::NaiveDate;
use sqlx::types::Json;
use sqlx::{Pool, Postgres, Transaction};

use crate::{
    error::{AppError, AppResult, ErrorCode},
    models::{
        contract::DepartureDetails,
        enums::{ContractStatus, InspectionDirection, ReservationStatus, VehicleStatus},
        reservation::{NewReservation, Reservation, VehicleInspection},
        vehicle::Vehicle,
    },
};

/// Date range of an existing booking that blocks a candidate one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingConflict {
    pub reservation_id: String,
    pub pickup_date: NaiveDate,
    pub dropoff_date: NaiveDate,
}

impl BookingConflict {
    pub fn to_error(&self) -> AppError {
        AppError::Conflict(
            ErrorCode::BookingConflict,
            format!(
                "This vehicle is already booked from {} to {}. Please choose a different vehicle or date range.",
                self.pickup_date, self.dropoff_date
            ),
        )
    }
}

#[derive(Clone)]
pub struct ReservationsRepository {
    pool: Pool<Postgres>,
}

impl ReservationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get reservation by ID
    pub async fn get_by_id(&self, id: &str) -> AppResult<Reservation> {
        sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(
                    ErrorCode::NoSuchReservation,
                    format!("Reservation with id {} not found", id),
                )
            })
    }

    /// List all reservations, newest booking id first
    pub async fn list(&self) -> AppResult<Vec<Reservation>> {
        let reservations =
            sqlx::query_as::<_, Reservation>("SELECT * FROM reservations ORDER BY id DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(reservations)
    }

    /// Reservations currently holding the vehicle (Upcoming or Active),
    /// excluding `exclude` when editing. Read-only, used by the advisory
    /// availability check.
    pub async fn occupying_for_vehicle(
        &self,
        vehicle_id: &str,
        exclude: Option<&str>,
    ) -> AppResult<Vec<Reservation>> {
        let reservations = sqlx::query_as::<_, Reservation>(
            r#"
            SELECT * FROM reservations
            WHERE vehicle_id = $1
              AND status IN ('Upcoming', 'Active')
              AND ($2::text IS NULL OR id <> $2)
            ORDER BY pickup_date
            "#,
        )
        .bind(vehicle_id)
        .bind(exclude)
        .fetch_all(&self.pool)
        .await?;
        Ok(reservations)
    }

    /// Create a reservation (staff path). Locks the vehicle, re-checks the
    /// date range against the occupying set, draws the next sequential id
    /// and flips the vehicle status, all in one transaction.
    pub async fn create(&self, new: &NewReservation) -> AppResult<Reservation> {
        let mut tx = self.pool.begin().await?;

        let vehicle = lock_vehicle(&mut tx, &new.vehicle_id).await?;

        if new.status.occupies_vehicle() {
            if vehicle.status == VehicleStatus::Maintenance {
                tx.rollback().await?;
                return Err(AppError::Conflict(
                    ErrorCode::VehicleNotAvailable,
                    "Vehicle is no longer available.".to_string(),
                ));
            }
            if let Some(conflict) =
                find_conflict(&mut tx, &new.vehicle_id, new.pickup_date, new.dropoff_date, None)
                    .await?
            {
                tx.rollback().await?;
                return Err(conflict.to_error());
            }
        }

        let id = next_reservation_id(&mut tx).await?;

        let reservation = sqlx::query_as::<_, Reservation>(
            r#"
            INSERT INTO reservations (
                id, customer_id, customer_name, vehicle_id, vehicle_name,
                pickup_date, dropoff_date, status, agent, insurance_cost,
                total_cost, contract_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(&new.customer_id)
        .bind(&new.customer_name)
        .bind(&new.vehicle_id)
        .bind(&new.vehicle_name)
        .bind(new.pickup_date)
        .bind(new.dropoff_date)
        .bind(new.status)
        .bind(&new.agent)
        .bind(new.insurance_cost)
        .bind(new.total_cost)
        .bind(new.contract_id)
        .fetch_one(&mut *tx)
        .await?;

        // Degenerate direct Completed/Cancelled creates leave the vehicle alone
        if new.status.occupies_vehicle() {
            set_vehicle_status(&mut tx, &new.vehicle_id, VehicleStatus::Rented).await?;
        }

        tx.commit().await?;
        Ok(reservation)
    }

    /// Edit a reservation. Releases the previous vehicle when it changes and
    /// re-derives both vehicles' statuses from the resulting reservation
    /// status, in the same transaction as the overlap re-check.
    pub async fn update(&self, id: &str, new: &NewReservation) -> AppResult<Reservation> {
        let mut tx = self.pool.begin().await?;

        let existing = lock_reservation(&mut tx, id).await?;
        let vehicle = lock_vehicle(&mut tx, &new.vehicle_id).await?;

        if new.status.occupies_vehicle() {
            if vehicle.status == VehicleStatus::Maintenance {
                tx.rollback().await?;
                return Err(AppError::Conflict(
                    ErrorCode::VehicleNotAvailable,
                    "Vehicle is no longer available.".to_string(),
                ));
            }
            if let Some(conflict) = find_conflict(
                &mut tx,
                &new.vehicle_id,
                new.pickup_date,
                new.dropoff_date,
                Some(id),
            )
            .await?
            {
                tx.rollback().await?;
                return Err(conflict.to_error());
            }
        }

        let reservation = sqlx::query_as::<_, Reservation>(
            r#"
            UPDATE reservations
            SET customer_id = $2, customer_name = $3, vehicle_id = $4,
                vehicle_name = $5, pickup_date = $6, dropoff_date = $7,
                status = $8, insurance_cost = $9, total_cost = $10
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&new.customer_id)
        .bind(&new.customer_name)
        .bind(&new.vehicle_id)
        .bind(&new.vehicle_name)
        .bind(new.pickup_date)
        .bind(new.dropoff_date)
        .bind(new.status)
        .bind(new.insurance_cost)
        .bind(new.total_cost)
        .fetch_one(&mut *tx)
        .await?;

        if existing.vehicle_id != new.vehicle_id {
            set_vehicle_status(&mut tx, &existing.vehicle_id, VehicleStatus::Available).await?;
        }
        let derived = if new.status.occupies_vehicle() {
            VehicleStatus::Rented
        } else {
            VehicleStatus::Available
        };
        set_vehicle_status(&mut tx, &new.vehicle_id, derived).await?;

        tx.commit().await?;
        Ok(reservation)
    }

    /// Cancel an Upcoming reservation and release its vehicle
    pub async fn cancel(&self, id: &str) -> AppResult<Reservation> {
        let mut tx = self.pool.begin().await?;

        let existing = lock_reservation(&mut tx, id).await?;
        if existing.status != ReservationStatus::Upcoming {
            tx.rollback().await?;
            return Err(AppError::InvalidTransition(format!(
                "Only Upcoming reservations can be cancelled (current status: {})",
                existing.status
            )));
        }

        let reservation = sqlx::query_as::<_, Reservation>(
            "UPDATE reservations SET status = 'Cancelled' WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        set_vehicle_status(&mut tx, &existing.vehicle_id, VehicleStatus::Available).await?;

        tx.commit().await?;
        Ok(reservation)
    }

    /// Record a departure or return inspection and drive the matching
    /// status transition. A direction can be written at most once.
    pub async fn record_inspection(
        &self,
        id: &str,
        direction: InspectionDirection,
        inspection: &VehicleInspection,
    ) -> AppResult<Reservation> {
        let mut tx = self.pool.begin().await?;

        let existing = lock_reservation(&mut tx, id).await?;

        let reservation = match direction {
            InspectionDirection::Departure => {
                if existing.status != ReservationStatus::Upcoming {
                    tx.rollback().await?;
                    return Err(AppError::InvalidTransition(format!(
                        "Departure inspection requires an Upcoming reservation (current status: {})",
                        existing.status
                    )));
                }
                if existing.departure_inspection.is_some() {
                    tx.rollback().await?;
                    return Err(AppError::Conflict(
                        ErrorCode::InspectionAlreadyRecorded,
                        "Departure inspection has already been recorded.".to_string(),
                    ));
                }

                let reservation = sqlx::query_as::<_, Reservation>(
                    r#"
                    UPDATE reservations
                    SET departure_inspection = $2, status = 'Active'
                    WHERE id = $1
                    RETURNING *
                    "#,
                )
                .bind(id)
                .bind(Json(inspection))
                .fetch_one(&mut *tx)
                .await?;

                // Vehicle stays Rented; snapshot the inspection onto the
                // linked contract for audit
                if let Some(contract_id) = existing.contract_id {
                    let details = DepartureDetails {
                        mileage: inspection.mileage,
                        fuel_level: inspection.fuel_level,
                        notes: inspection.notes.clone(),
                        photos: inspection.photos.clone(),
                    };
                    sqlx::query(
                        r#"
                        UPDATE contracts
                        SET status = $2, agent_signature_url = $3, departure_details = $4
                        WHERE id = $1
                        "#,
                    )
                    .bind(contract_id)
                    .bind(ContractStatus::Signed)
                    .bind(&inspection.signature_url)
                    .bind(Json(details))
                    .execute(&mut *tx)
                    .await?;
                }

                reservation
            }
            InspectionDirection::Return => {
                if existing.status != ReservationStatus::Active {
                    tx.rollback().await?;
                    return Err(AppError::InvalidTransition(format!(
                        "Return inspection requires an Active reservation (current status: {})",
                        existing.status
                    )));
                }
                if existing.return_inspection.is_some() {
                    tx.rollback().await?;
                    return Err(AppError::Conflict(
                        ErrorCode::InspectionAlreadyRecorded,
                        "Return inspection has already been recorded.".to_string(),
                    ));
                }

                let reservation = sqlx::query_as::<_, Reservation>(
                    r#"
                    UPDATE reservations
                    SET return_inspection = $2, status = 'Completed'
                    WHERE id = $1
                    RETURNING *
                    "#,
                )
                .bind(id)
                .bind(Json(inspection))
                .fetch_one(&mut *tx)
                .await?;

                set_vehicle_status(&mut tx, &existing.vehicle_id, VehicleStatus::Available).await?;

                if let Some(contract_id) = existing.contract_id {
                    sqlx::query("UPDATE contracts SET status = $2 WHERE id = $1")
                        .bind(contract_id)
                        .bind(ContractStatus::Completed)
                        .execute(&mut *tx)
                        .await?;
                }

                reservation
            }
        };

        tx.commit().await?;
        Ok(reservation)
    }
}

/// Lock a vehicle row for the remainder of the transaction
pub(crate) async fn lock_vehicle(
    tx: &mut Transaction<'_, Postgres>,
    vehicle_id: &str,
) -> AppResult<Vehicle> {
    sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1 FOR UPDATE")
        .bind(vehicle_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(
                ErrorCode::NoSuchVehicle,
                format!("Vehicle with id {} not found", vehicle_id),
            )
        })
}

pub(crate) async fn set_vehicle_status(
    tx: &mut Transaction<'_, Postgres>,
    vehicle_id: &str,
    status: VehicleStatus,
) -> AppResult<()> {
    sqlx::query("UPDATE vehicles SET status = $2 WHERE id = $1")
        .bind(vehicle_id)
        .bind(status)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

async fn lock_reservation(
    tx: &mut Transaction<'_, Postgres>,
    id: &str,
) -> AppResult<Reservation> {
    sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(
                ErrorCode::NoSuchReservation,
                format!("Reservation with id {} not found", id),
            )
        })
}

/// Draw the next booking id from the sequence inside the committing
/// transaction. Strictly increasing and collision-free under concurrency;
/// the padding grows naturally past RES-999.
pub(crate) async fn next_reservation_id(
    tx: &mut Transaction<'_, Postgres>,
) -> AppResult<String> {
    let n: i64 = sqlx::query_scalar("SELECT nextval('reservation_id_seq')")
        .fetch_one(&mut **tx)
        .await?;
    Ok(format_reservation_id(n))
}

fn format_reservation_id(n: i64) -> String {
    format!("RES-{:03}", n)
}

/// In-transaction overlap re-check against the occupying set. The overlap
/// rule is half-open inclusive: new_pickup < existing_dropoff AND
/// new_dropoff > existing_pickup.
pub(crate) async fn find_conflict(
    tx: &mut Transaction<'_, Postgres>,
    vehicle_id: &str,
    pickup: NaiveDate,
    dropoff: NaiveDate,
    exclude: Option<&str>,
) -> AppResult<Option<BookingConflict>> {
    let row = sqlx::query_as::<_, Reservation>(
        r#"
        SELECT * FROM reservations
        WHERE vehicle_id = $1
          AND status IN ('Upcoming', 'Active')
          AND ($4::text IS NULL OR id <> $4)
          AND $2 < dropoff_date
          AND $3 > pickup_date
        ORDER BY pickup_date
        LIMIT 1
        "#,
    )
    .bind(vehicle_id)
    .bind(pickup)
    .bind(dropoff)
    .bind(exclude)
    .fetch_optional(&mut **tx)
    .await?;

    Ok(row.map(|r| BookingConflict {
        reservation_id: r.id,
        pickup_date: r.pickup_date,
        dropoff_date: r.dropoff_date,
    }))
}
