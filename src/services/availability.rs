//! Vehicle availability checking
//!
//! This check is advisory: it runs at read time so the booking form can
//! refuse obviously conflicting dates early. The authoritative guard is the
//! in-transaction re-check performed by the repository at commit time.

use chrono::NaiveDate;

use crate::{
    error::{AppError, AppResult},
    repository::{reservations::BookingConflict, Repository},
};

/// Half-open-inclusive interval overlap: two bookings conflict iff the new
/// pickup falls before the existing dropoff and the new dropoff after the
/// existing pickup. Back-to-back bookings sharing a boundary day are fine.
pub fn ranges_overlap(
    new_pickup: NaiveDate,
    new_dropoff: NaiveDate,
    existing_pickup: NaiveDate,
    existing_dropoff: NaiveDate,
) -> bool {
    new_pickup < existing_dropoff && new_dropoff > existing_pickup
}

#[derive(Clone)]
pub struct AvailabilityService {
    repository: Repository,
}

impl AvailabilityService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Return the first existing booking that blocks the candidate range,
    /// if any. `exclude` skips the reservation being edited.
    pub async fn find_conflict(
        &self,
        vehicle_id: &str,
        pickup: NaiveDate,
        dropoff: NaiveDate,
        exclude: Option<&str>,
    ) -> AppResult<Option<BookingConflict>> {
        let occupying = self
            .repository
            .reservations
            .occupying_for_vehicle(vehicle_id, exclude)
            .await?;

        for existing in occupying {
            if ranges_overlap(pickup, dropoff, existing.pickup_date, existing.dropoff_date) {
                return Ok(Some(BookingConflict {
                    reservation_id: existing.id,
                    pickup_date: existing.pickup_date,
                    dropoff_date: existing.dropoff_date,
                }));
            }
        }
        Ok(None)
    }

    /// Error unless the candidate range is free
    pub async fn check(
        &self,
        vehicle_id: &str,
        pickup: NaiveDate,
        dropoff: NaiveDate,
        exclude: Option<&str>,
    ) -> AppResult<()> {
        if dropoff < pickup {
            return Err(AppError::Validation(
                "The drop-off date cannot be before the pickup date.".to_string(),
            ));
        }
        match self.find_conflict(vehicle_id, pickup, dropoff, exclude).await? {
            Some(conflict) => Err(conflict.to_error()),
            None => Ok(()),
        }
    }

    /// Boolean form for the public availability endpoint
    pub async fn is_available(
        &self,
        vehicle_id: &str,
        pickup: NaiveDate,
        dropoff: NaiveDate,
        exclude: Option<&str>,
    ) -> AppResult<bool> {
        Ok(self
            .find_conflict(vehicle_id, pickup, dropoff, exclude)
            .await?
            .is_none())
    }
}
