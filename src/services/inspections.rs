//! Inspection recorder
//!
//! Captures vehicle condition at departure or return: exactly four photos
//! (front, right, back, left), a signature, mileage and fuel level. Uploads
//! everything, then drives the matching reservation transition. Viewing a
//! recorded inspection never re-triggers uploads or transitions.

use bytes::Bytes;
use chrono::Utc;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult, ErrorCode},
    models::{
        enums::{FuelLevel, InspectionDirection},
        reservation::{Reservation, VehicleInspection},
        user::UserClaims,
    },
    repository::Repository,
};

use super::storage::ObjectStorage;

/// The four fixed photo angles, in storage order
pub const PHOTO_ANGLES: [&str; 4] = ["front", "right", "back", "left"];

/// A new inspection submission before upload
#[derive(Debug, Clone)]
pub struct InspectionSubmission {
    pub mileage: i32,
    pub fuel_level: FuelLevel,
    pub notes: String,
    /// Must hold all four angles in PHOTO_ANGLES order
    pub photos: Vec<Bytes>,
    pub signature: Bytes,
}

#[derive(Clone)]
pub struct InspectionsService {
    repository: Repository,
    storage: Arc<dyn ObjectStorage>,
}

impl InspectionsService {
    pub fn new(repository: Repository, storage: Arc<dyn ObjectStorage>) -> Self {
        Self { repository, storage }
    }

    /// Record an inspection and trigger the matching transition
    /// (departure: Upcoming -> Active, return: Active -> Completed)
    pub async fn record(
        &self,
        reservation_id: &str,
        direction: InspectionDirection,
        submission: InspectionSubmission,
        claims: &UserClaims,
    ) -> AppResult<Reservation> {
        validate_submission(&submission)?;

        // Existence check before any upload
        self.repository.reservations.get_by_id(reservation_id).await?;

        let mut photo_urls = Vec::with_capacity(PHOTO_ANGLES.len());
        for (angle, data) in PHOTO_ANGLES.iter().zip(submission.photos.into_iter()) {
            let url = self
                .storage
                .upload(
                    &format!("inspections/{}/{}/{}.jpg", reservation_id, direction, angle),
                    data,
                    "image/jpeg",
                )
                .await?;
            photo_urls.push(url);
        }

        let signature_url = self
            .storage
            .upload(
                &format!("signatures/{}/{}/signature.png", reservation_id, direction),
                submission.signature,
                "image/png",
            )
            .await?;

        let inspection = VehicleInspection {
            photos: photo_urls,
            notes: submission.notes,
            fuel_level: submission.fuel_level,
            mileage: submission.mileage,
            signature_url,
            timestamp: Utc::now(),
        };

        let reservation = self
            .repository
            .reservations
            .record_inspection(reservation_id, direction, &inspection)
            .await?;

        tracing::info!(
            reservation = %reservation_id,
            direction = %direction,
            agent = %claims.name,
            "Inspection recorded, reservation now {}",
            reservation.status
        );
        Ok(reservation)
    }

    /// Read-only view of a recorded inspection
    pub async fn get(
        &self,
        reservation_id: &str,
        direction: InspectionDirection,
    ) -> AppResult<VehicleInspection> {
        let reservation = self.repository.reservations.get_by_id(reservation_id).await?;
        let inspection = match direction {
            InspectionDirection::Departure => reservation.departure_inspection,
            InspectionDirection::Return => reservation.return_inspection,
        };
        inspection.map(|json| json.0).ok_or_else(|| {
            AppError::NotFound(
                ErrorCode::NoSuchReservation,
                format!(
                    "No {} inspection recorded for reservation {}",
                    direction, reservation_id
                ),
            )
        })
    }
}

fn validate_submission(submission: &InspectionSubmission) -> AppResult<()> {
    if submission.mileage < 0 {
        return Err(AppError::Validation("mileage must not be negative".to_string()));
    }
    if submission.photos.len() != PHOTO_ANGLES.len()
        || submission.photos.iter().any(|p| p.is_empty())
    {
        return Err(AppError::Validation(
            "All four inspection photos (front, right, back, left) are required.".to_string(),
        ));
    }
    if submission.signature.is_empty() {
        return Err(AppError::Validation("A customer signature is required.".to_string()));
    }
    Ok(())
}
