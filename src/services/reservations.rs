//! Reservation state machine orchestration
//!
//! Validation, costing and the advisory availability check happen here;
//! the repository owns the transactional writes and the authoritative
//! re-checks. Vehicle status is reconciled inside every transition.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::Arc;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        invoice::Invoice,
        reservation::{
            rental_days, CreateReservation, NewReservation, Reservation, UpdateReservation,
        },
        user::UserClaims,
    },
    repository::Repository,
};

use super::{
    availability::AvailabilityService,
    drafts::{ChecklistDraft, DraftGenerator, ReplyContext},
};

/// totalCost = rentalDays x (pricePerDay + insurancePerDay)
pub fn total_cost(
    pickup: NaiveDate,
    dropoff: NaiveDate,
    price_per_day: Decimal,
    insurance_per_day: Decimal,
) -> Decimal {
    Decimal::from(rental_days(pickup, dropoff)) * (price_per_day + insurance_per_day)
}

#[derive(Clone)]
pub struct ReservationsService {
    repository: Repository,
    availability: AvailabilityService,
    drafts: Arc<dyn DraftGenerator>,
}

impl ReservationsService {
    pub fn new(
        repository: Repository,
        availability: AvailabilityService,
        drafts: Arc<dyn DraftGenerator>,
    ) -> Self {
        Self {
            repository,
            availability,
            drafts,
        }
    }

    /// Get reservation by ID
    pub async fn get(&self, id: &str) -> AppResult<Reservation> {
        self.repository.reservations.get_by_id(id).await
    }

    /// List all reservations
    pub async fn list(&self) -> AppResult<Vec<Reservation>> {
        self.repository.reservations.list().await
    }

    /// Create a reservation on the staff path, bypassing the contract flow.
    /// Returns the reservation and the draft invoice generated for it.
    pub async fn create(
        &self,
        request: CreateReservation,
        claims: &UserClaims,
    ) -> AppResult<(Reservation, Option<Invoice>)> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        validate_dates(request.pickup_date, request.dropoff_date)?;

        let customer = self.repository.customers.get_by_id(&request.customer_id).await?;
        let vehicle = self.repository.vehicles.get_by_id(&request.vehicle_id).await?;

        if request.status.occupies_vehicle() {
            self.availability
                .check(&request.vehicle_id, request.pickup_date, request.dropoff_date, None)
                .await?;
        }

        let new = NewReservation {
            customer_id: customer.id,
            customer_name: customer.name,
            vehicle_id: vehicle.id.clone(),
            vehicle_name: vehicle.display_name(),
            pickup_date: request.pickup_date,
            dropoff_date: request.dropoff_date,
            status: request.status,
            agent: claims.name.clone(),
            insurance_cost: request.insurance_cost,
            total_cost: total_cost(
                request.pickup_date,
                request.dropoff_date,
                vehicle.price_per_day,
                request.insurance_cost,
            ),
            contract_id: None,
        };

        let reservation = self.repository.reservations.create(&new).await?;
        let invoice = self.draft_invoice(&reservation, &claims.name).await;
        Ok((reservation, invoice))
    }

    /// Edit a reservation: re-validates availability excluding its own id,
    /// recomputes the total, and regenerates the draft invoice.
    pub async fn update(
        &self,
        id: &str,
        request: UpdateReservation,
        claims: &UserClaims,
    ) -> AppResult<(Reservation, Option<Invoice>)> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        validate_dates(request.pickup_date, request.dropoff_date)?;

        let existing = self.repository.reservations.get_by_id(id).await?;
        let vehicle = self.repository.vehicles.get_by_id(&request.vehicle_id).await?;

        if request.status.occupies_vehicle() {
            self.availability
                .check(&request.vehicle_id, request.pickup_date, request.dropoff_date, Some(id))
                .await?;
        }

        let new = NewReservation {
            customer_id: existing.customer_id,
            customer_name: existing.customer_name,
            vehicle_id: vehicle.id.clone(),
            vehicle_name: vehicle.display_name(),
            pickup_date: request.pickup_date,
            dropoff_date: request.dropoff_date,
            status: request.status,
            agent: existing.agent,
            insurance_cost: request.insurance_cost,
            total_cost: total_cost(
                request.pickup_date,
                request.dropoff_date,
                vehicle.price_per_day,
                request.insurance_cost,
            ),
            contract_id: existing.contract_id,
        };

        let reservation = self.repository.reservations.update(id, &new).await?;
        let invoice = self.draft_invoice(&reservation, &claims.name).await;
        Ok((reservation, invoice))
    }

    /// Cancel an Upcoming reservation, releasing the vehicle
    pub async fn cancel(&self, id: &str, claims: &UserClaims) -> AppResult<Reservation> {
        let reservation = self.repository.reservations.cancel(id).await?;
        tracing::info!(
            reservation = %id,
            agent = %claims.name,
            "Reservation cancelled, vehicle {} released",
            reservation.vehicle_id
        );
        Ok(reservation)
    }

    /// Generate an inspection checklist for the reserved vehicle
    pub async fn checklist(&self, id: &str) -> AppResult<ChecklistDraft> {
        let reservation = self.repository.reservations.get_by_id(id).await?;
        let vehicle = self.repository.vehicles.get_by_id(&reservation.vehicle_id).await?;
        self.drafts.checklist(vehicle.category, &vehicle.model).await
    }

    /// Generate a reply to a customer query in the reservation's context
    pub async fn smart_reply(&self, id: &str, query: &str) -> AppResult<String> {
        if query.trim().is_empty() {
            return Err(AppError::Validation("query is required".to_string()));
        }
        let reservation = self.repository.reservations.get_by_id(id).await?;
        let context = ReplyContext {
            customer_name: reservation.customer_name,
            vehicle_name: reservation.vehicle_name,
            reservation_id: reservation.id,
            pickup_date: reservation.pickup_date,
            dropoff_date: reservation.dropoff_date,
            query: query.to_string(),
        };
        self.drafts.smart_reply(&context).await
    }

    /// Invoice generation is an external collaborator's concern and never
    /// gates the booking: a failure is logged and surfaced as a missing
    /// invoice, not a rolled-back reservation.
    async fn draft_invoice(&self, reservation: &Reservation, created_by: &str) -> Option<Invoice> {
        match self
            .repository
            .invoices
            .create_draft(reservation, created_by)
            .await
        {
            Ok(invoice) => Some(invoice),
            Err(e) => {
                tracing::error!(
                    reservation = %reservation.id,
                    "Failed to generate draft invoice: {}",
                    e
                );
                None
            }
        }
    }
}

fn validate_dates(pickup: NaiveDate, dropoff: NaiveDate) -> AppResult<()> {
    if dropoff < pickup {
        return Err(AppError::Validation(
            "The drop-off date cannot be before the pickup date.".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn three_day_rental_total() {
        // 2024-07-10 -> 2024-07-13 at 50/day plus 10/day insurance
        let total = total_cost(d("2024-07-10"), d("2024-07-13"), Decimal::new(50, 0), Decimal::new(10, 0));
        assert_eq!(total, Decimal::new(180, 0));
    }

    #[test]
    fn same_day_rental_bills_one_day() {
        let total = total_cost(d("2024-07-10"), d("2024-07-10"), Decimal::new(75, 0), Decimal::ZERO);
        assert_eq!(total, Decimal::new(75, 0));
    }

    #[test]
    fn dropoff_before_pickup_is_rejected() {
        assert!(validate_dates(d("2024-07-10"), d("2024-07-08")).is_err());
        assert!(validate_dates(d("2024-07-10"), d("2024-07-10")).is_ok());
    }
}
