//! Invoices repository

use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{
        enums::{InvoiceStatus, PaymentMethod},
        invoice::Invoice,
        reservation::Reservation,
    },
};

#[derive(Clone)]
pub struct InvoicesRepository {
    pool: Pool<Postgres>,
}

impl InvoicesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Write a draft invoice for a reservation's total
    pub async fn create_draft(
        &self,
        reservation: &Reservation,
        created_by: &str,
    ) -> AppResult<Invoice> {
        let now = Utc::now();
        let suffix = now.timestamp_millis() % 10_000;
        let id = format!(
            "INV-{}-{:04}",
            reservation.id.trim_start_matches("RES-"),
            suffix
        );

        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            INSERT INTO invoices (
                id, customer_name, date, amount, status, created_by,
                payment_method, reservation_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(&reservation.customer_name)
        .bind(now.date_naive())
        .bind(reservation.total_cost)
        .bind(InvoiceStatus::Draft)
        .bind(created_by)
        .bind(PaymentMethod::NotApplicable)
        .bind(&reservation.id)
        .fetch_one(&self.pool)
        .await?;
        Ok(invoice)
    }
}
