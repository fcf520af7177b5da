//! Invoice model

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::enums::{InvoiceStatus, PaymentMethod};

/// Invoice model from database. Reservation create/edit generates a draft
/// invoice; payment handling belongs to the billing screens.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Invoice {
    pub id: String,
    pub customer_name: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub status: InvoiceStatus,
    pub created_by: String,
    pub payment_method: PaymentMethod,
    pub reservation_id: Option<String>,
}
