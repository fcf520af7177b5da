//! Customers repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult, ErrorCode},
    models::customer::Customer,
};

#[derive(Clone)]
pub struct CustomersRepository {
    pool: Pool<Postgres>,
}

impl CustomersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get customer by ID
    pub async fn get_by_id(&self, id: &str) -> AppResult<Customer> {
        sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(
                    ErrorCode::NoSuchCustomer,
                    format!("Customer with id {} not found", id),
                )
            })
    }
}
