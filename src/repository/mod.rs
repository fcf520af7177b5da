//! Repository layer for database operations

pub mod contracts;
pub mod customers;
pub mod invoices;
pub mod reservations;
pub mod vehicles;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub vehicles: vehicles::VehiclesRepository,
    pub customers: customers::CustomersRepository,
    pub reservations: reservations::ReservationsRepository,
    pub contracts: contracts::ContractsRepository,
    pub invoices: invoices::InvoicesRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            vehicles: vehicles::VehiclesRepository::new(pool.clone()),
            customers: customers::CustomersRepository::new(pool.clone()),
            reservations: reservations::ReservationsRepository::new(pool.clone()),
            contracts: contracts::ContractsRepository::new(pool.clone()),
            invoices: invoices::InvoicesRepository::new(pool.clone()),
            pool,
        }
    }
}
