//! Database operations for the admin API.
//!
//! The database is shared with the storefront; this crate holds the
//! authoring and management queries (catalog CRUD, order lifecycle,
//! inventory, shipping configuration, expenses). Queries use sqlx's
//! runtime API against a pool created once at startup.
//!
//! # Migrations
//!
//! Migrations live in `crates/storefront/migrations/` (single shared
//! database) and run via:
//! ```bash
//! cargo run -p crafteo-cli -- migrate
//! ```

pub mod expenses;
pub mod materials;
pub mod orders;
pub mod products;
pub mod shipping;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use expenses::ExpenseRepository;
pub use materials::MaterialRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use shipping::ShippingRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation.
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
