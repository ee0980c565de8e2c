//! Database migration command.
//!
//! Migrations live in `crates/storefront/migrations/`; storefront and
//! admin share one database, so there is a single migration history.

use super::{CommandError, connect};

/// Run all pending migrations.
///
/// # Errors
///
/// Returns [`CommandError`] when `DATABASE_URL` is missing, the connection
/// fails, or a migration fails to apply.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../storefront/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
