//! CLI subcommands.

pub mod migrate;
pub mod seed;

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use thiserror::Error;

/// Errors shared by the CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("{0}")]
    Refused(String),
}

/// Connect using `DATABASE_URL` (the database is shared by both services).
pub(crate) async fn connect() -> Result<PgPool, CommandError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")
        .map(SecretString::from)
        .map_err(|_| CommandError::MissingEnvVar("DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    Ok(PgPool::connect(database_url.expose_secret()).await?)
}
