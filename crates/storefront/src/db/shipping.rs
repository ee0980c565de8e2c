//! Shipping configuration and zone reads.

use rust_decimal::Decimal;
use sqlx::PgPool;

use crafteo_core::shipping::{ShippingConfig, ShippingZone};
use crafteo_core::types::ShippingZoneId;

use super::RepositoryError;

/// Internal row type for the shipping config singleton.
#[derive(Debug, sqlx::FromRow)]
struct ShippingConfigRow {
    moto_free_threshold: Decimal,
    moto_base_fee: Decimal,
    mail_free_threshold: Decimal,
    mail_fallback_fee: Option<Decimal>,
}

impl From<ShippingConfigRow> for ShippingConfig {
    fn from(row: ShippingConfigRow) -> Self {
        Self {
            moto_free_threshold: row.moto_free_threshold,
            moto_base_fee: row.moto_base_fee,
            mail_free_threshold: row.mail_free_threshold,
            mail_fallback_fee: row.mail_fallback_fee,
        }
    }
}

/// Internal row type for shipping zones.
#[derive(Debug, sqlx::FromRow)]
struct ShippingZoneRow {
    id: i32,
    name: String,
    cp_from: i32,
    cp_to: i32,
    price: Decimal,
    free_threshold: Option<Decimal>,
    active: bool,
}

impl From<ShippingZoneRow> for ShippingZone {
    fn from(row: ShippingZoneRow) -> Self {
        Self {
            id: ShippingZoneId::new(row.id),
            name: row.name,
            cp_from: row.cp_from,
            cp_to: row.cp_to,
            price: row.price,
            free_threshold: row.free_threshold,
            active: row.active,
        }
    }
}

/// Repository for shipping configuration reads.
pub struct ShippingRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ShippingRepository<'a> {
    /// Create a new shipping repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// The shipping config singleton (seeded by migration).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the row is missing, or
    /// `RepositoryError::Database` if the query fails.
    pub async fn get_config(&self) -> Result<ShippingConfig, RepositoryError> {
        let row: Option<ShippingConfigRow> = sqlx::query_as(
            "SELECT moto_free_threshold, moto_base_fee, mail_free_threshold, mail_fallback_fee
             FROM shipping_config
             ORDER BY id
             LIMIT 1",
        )
        .fetch_optional(self.pool)
        .await?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    /// All active zones, in priority order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_active_zones(&self) -> Result<Vec<ShippingZone>, RepositoryError> {
        let rows: Vec<ShippingZoneRow> = sqlx::query_as(
            "SELECT id, name, cp_from, cp_to, price, free_threshold, active
             FROM shipping_zones
             WHERE active
             ORDER BY id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
