//! Shipping configuration and zone management.

use rust_decimal::Decimal;
use sqlx::PgPool;

use crafteo_core::shipping::{ShippingConfig, ShippingZone};
use crafteo_core::types::ShippingZoneId;

use super::RepositoryError;
use crate::models::shipping::{ShippingConfigInput, ShippingZoneInput};

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

const ZONE_COLUMNS: &str = "id, name, cp_from, cp_to, price, free_threshold, active";

/// Repository for shipping configuration management.
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
    /// Returns `RepositoryError::NotFound` if the row is missing.
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

    /// Replace the shipping config singleton.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the row is missing.
    pub async fn update_config(
        &self,
        input: &ShippingConfigInput,
    ) -> Result<ShippingConfig, RepositoryError> {
        let row: Option<ShippingConfigRow> = sqlx::query_as(
            "UPDATE shipping_config
             SET moto_free_threshold = $1, moto_base_fee = $2,
                 mail_free_threshold = $3, mail_fallback_fee = $4,
                 updated_at = now()
             WHERE id = (SELECT id FROM shipping_config ORDER BY id LIMIT 1)
             RETURNING moto_free_threshold, moto_base_fee, mail_free_threshold, mail_fallback_fee",
        )
        .bind(input.moto_free_threshold)
        .bind(input.moto_base_fee)
        .bind(input.mail_free_threshold)
        .bind(input.mail_fallback_fee)
        .fetch_optional(self.pool)
        .await?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    /// List all zones, active and inactive.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_zones(&self) -> Result<Vec<ShippingZone>, RepositoryError> {
        let rows: Vec<ShippingZoneRow> = sqlx::query_as(&format!(
            "SELECT {ZONE_COLUMNS} FROM shipping_zones ORDER BY id"
        ))
        .fetch_all(self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Create a zone.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create_zone(
        &self,
        input: &ShippingZoneInput,
    ) -> Result<ShippingZone, RepositoryError> {
        let row: ShippingZoneRow = sqlx::query_as(&format!(
            "INSERT INTO shipping_zones (name, cp_from, cp_to, price, free_threshold, active)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {ZONE_COLUMNS}"
        ))
        .bind(&input.name)
        .bind(input.cp_from)
        .bind(input.cp_to)
        .bind(input.price)
        .bind(input.free_threshold)
        .bind(input.active)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Replace a zone.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the zone doesn't exist.
    pub async fn update_zone(
        &self,
        id: ShippingZoneId,
        input: &ShippingZoneInput,
    ) -> Result<ShippingZone, RepositoryError> {
        let row: Option<ShippingZoneRow> = sqlx::query_as(&format!(
            "UPDATE shipping_zones
             SET name = $2, cp_from = $3, cp_to = $4, price = $5,
                 free_threshold = $6, active = $7
             WHERE id = $1
             RETURNING {ZONE_COLUMNS}"
        ))
        .bind(id.as_i32())
        .bind(&input.name)
        .bind(input.cp_from)
        .bind(input.cp_to)
        .bind(input.price)
        .bind(input.free_threshold)
        .bind(input.active)
        .fetch_optional(self.pool)
        .await?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    /// Delete a zone.
    ///
    /// # Returns
    ///
    /// Returns `true` if the zone was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_zone(&self, id: ShippingZoneId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM shipping_zones WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
