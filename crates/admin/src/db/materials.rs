//! Raw-material CRUD and manual adjustments.

use rust_decimal::Decimal;
use sqlx::PgPool;

use crafteo_core::material::RawMaterial;
use crafteo_core::types::RawMaterialId;

use super::RepositoryError;
use crate::models::material::MaterialInput;

/// Internal row type for material queries.
#[derive(Debug, sqlx::FromRow)]
struct MaterialRow {
    id: i32,
    name: String,
    category: String,
    quantity: Decimal,
    unit: String,
    min_stock: Decimal,
}

impl TryFrom<MaterialRow> for RawMaterial {
    type Error = RepositoryError;

    fn try_from(row: MaterialRow) -> Result<Self, Self::Error> {
        let unit = row.unit.parse().map_err(|e: String| {
            RepositoryError::DataCorruption(format!("material {}: {e}", row.id))
        })?;
        Ok(Self {
            id: RawMaterialId::new(row.id),
            name: row.name,
            category: row.category,
            quantity: row.quantity,
            unit,
            min_stock: row.min_stock,
        })
    }
}

const MATERIAL_COLUMNS: &str = "id, name, category, quantity, unit, min_stock";

/// Repository for raw-material authoring.
pub struct MaterialRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> MaterialRepository<'a> {
    /// Create a new material repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all materials, optionally filtered by category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, category: Option<&str>) -> Result<Vec<RawMaterial>, RepositoryError> {
        let rows: Vec<MaterialRow> = sqlx::query_as(&format!(
            "SELECT {MATERIAL_COLUMNS}
             FROM raw_materials
             WHERE ($1::text IS NULL OR category = $1)
             ORDER BY category, name"
        ))
        .bind(category)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get a material by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: RawMaterialId) -> Result<Option<RawMaterial>, RepositoryError> {
        let row: Option<MaterialRow> = sqlx::query_as(&format!(
            "SELECT {MATERIAL_COLUMNS} FROM raw_materials WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;
        row.map(TryInto::try_into).transpose()
    }

    /// Create a material.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, input: &MaterialInput) -> Result<RawMaterial, RepositoryError> {
        let row: MaterialRow = sqlx::query_as(&format!(
            "INSERT INTO raw_materials (name, category, quantity, unit, min_stock)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {MATERIAL_COLUMNS}"
        ))
        .bind(&input.name)
        .bind(&input.category)
        .bind(input.quantity)
        .bind(input.unit.as_str())
        .bind(input.min_stock)
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// Replace a material record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the material doesn't exist.
    pub async fn update(
        &self,
        id: RawMaterialId,
        input: &MaterialInput,
    ) -> Result<RawMaterial, RepositoryError> {
        let row: Option<MaterialRow> = sqlx::query_as(&format!(
            "UPDATE raw_materials
             SET name = $2, category = $3, quantity = $4, unit = $5, min_stock = $6,
                 updated_at = now()
             WHERE id = $1
             RETURNING {MATERIAL_COLUMNS}"
        ))
        .bind(id.as_i32())
        .bind(&input.name)
        .bind(&input.category)
        .bind(input.quantity)
        .bind(input.unit.as_str())
        .bind(input.min_stock)
        .fetch_optional(self.pool)
        .await?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }

    /// Delete a material.
    ///
    /// Recipes referencing it by id fall back to name resolution, and
    /// unmatched entries are skipped at draw time, so deletion is safe.
    ///
    /// # Returns
    ///
    /// Returns `true` if the material was deleted, `false` if it didn't
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: RawMaterialId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM raw_materials WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Apply a signed manual adjustment, clamped at zero.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the material doesn't exist.
    pub async fn adjust(
        &self,
        id: RawMaterialId,
        delta: Decimal,
    ) -> Result<RawMaterial, RepositoryError> {
        let row: Option<MaterialRow> = sqlx::query_as(&format!(
            "UPDATE raw_materials
             SET quantity = GREATEST(ROUND(quantity + $2, 3), 0), updated_at = now()
             WHERE id = $1
             RETURNING {MATERIAL_COLUMNS}"
        ))
        .bind(id.as_i32())
        .bind(delta)
        .fetch_optional(self.pool)
        .await?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }
}
