//! Raw-material reads and the clamped draw application.

use rust_decimal::Decimal;
use sqlx::PgPool;

use crafteo_core::material::RawMaterial;
use crafteo_core::types::RawMaterialId;

use super::RepositoryError;

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

/// Repository for raw-material operations on the storefront side.
///
/// The storefront only ever reads the inventory snapshot for draw planning
/// and applies the resulting decrements; authoring lives in the admin crate.
pub struct MaterialRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> MaterialRepository<'a> {
    /// Create a new material repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Snapshot of the whole inventory, for draw planning.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `DataCorruption` if a row holds an unknown unit.
    pub async fn list_all(&self) -> Result<Vec<RawMaterial>, RepositoryError> {
        let rows: Vec<MaterialRow> = sqlx::query_as(
            "SELECT id, name, category, quantity, unit, min_stock
             FROM raw_materials
             ORDER BY category, name",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Apply one planned draw.
    ///
    /// A single statement computes `GREATEST(round(quantity - Δ, 3), 0)` so
    /// concurrent draws never interleave a stale read and the quantity never
    /// goes negative. Draws across materials stay independent: a failure on
    /// one material does not undo the others.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the material no longer exists,
    /// or `RepositoryError::Database` for other failures.
    pub async fn apply_draw(
        &self,
        id: RawMaterialId,
        amount: Decimal,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE raw_materials
             SET quantity = GREATEST(ROUND(quantity - $2, 3), 0), updated_at = now()
             WHERE id = $1",
        )
        .bind(id.as_i32())
        .bind(amount)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
