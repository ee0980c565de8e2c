//! Catalog reads and the atomic stock decrement used at checkout.

use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;

use crafteo_core::product::{Product, Recipe};
use crafteo_core::types::ProductId;

use super::RepositoryError;

const PRODUCT_COLUMNS: &str = "id, name, category, technology, price, stock, \
     width_cm, height_cm, length_cm, weight_g, image_url, active, \
     unit_enabled, pack_enabled, units_per_pack, pack_discount_pct, \
     wholesale_enabled, wholesale_units, wholesale_discount_pct, \
     recipe, model_options, color_options";

/// Internal row type for product queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    category: String,
    technology: String,
    price: Decimal,
    stock: Option<i32>,
    width_cm: Decimal,
    height_cm: Decimal,
    length_cm: Decimal,
    weight_g: Option<Decimal>,
    image_url: Option<String>,
    active: bool,
    unit_enabled: bool,
    pack_enabled: bool,
    units_per_pack: Option<i32>,
    pack_discount_pct: Option<Decimal>,
    wholesale_enabled: bool,
    wholesale_units: Option<i32>,
    wholesale_discount_pct: Option<Decimal>,
    recipe: Option<Json<Recipe>>,
    model_options: Json<Vec<String>>,
    color_options: Json<Vec<String>>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let technology = row.technology.parse().map_err(|e: String| {
            RepositoryError::DataCorruption(format!("product {}: {e}", row.id))
        })?;
        Ok(Self {
            id: ProductId::new(row.id),
            name: row.name,
            category: row.category,
            technology,
            price: row.price,
            stock: row.stock,
            width_cm: row.width_cm,
            height_cm: row.height_cm,
            length_cm: row.length_cm,
            weight_g: row.weight_g,
            image_url: row.image_url,
            active: row.active,
            unit_enabled: row.unit_enabled,
            pack_enabled: row.pack_enabled,
            units_per_pack: row.units_per_pack,
            pack_discount_pct: row.pack_discount_pct,
            wholesale_enabled: row.wholesale_enabled,
            wholesale_units: row.wholesale_units,
            wholesale_discount_pct: row.wholesale_discount_pct,
            recipe: row.recipe.map(|Json(r)| r),
            model_options: row.model_options.0,
            color_options: row.color_options.0,
        })
    }
}

/// Repository for catalog reads on the public surface.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List active products, optionally filtered by category and name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `DataCorruption` if a row holds an unknown technology tag.
    pub async fn list_active(
        &self,
        category: Option<&str>,
        search: Option<&str>,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS}
             FROM products
             WHERE active
               AND ($1::text IS NULL OR category = $1)
               AND ($2::text IS NULL OR name ILIKE '%' || $2 || '%')
             ORDER BY category, name"
        ))
        .bind(category)
        .bind(search)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> =
            sqlx::query_as(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"))
                .bind(id.as_i32())
                .fetch_optional(self.pool)
                .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Get several products by ID in one round trip.
    ///
    /// Missing IDs are simply absent from the result.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_many(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        let raw_ids: Vec<i32> = ids.iter().map(ProductId::as_i32).collect();
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ANY($1)"
        ))
        .bind(&raw_ids)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// List distinct categories of active products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_categories(&self) -> Result<Vec<String>, RepositoryError> {
        let categories = sqlx::query_scalar(
            "SELECT DISTINCT category FROM products WHERE active ORDER BY category",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(categories)
    }
}

/// Atomically take `quantity` units off a product's tracked stock.
///
/// The conditional `WHERE stock >= $2` makes concurrent checkouts safe:
/// whichever statement runs second sees the already-decremented value and
/// affects zero rows instead of overselling.
///
/// Returns `false` when stock was insufficient (nothing changed).
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn decrement_stock<'e, E>(
    executor: E,
    id: ProductId,
    quantity: i32,
) -> Result<bool, RepositoryError>
where
    E: sqlx::PgExecutor<'e>,
{
    let result = sqlx::query(
        "UPDATE products
         SET stock = stock - $2, updated_at = now()
         WHERE id = $1 AND stock IS NOT NULL AND stock >= $2",
    )
    .bind(id.as_i32())
    .bind(quantity)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}
