//! Product CRUD for the back office.

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

/// Repository for product authoring.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List the whole catalog (active and inactive), optionally filtered.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        category: Option<&str>,
        search: Option<&str>,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS}
             FROM products
             WHERE ($1::text IS NULL OR category = $1)
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

    /// Insert a validated product. The given id is ignored; the database
    /// assigns one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, product: &Product) -> Result<Product, RepositoryError> {
        let row: ProductRow = sqlx::query_as(&format!(
            "INSERT INTO products (
                 name, category, technology, price, stock,
                 width_cm, height_cm, length_cm, weight_g, image_url, active,
                 unit_enabled, pack_enabled, units_per_pack, pack_discount_pct,
                 wholesale_enabled, wholesale_units, wholesale_discount_pct,
                 recipe, model_options, color_options
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11,
                     $12, $13, $14, $15, $16, $17, $18, $19, $20, $21)
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&product.name)
        .bind(&product.category)
        .bind(product.technology.as_str())
        .bind(product.price)
        .bind(product.stock)
        .bind(product.width_cm)
        .bind(product.height_cm)
        .bind(product.length_cm)
        .bind(product.weight_g)
        .bind(&product.image_url)
        .bind(product.active)
        .bind(product.unit_enabled)
        .bind(product.pack_enabled)
        .bind(product.units_per_pack)
        .bind(product.pack_discount_pct)
        .bind(product.wholesale_enabled)
        .bind(product.wholesale_units)
        .bind(product.wholesale_discount_pct)
        .bind(product.recipe.as_ref().map(Json))
        .bind(Json(&product.model_options))
        .bind(Json(&product.color_options))
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// Replace a product record (full-form save).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist, or
    /// `RepositoryError::Database` for other failures.
    pub async fn update(
        &self,
        id: ProductId,
        product: &Product,
    ) -> Result<Product, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "UPDATE products SET
                 name = $2, category = $3, technology = $4, price = $5, stock = $6,
                 width_cm = $7, height_cm = $8, length_cm = $9, weight_g = $10,
                 image_url = $11, active = $12,
                 unit_enabled = $13, pack_enabled = $14, units_per_pack = $15,
                 pack_discount_pct = $16,
                 wholesale_enabled = $17, wholesale_units = $18, wholesale_discount_pct = $19,
                 recipe = $20, model_options = $21, color_options = $22,
                 updated_at = now()
             WHERE id = $1
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id.as_i32())
        .bind(&product.name)
        .bind(&product.category)
        .bind(product.technology.as_str())
        .bind(product.price)
        .bind(product.stock)
        .bind(product.width_cm)
        .bind(product.height_cm)
        .bind(product.length_cm)
        .bind(product.weight_g)
        .bind(&product.image_url)
        .bind(product.active)
        .bind(product.unit_enabled)
        .bind(product.pack_enabled)
        .bind(product.units_per_pack)
        .bind(product.pack_discount_pct)
        .bind(product.wholesale_enabled)
        .bind(product.wholesale_units)
        .bind(product.wholesale_discount_pct)
        .bind(product.recipe.as_ref().map(Json))
        .bind(Json(&product.model_options))
        .bind(Json(&product.color_options))
        .fetch_optional(self.pool)
        .await?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }

    /// Retire a product from the catalog (soft delete).
    ///
    /// Orders keep their own item snapshots, so retired products never
    /// break history.
    ///
    /// # Returns
    ///
    /// Returns `true` if the product was deactivated, `false` if it didn't
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn deactivate(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE products SET active = FALSE, updated_at = now() WHERE id = $1",
        )
        .bind(id.as_i32())
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
