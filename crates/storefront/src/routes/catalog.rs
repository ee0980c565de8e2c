//! Catalog route handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crafteo_core::pricing::{PriceOption, price_options};
use crafteo_core::product::Product;
use crafteo_core::types::ProductId;

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::services::catalog;
use crate::state::AppState;

/// Catalog list filters.
#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    /// Filter by category.
    pub category: Option<String>,
    /// Case-insensitive name search.
    pub q: Option<String>,
}

/// A product as the storefront presents it: the record plus its enabled
/// sale-type prices, first one being the default.
#[derive(Debug, Serialize)]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    pub price_options: Vec<PriceOption>,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        let price_options = price_options(&product);
        Self {
            product,
            price_options,
        }
    }
}

/// List active products, optionally filtered.
#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<Vec<ProductView>>> {
    let products = catalog::active_products(&state).await?;

    let needle = query.q.as_deref().map(str::to_lowercase);
    let views = products
        .iter()
        .filter(|p| {
            query
                .category
                .as_deref()
                .is_none_or(|c| p.category.eq_ignore_ascii_case(c))
        })
        .filter(|p| {
            needle
                .as_deref()
                .is_none_or(|q| p.name.to_lowercase().contains(q))
        })
        .cloned()
        .map(ProductView::from)
        .collect();

    Ok(Json(views))
}

/// Get a single product by ID.
#[instrument(skip(state))]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ProductView>> {
    let product = ProductRepository::new(state.pool())
        .get(ProductId::new(id))
        .await?
        .filter(|p| p.active)
        .ok_or_else(|| AppError::NotFound(format!("producto {id}")))?;

    Ok(Json(product.into()))
}

/// List the categories of active products.
#[instrument(skip(state))]
pub async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<String>>> {
    let categories = ProductRepository::new(state.pool()).list_categories().await?;
    Ok(Json(categories))
}
