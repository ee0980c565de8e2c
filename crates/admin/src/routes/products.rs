//! Product management handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use tracing::{info, instrument};

use crafteo_core::product::Product;
use crafteo_core::types::ProductId;

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::models::product::ProductInput;
use crate::state::AppState;

/// Catalog list filters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
    pub q: Option<String>,
}

/// List the whole catalog (active and inactive).
#[instrument(skip(_auth, state))]
pub async fn list(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool())
        .list(query.category.as_deref(), query.q.as_deref())
        .await?;
    Ok(Json(products))
}

/// Get a product by ID.
#[instrument(skip(_auth, state))]
pub async fn get(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Product>> {
    let product = ProductRepository::new(state.pool())
        .get(ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    Ok(Json(product))
}

/// Create a product after domain validation.
#[instrument(skip(_auth, state, input), fields(name = %input.name))]
pub async fn create(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Json(input): Json<ProductInput>,
) -> Result<(StatusCode, Json<Product>)> {
    let candidate = input.into_product(ProductId::new(0))?;
    let product = ProductRepository::new(state.pool()).create(&candidate).await?;

    info!(product_id = %product.id, name = %product.name, "product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// Replace a product (full-form save) after domain validation.
#[instrument(skip(_auth, state, input))]
pub async fn update(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<ProductInput>,
) -> Result<Json<Product>> {
    let id = ProductId::new(id);
    let candidate = input.into_product(id)?;
    let product = ProductRepository::new(state.pool()).update(id, &candidate).await?;

    info!(product_id = %product.id, "product updated");
    Ok(Json(product))
}

/// Retire a product from the catalog.
///
/// Soft delete: order snapshots keep their own copy of every line, and a
/// retired product simply stops being listed or purchasable.
#[instrument(skip(_auth, state))]
pub async fn remove(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    let removed = ProductRepository::new(state.pool())
        .deactivate(ProductId::new(id))
        .await?;
    if !removed {
        return Err(AppError::NotFound(format!("product {id}")));
    }

    info!(product_id = id, "product retired");
    Ok(StatusCode::NO_CONTENT)
}
