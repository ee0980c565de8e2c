//! Shipping quote route handler.

use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use tracing::instrument;

use crafteo_core::pricing;
use crafteo_core::types::{ProductId, SaleType, ShippingMethod};
use rust_decimal::Decimal;

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::services::quotes::{self, ShippingQuote};
use crate::state::AppState;

/// One line of the cart being quoted.
#[derive(Debug, Deserialize)]
pub struct QuoteLine {
    pub product_id: ProductId,
    pub quantity: i32,
    #[serde(default)]
    pub sale_type: SaleType,
}

/// Shipping quote request.
#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub method: ShippingMethod,
    pub postal_code: Option<String>,
    pub items: Vec<QuoteLine>,
}

/// Quote the shipping cost for a cart and method.
#[instrument(skip(state, request), fields(method = %request.method))]
pub async fn quote(
    State(state): State<AppState>,
    Json(request): Json<QuoteRequest>,
) -> Result<Json<ShippingQuote>> {
    if request.items.is_empty() {
        return Err(AppError::Validation("el carrito está vacío".to_string()));
    }

    let ids: Vec<ProductId> = request.items.iter().map(|l| l.product_id).collect();
    let products = ProductRepository::new(state.pool()).get_many(&ids).await?;

    let mut lines = Vec::with_capacity(request.items.len());
    let mut subtotal = Decimal::ZERO;
    for line in &request.items {
        let product = products
            .iter()
            .find(|p| p.id == line.product_id)
            .ok_or_else(|| {
                AppError::Validation(format!("producto desconocido: {}", line.product_id))
            })?;
        subtotal += pricing::price_for(product, line.sale_type) * Decimal::from(line.quantity);
        lines.push((product.clone(), line.quantity));
    }

    let quote = quotes::quote(
        &state,
        request.method,
        request.postal_code.as_deref(),
        &lines,
        subtotal,
    )
    .await?;

    Ok(Json(quote))
}
