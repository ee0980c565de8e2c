//! Stateless cart pricing.
//!
//! The cart itself lives client-side; this endpoint takes the client's cart
//! and answers with authoritative prices and quantities clamped to the
//! current catalog, so a stale browser tab can never check out at old
//! prices or beyond stock.

use axum::Json;
use axum::extract::State;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crafteo_core::cart::{Cart, CartItem};
use crafteo_core::types::{ProductId, SaleType};

use crate::db::ProductRepository;
use crate::error::Result;
use crate::state::AppState;

/// One cart line as the client sent it.
#[derive(Debug, Deserialize)]
pub struct CartLineRequest {
    pub product_id: ProductId,
    pub quantity: i32,
    #[serde(default)]
    pub sale_type: SaleType,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// Cart pricing request.
#[derive(Debug, Deserialize)]
pub struct CartPriceRequest {
    pub items: Vec<CartLineRequest>,
}

/// One priced cart line.
#[derive(Debug, Serialize)]
pub struct PricedLine {
    pub product_id: ProductId,
    pub name: String,
    pub sale_type: SaleType,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub available_stock: Option<i32>,
    pub line_total: Decimal,
}

/// The authoritative cart answer.
#[derive(Debug, Serialize)]
pub struct PricedCart {
    pub lines: Vec<PricedLine>,
    pub subtotal: Decimal,
    /// Whether any line was dropped or clamped against the catalog.
    pub adjusted: bool,
}

/// Re-price a client cart against the current catalog.
#[instrument(skip(state, request), fields(lines = request.items.len()))]
pub async fn price_cart(
    State(state): State<AppState>,
    Json(request): Json<CartPriceRequest>,
) -> Result<Json<PricedCart>> {
    let ids: Vec<ProductId> = request.items.iter().map(|l| l.product_id).collect();
    let products = ProductRepository::new(state.pool()).get_many(&ids).await?;

    let requested = request.items.len();
    let mut cart = Cart {
        items: request
            .items
            .into_iter()
            .filter_map(|line| {
                products
                    .iter()
                    .find(|p| p.id == line.product_id)
                    .map(|product| CartItem {
                        product: product.clone(),
                        quantity: line.quantity.max(1),
                        sale_type: line.sale_type,
                        model: line.model,
                        color: line.color,
                    })
            })
            .collect(),
    };
    let dropped_missing = requested - cart.items.len();
    let clamped = cart.clamp_to_catalog(&products);

    let lines = cart
        .items
        .iter()
        .map(|item| PricedLine {
            product_id: item.product.id,
            name: item.product.name.clone(),
            sale_type: item.sale_type,
            unit_price: item.unit_price(),
            quantity: item.quantity,
            available_stock: item.product.stock,
            line_total: item.line_total(),
        })
        .collect();

    Ok(Json(PricedCart {
        lines,
        subtotal: cart.subtotal(),
        adjusted: dropped_missing + clamped > 0,
    }))
}
