//! Storefront route handlers.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod orders;
pub mod payments;
pub mod shipping;

use axum::Router;
use axum::routing::{get, post};

use crate::state::AppState;

/// All public API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(catalog::list_products))
        .route("/api/products/{id}", get(catalog::get_product))
        .route("/api/categories", get(catalog::list_categories))
        .route("/api/cart/price", post(cart::price_cart))
        .route("/api/shipping/quote", post(shipping::quote))
        .route("/api/checkout", post(checkout::create_order))
        .route("/api/orders/{number}/tracking", get(orders::tracking))
        .route("/api/payments/preference", post(payments::create_preference))
        .route("/api/payments/callback", get(payments::callback))
}
