//! Admin route handlers.

pub mod expenses;
pub mod materials;
pub mod orders;
pub mod products;
pub mod reports;
pub mod shipping;

use axum::Router;
use axum::routing::{get, patch, post, put};

use crate::state::AppState;

/// All admin API routes. Every handler requires the bearer token via the
/// [`crate::middleware::RequireAdminAuth`] extractor.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Products
        .route("/api/products", get(products::list).post(products::create))
        .route(
            "/api/products/{id}",
            get(products::get).put(products::update).delete(products::remove),
        )
        // Orders
        .route("/api/orders", get(orders::list))
        .route("/api/orders/{id}", get(orders::get).put(orders::edit))
        .route("/api/orders/{id}/status", patch(orders::update_status))
        .route("/api/orders/{id}/tracking", patch(orders::update_tracking))
        .route("/api/orders/{id}/payment", patch(orders::update_payment))
        .route("/api/orders/{id}/deposit", patch(orders::update_deposit))
        .route(
            "/api/orders/{id}/promised-date",
            patch(orders::update_promised_date),
        )
        // Raw materials
        .route(
            "/api/materials",
            get(materials::list).post(materials::create),
        )
        .route(
            "/api/materials/{id}",
            get(materials::get).put(materials::update).delete(materials::remove),
        )
        .route("/api/materials/{id}/adjust", post(materials::adjust))
        // Shipping configuration
        .route(
            "/api/shipping/config",
            get(shipping::get_config).put(shipping::update_config),
        )
        .route(
            "/api/shipping/zones",
            get(shipping::list_zones).post(shipping::create_zone),
        )
        .route(
            "/api/shipping/zones/{id}",
            put(shipping::update_zone).delete(shipping::delete_zone),
        )
        // Expense ledger
        .route("/api/expenses", get(expenses::list).post(expenses::create))
        .route(
            "/api/expenses/{id}",
            put(expenses::update).delete(expenses::remove),
        )
        // Finance summary
        .route("/api/reports/summary", get(reports::summary))
}
