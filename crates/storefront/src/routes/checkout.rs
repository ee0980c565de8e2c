//! Checkout route handler.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::instrument;

use crafteo_core::order::{NewOrder, Order};

use crate::error::Result;
use crate::services::checkout;
use crate::state::AppState;

/// Create an order from the customer's checkout request.
#[instrument(skip(state, input))]
pub async fn create_order(
    State(state): State<AppState>,
    Json(input): Json<NewOrder>,
) -> Result<(StatusCode, Json<Order>)> {
    let order = checkout::create_order(&state, input).await?;
    Ok((StatusCode::CREATED, Json(order)))
}
