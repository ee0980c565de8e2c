//! Customer-facing order tracking.

use axum::Json;
use axum::extract::{Path, State};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::instrument;

use crafteo_core::order::Order;
use crafteo_core::types::{OrderId, ShippingMethod, StatusLabel};

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Read-only tracking view: status plus display metadata, nothing private
/// beyond what the customer already knows.
#[derive(Debug, Serialize)]
pub struct TrackingView {
    pub order_number: i64,
    pub status: &'static str,
    pub label: StatusLabel,
    pub shipping_method: ShippingMethod,
    pub tracking_number: Option<String>,
    pub promised_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl From<Order> for TrackingView {
    fn from(order: Order) -> Self {
        Self {
            order_number: order.order_number,
            status: order.status.as_str(),
            label: order.status.label(),
            shipping_method: order.shipping_method,
            tracking_number: order.tracking_number,
            promised_date: order.promised_date,
            created_at: order.created_at,
        }
    }
}

/// Look an order up by order number (falling back to raw id).
#[instrument(skip(state))]
pub async fn tracking(
    State(state): State<AppState>,
    Path(number): Path<i64>,
) -> Result<Json<TrackingView>> {
    let repo = OrderRepository::new(state.pool());

    let mut order = repo.get_by_number(number).await?;
    if order.is_none()
        && let Ok(id) = i32::try_from(number)
    {
        order = repo.get(OrderId::new(id)).await?;
    }

    let order = order.ok_or_else(|| AppError::NotFound(format!("pedido {number}")))?;
    Ok(Json(order.into()))
}
