//! Payment route handlers: preference creation and the gateway callback.

use axum::Json;
use axum::extract::{Query, RawQuery, State};
use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crafteo_core::types::{OrderId, PaymentStatus};

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::payments::PaymentPreference;
use crate::state::AppState;

/// Preference creation request.
#[derive(Debug, Deserialize)]
pub struct PreferenceRequest {
    pub order_id: OrderId,
}

/// Create a gateway checkout preference for an order and return the
/// redirect URL.
#[instrument(skip(state))]
pub async fn create_preference(
    State(state): State<AppState>,
    Json(request): Json<PreferenceRequest>,
) -> Result<Json<PaymentPreference>> {
    let order = OrderRepository::new(state.pool())
        .get(request.order_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("pedido {}", request.order_id)))?;

    if order.payment_status == Some(PaymentStatus::Approved) {
        return Err(AppError::BadRequest("el pedido ya está pagado".to_string()));
    }

    let preference = state
        .payments()
        .create_preference(&order, &state.config().base_url)
        .await?;

    info!(order_id = %order.id, preference_id = %preference.id, "payment preference created");
    Ok(Json(preference))
}

/// Callback query parameters sent by the gateway redirect.
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub order_id: OrderId,
    pub payment_id: String,
    pub status: String,
}

/// Callback acknowledgement.
#[derive(Debug, Serialize)]
pub struct CallbackAck {
    pub order_number: i64,
    pub order_status: &'static str,
    pub payment_status: &'static str,
}

/// Record the payment outcome the gateway reported.
///
/// When a webhook secret is configured the `x-signature` / `x-timestamp`
/// headers must verify against the raw query string.
#[instrument(skip(state, headers, raw_query, params), fields(order_id = %params.order_id))]
pub async fn callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(raw_query): RawQuery,
    Query(params): Query<CallbackParams>,
) -> Result<Json<CallbackAck>> {
    let signature = headers
        .get("x-signature")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let timestamp = headers
        .get("x-timestamp")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    state
        .payments()
        .verify_callback(timestamp, raw_query.as_deref().unwrap_or_default(), signature)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let payment_status: PaymentStatus = params
        .status
        .parse()
        .map_err(|e: String| AppError::BadRequest(e))?;

    let order = OrderRepository::new(state.pool())
        .update_payment(params.order_id, &params.payment_id, payment_status)
        .await?;

    info!(
        order_id = %order.id,
        payment_status = %payment_status,
        order_status = %order.status,
        "payment callback recorded"
    );

    Ok(Json(CallbackAck {
        order_number: order.order_number,
        order_status: order.status.as_str(),
        payment_status: payment_status.as_str(),
    }))
}
