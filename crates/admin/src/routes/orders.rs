//! Order management handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Serialize;
use tracing::{info, instrument};

use crafteo_core::order::{Order, OrderItem};
use crafteo_core::types::OrderId;

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::models::order::{
    DepositInput, EditOrderInput, OrderFilter, PromisedDateInput, UpdatePaymentInput,
    UpdateStatusInput, UpdateTrackingInput,
};
use crate::state::AppState;

/// A page of orders.
#[derive(Debug, Serialize)]
pub struct OrderPage {
    pub orders: Vec<Order>,
    pub total: i64,
}

/// List orders with filters and pagination.
#[instrument(skip(_auth, state, filter))]
pub async fn list(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Query(filter): Query<OrderFilter>,
) -> Result<Json<OrderPage>> {
    let repo = OrderRepository::new(state.pool());
    let orders = repo.list(&filter).await?;
    let total = repo.count(&filter).await?;
    Ok(Json(OrderPage { orders, total }))
}

/// Get an order by ID.
#[instrument(skip(_auth, state))]
pub async fn get(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Order>> {
    let order = fetch(&state, id).await?;
    Ok(Json(order))
}

/// Transition the order status.
///
/// The canonical transition rule applies: `delivered` is terminal, every
/// other move is allowed.
#[instrument(skip(_auth, state, input))]
pub async fn update_status(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<UpdateStatusInput>,
) -> Result<Json<Order>> {
    let current = fetch(&state, id).await?;
    if !current.status.can_transition_to(input.status) {
        return Err(AppError::Conflict(format!(
            "cannot move order {} from {} to {}",
            current.order_number, current.status, input.status
        )));
    }

    let order = OrderRepository::new(state.pool())
        .update_status(current.id, input.status)
        .await?;

    info!(
        order_number = order.order_number,
        from = %current.status,
        to = %order.status,
        "order status updated"
    );
    Ok(Json(order))
}

/// Set the tracking number.
#[instrument(skip(_auth, state, input))]
pub async fn update_tracking(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<UpdateTrackingInput>,
) -> Result<Json<Order>> {
    let order = OrderRepository::new(state.pool())
        .update_tracking(OrderId::new(id), &input.tracking_number)
        .await?;

    info!(order_number = order.order_number, "tracking number set");
    Ok(Json(order))
}

/// Record a payment outcome manually.
#[instrument(skip(_auth, state, input))]
pub async fn update_payment(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<UpdatePaymentInput>,
) -> Result<Json<Order>> {
    let order = OrderRepository::new(state.pool())
        .update_payment(OrderId::new(id), &input.payment_id, input.payment_status)
        .await?;

    info!(
        order_number = order.order_number,
        payment_status = %input.payment_status,
        "payment recorded"
    );
    Ok(Json(order))
}

/// Set or clear the recorded deposit.
#[instrument(skip(_auth, state, input))]
pub async fn update_deposit(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<DepositInput>,
) -> Result<Json<Order>> {
    if input.amount.is_some_and(|a| a.is_sign_negative()) {
        return Err(AppError::Validation(
            "deposit amount must be non-negative".to_string(),
        ));
    }
    let order = OrderRepository::new(state.pool())
        .update_deposit(OrderId::new(id), input.amount)
        .await?;

    info!(order_number = order.order_number, "deposit updated");
    Ok(Json(order))
}

/// Set or clear the promised delivery date.
#[instrument(skip(_auth, state, input))]
pub async fn update_promised_date(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<PromisedDateInput>,
) -> Result<Json<Order>> {
    let order = OrderRepository::new(state.pool())
        .update_promised_date(OrderId::new(id), input.date)
        .await?;

    info!(order_number = order.order_number, "promised date updated");
    Ok(Json(order))
}

/// Correct an order's customer block and/or item snapshot.
///
/// Totals are recomputed from the new items; the shipping cost stays as
/// quoted at checkout.
#[instrument(skip(_auth, state, input))]
pub async fn edit(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<EditOrderInput>,
) -> Result<Json<Order>> {
    let current = fetch(&state, id).await?;

    let customer = input.customer.unwrap_or(current.customer);
    let items = input.items.unwrap_or(current.items);
    if items.is_empty() {
        return Err(AppError::Validation(
            "an order needs at least one item".to_string(),
        ));
    }
    if items.iter().any(|item| item.quantity < 1) {
        return Err(AppError::Validation(
            "item quantity must be at least 1".to_string(),
        ));
    }
    let notes = input.notes.or(current.notes);

    let subtotal: rust_decimal::Decimal = items.iter().map(OrderItem::line_total).sum();
    let total = subtotal + current.shipping_cost;

    let order = OrderRepository::new(state.pool())
        .update_edited(
            current.id,
            &customer,
            &items,
            notes.as_deref(),
            subtotal,
            total,
        )
        .await?;

    info!(order_number = order.order_number, "order corrected");
    Ok(Json(order))
}

async fn fetch(state: &AppState, id: i32) -> Result<Order> {
    OrderRepository::new(state.pool())
        .get(OrderId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))
}
