//! Order management inputs and filters.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use crafteo_core::order::{CustomerInfo, OrderItem};
use crafteo_core::types::OrderStatus;

/// Filter criteria for listing orders.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderFilter {
    /// Filter by status.
    pub status: Option<OrderStatus>,
    /// Orders created on or after this date.
    pub from: Option<NaiveDate>,
    /// Orders created on or before this date.
    pub to: Option<NaiveDate>,
    /// Search customer name/email or order number.
    pub q: Option<String>,
    /// Maximum number of results (default 50).
    pub limit: Option<i64>,
    /// Number of results to skip.
    pub offset: Option<i64>,
}

/// Input for a status transition.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusInput {
    pub status: OrderStatus,
}

/// Input for setting the tracking number.
#[derive(Debug, Deserialize)]
pub struct UpdateTrackingInput {
    pub tracking_number: String,
}

/// Input for recording a payment manually.
#[derive(Debug, Deserialize)]
pub struct UpdatePaymentInput {
    pub payment_id: String,
    pub payment_status: crafteo_core::types::PaymentStatus,
}

/// Input for recording a partial payment.
#[derive(Debug, Deserialize)]
pub struct DepositInput {
    /// Amount already received; `None` clears the deposit.
    pub amount: Option<Decimal>,
}

/// Input for the promised delivery date.
#[derive(Debug, Deserialize)]
pub struct PromisedDateInput {
    /// Date promised to the customer; `None` clears it.
    pub date: Option<NaiveDate>,
}

/// Input for the order correction path.
///
/// Replaces the customer block and/or the item snapshot; totals are
/// recomputed server-side from the new items and the existing shipping
/// cost.
#[derive(Debug, Deserialize)]
pub struct EditOrderInput {
    #[serde(default)]
    pub customer: Option<CustomerInfo>,
    #[serde(default)]
    pub items: Option<Vec<OrderItem>>,
    #[serde(default)]
    pub notes: Option<String>,
}
