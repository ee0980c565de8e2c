//! Order persistence: the checkout transaction and payment updates.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;
use thiserror::Error;

use crafteo_core::order::{CustomerInfo, Order, OrderItem};
use crafteo_core::types::{OrderId, PaymentStatus, ProductId, ShippingMethod};

use super::outbox::OutboxKind;
use super::{RepositoryError, products};

pub(crate) const ORDER_COLUMNS: &str = "id, order_number, customer_name, customer_email, \
     customer_phone, address, city, postal_code, items, subtotal, shipping_cost, total, \
     shipping_method, status, tracking_number, payment_id, payment_status, deposit_amount, \
     promised_date, notes, created_at, updated_at";

/// Internal row type for order queries.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct OrderRow {
    id: i32,
    order_number: i64,
    customer_name: String,
    customer_email: String,
    customer_phone: String,
    address: Option<String>,
    city: Option<String>,
    postal_code: Option<String>,
    items: Json<Vec<OrderItem>>,
    subtotal: Decimal,
    shipping_cost: Decimal,
    total: Decimal,
    shipping_method: String,
    status: String,
    tracking_number: Option<String>,
    payment_id: Option<String>,
    payment_status: Option<String>,
    deposit_amount: Option<Decimal>,
    promised_date: Option<NaiveDate>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let corrupted =
            |e: String| RepositoryError::DataCorruption(format!("order {}: {e}", row.id));
        Ok(Self {
            id: OrderId::new(row.id),
            order_number: row.order_number,
            customer: CustomerInfo {
                name: row.customer_name,
                email: row.customer_email,
                phone: row.customer_phone,
                address: row.address,
                city: row.city,
                postal_code: row.postal_code,
            },
            items: row.items.0,
            subtotal: row.subtotal,
            shipping_cost: row.shipping_cost,
            total: row.total,
            shipping_method: row.shipping_method.parse().map_err(corrupted)?,
            status: row.status.parse().map_err(corrupted)?,
            tracking_number: row.tracking_number,
            payment_id: row.payment_id,
            payment_status: row
                .payment_status
                .as_deref()
                .map(str::parse)
                .transpose()
                .map_err(corrupted)?,
            deposit_amount: row.deposit_amount,
            promised_date: row.promised_date,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Everything checkout has already computed, ready to persist.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub customer: CustomerInfo,
    pub items: Vec<OrderItem>,
    pub subtotal: Decimal,
    pub shipping_cost: Decimal,
    pub total: Decimal,
    pub shipping_method: ShippingMethod,
    pub notes: Option<String>,
    /// Stock decrements for products that track inventory.
    pub stock_lines: Vec<(ProductId, i32)>,
}

/// Why an order failed to persist.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// A tracked product had less stock than the order requested. The whole
    /// transaction rolls back; nothing was sold.
    #[error("stock insuficiente para el producto {product_id}")]
    InsufficientStock { product_id: ProductId },

    /// The insert itself failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for CheckoutError {
    fn from(e: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(e))
    }
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Persist an order atomically: stock decrements, the order row and its
    /// outbox intents commit together or not at all.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InsufficientStock`] when a conditional stock
    /// decrement affects zero rows (the transaction rolls back), or
    /// [`CheckoutError::Repository`] on database failures.
    pub async fn create(&self, draft: OrderDraft) -> Result<Order, CheckoutError> {
        let mut tx = self.pool.begin().await?;

        for (product_id, quantity) in &draft.stock_lines {
            let taken = products::decrement_stock(&mut *tx, *product_id, *quantity).await?;
            if !taken {
                return Err(CheckoutError::InsufficientStock {
                    product_id: *product_id,
                });
            }
        }

        let row: OrderRow = sqlx::query_as(&format!(
            "INSERT INTO orders (
                 customer_name, customer_email, customer_phone, address, city, postal_code,
                 items, subtotal, shipping_cost, total, shipping_method, status, notes
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, 'pending', $12)
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(&draft.customer.name)
        .bind(&draft.customer.email)
        .bind(&draft.customer.phone)
        .bind(&draft.customer.address)
        .bind(&draft.customer.city)
        .bind(&draft.customer.postal_code)
        .bind(Json(&draft.items))
        .bind(draft.subtotal)
        .bind(draft.shipping_cost)
        .bind(draft.total)
        .bind(draft.shipping_method.as_str())
        .bind(&draft.notes)
        .fetch_one(&mut *tx)
        .await?;

        // Side-effect intents ride the same transaction: an order either
        // exists with its outbox entries or does not exist at all.
        for kind in [
            OutboxKind::MaterialDeduction,
            OutboxKind::OrderWebhook,
            OutboxKind::ConfirmationEmail,
        ] {
            sqlx::query(
                "INSERT INTO outbox_events (order_id, kind, payload) VALUES ($1, $2, $3)",
            )
            .bind(row.id)
            .bind(kind.as_str())
            .bind(Json(serde_json::json!({ "event": "order_created" })))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(row.try_into()?)
    }

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row: Option<OrderRow> =
            sqlx::query_as(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
                .bind(id.as_i32())
                .fetch_optional(self.pool)
                .await?;
        row.map(TryInto::try_into).transpose()
    }

    /// Get an order by its customer-facing order number.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_number(&self, number: i64) -> Result<Option<Order>, RepositoryError> {
        let row: Option<OrderRow> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE order_number = $1"
        ))
        .bind(number)
        .fetch_optional(self.pool)
        .await?;
        row.map(TryInto::try_into).transpose()
    }

    /// Record the payment outcome reported by the gateway.
    ///
    /// The order status follows the payment status where one is implied
    /// (approved → paid, pending/in-process → payment pending); rejections
    /// keep the current status so the customer can retry.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist, or
    /// `RepositoryError::Database` for other failures.
    pub async fn update_payment(
        &self,
        id: OrderId,
        payment_id: &str,
        payment_status: PaymentStatus,
    ) -> Result<Order, RepositoryError> {
        let implied = payment_status
            .implied_order_status()
            .map(|s| s.as_str().to_string());

        let row: Option<OrderRow> = sqlx::query_as(&format!(
            "UPDATE orders
             SET payment_id = $2, payment_status = $3,
                 status = COALESCE($4, status),
                 updated_at = now()
             WHERE id = $1
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id.as_i32())
        .bind(payment_id)
        .bind(payment_status.as_str())
        .bind(implied)
        .fetch_optional(self.pool)
        .await?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }
}
