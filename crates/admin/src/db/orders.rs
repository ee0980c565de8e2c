//! Order management queries for the back office.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use sqlx::types::Json;

use crafteo_core::order::{CustomerInfo, Order, OrderItem};
use crafteo_core::types::{OrderId, OrderStatus, PaymentStatus};

use super::RepositoryError;
use crate::models::order::OrderFilter;

const ORDER_COLUMNS: &str = "id, order_number, customer_name, customer_email, \
     customer_phone, address, city, postal_code, items, subtotal, shipping_cost, total, \
     shipping_method, status, tracking_number, payment_id, payment_status, deposit_amount, \
     promised_date, notes, created_at, updated_at";

/// Internal row type for order queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
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

/// One row of the sales summary, grouped by status.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SalesSummaryRow {
    pub status: String,
    pub orders: i64,
    pub total: Decimal,
}

/// Repository for order management.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List orders with filtering and pagination, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, filter: &OrderFilter) -> Result<Vec<Order>, RepositoryError> {
        let limit = filter.limit.unwrap_or(50);
        let offset = filter.offset.unwrap_or(0);

        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS}
             FROM orders
             WHERE ($1::text IS NULL OR status = $1)
               AND ($2::date IS NULL OR created_at >= $2)
               AND ($3::date IS NULL OR created_at < $3 + INTERVAL '1 day')
               AND ($4::text IS NULL OR (
                    customer_name ILIKE '%' || $4 || '%'
                    OR customer_email ILIKE '%' || $4 || '%'
                    OR order_number::text = $4))
             ORDER BY created_at DESC
             LIMIT $5 OFFSET $6"
        ))
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.from)
        .bind(filter.to)
        .bind(&filter.q)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Count orders matching a filter.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self, filter: &OrderFilter) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*)
             FROM orders
             WHERE ($1::text IS NULL OR status = $1)
               AND ($2::date IS NULL OR created_at >= $2)
               AND ($3::date IS NULL OR created_at < $3 + INTERVAL '1 day')
               AND ($4::text IS NULL OR (
                    customer_name ILIKE '%' || $4 || '%'
                    OR customer_email ILIKE '%' || $4 || '%'
                    OR order_number::text = $4))",
        )
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.from)
        .bind(filter.to)
        .bind(&filter.q)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
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

    /// Set the order status.
    ///
    /// Transition legality is the route's concern; this just writes.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    pub async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        let row: Option<OrderRow> = sqlx::query_as(&format!(
            "UPDATE orders SET status = $2, updated_at = now()
             WHERE id = $1 RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id.as_i32())
        .bind(status.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }

    /// Set the tracking number.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    pub async fn update_tracking(
        &self,
        id: OrderId,
        tracking_number: &str,
    ) -> Result<Order, RepositoryError> {
        let row: Option<OrderRow> = sqlx::query_as(&format!(
            "UPDATE orders SET tracking_number = $2, updated_at = now()
             WHERE id = $1 RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id.as_i32())
        .bind(tracking_number)
        .fetch_optional(self.pool)
        .await?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }

    /// Record a payment outcome (manual admin action).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
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
                 status = COALESCE($4, status), updated_at = now()
             WHERE id = $1 RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id.as_i32())
        .bind(payment_id)
        .bind(payment_status.as_str())
        .bind(implied)
        .fetch_optional(self.pool)
        .await?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }

    /// Set or clear the recorded deposit.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    pub async fn update_deposit(
        &self,
        id: OrderId,
        amount: Option<Decimal>,
    ) -> Result<Order, RepositoryError> {
        let row: Option<OrderRow> = sqlx::query_as(&format!(
            "UPDATE orders SET deposit_amount = $2, updated_at = now()
             WHERE id = $1 RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id.as_i32())
        .bind(amount)
        .fetch_optional(self.pool)
        .await?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }

    /// Set or clear the promised delivery date.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    pub async fn update_promised_date(
        &self,
        id: OrderId,
        date: Option<NaiveDate>,
    ) -> Result<Order, RepositoryError> {
        let row: Option<OrderRow> = sqlx::query_as(&format!(
            "UPDATE orders SET promised_date = $2, updated_at = now()
             WHERE id = $1 RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id.as_i32())
        .bind(date)
        .fetch_optional(self.pool)
        .await?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }

    /// Apply a correction: customer block, item snapshot and notes, with
    /// the recomputed totals.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    pub async fn update_edited(
        &self,
        id: OrderId,
        customer: &CustomerInfo,
        items: &[OrderItem],
        notes: Option<&str>,
        subtotal: Decimal,
        total: Decimal,
    ) -> Result<Order, RepositoryError> {
        let row: Option<OrderRow> = sqlx::query_as(&format!(
            "UPDATE orders SET
                 customer_name = $2, customer_email = $3, customer_phone = $4,
                 address = $5, city = $6, postal_code = $7,
                 items = $8, notes = $9, subtotal = $10, total = $11,
                 updated_at = now()
             WHERE id = $1 RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id.as_i32())
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(&customer.phone)
        .bind(&customer.address)
        .bind(&customer.city)
        .bind(&customer.postal_code)
        .bind(Json(items))
        .bind(notes)
        .bind(subtotal)
        .bind(total)
        .fetch_optional(self.pool)
        .await?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }

    /// Sales totals grouped by status for a date range.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn sales_summary(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<SalesSummaryRow>, RepositoryError> {
        let rows: Vec<SalesSummaryRow> = sqlx::query_as(
            "SELECT status, COUNT(*) AS orders, COALESCE(SUM(total), 0) AS total
             FROM orders
             WHERE ($1::date IS NULL OR created_at >= $1)
               AND ($2::date IS NULL OR created_at < $2 + INTERVAL '1 day')
             GROUP BY status
             ORDER BY status",
        )
        .bind(from)
        .bind(to)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}
