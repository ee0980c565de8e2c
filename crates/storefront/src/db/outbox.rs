//! Outbox event storage.
//!
//! Side effects of order creation (material draws, webhook, confirmation
//! email) are written as rows in the same transaction as the order and
//! dispatched later by the worker in [`crate::services::outbox`]. A claim
//! uses `FOR UPDATE SKIP LOCKED` so several workers never double-dispatch.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use crafteo_core::types::OrderId;

use super::RepositoryError;

/// What a pending outbox event should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutboxKind {
    /// Draw raw materials per the order's recipes.
    MaterialDeduction,
    /// Notify the workflow webhook of the new order.
    OrderWebhook,
    /// Send the customer a confirmation email.
    ConfirmationEmail,
}

impl OutboxKind {
    /// Wire value of this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MaterialDeduction => "material_deduction",
            Self::OrderWebhook => "order_webhook",
            Self::ConfirmationEmail => "confirmation_email",
        }
    }
}

impl std::str::FromStr for OutboxKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "material_deduction" => Ok(Self::MaterialDeduction),
            "order_webhook" => Ok(Self::OrderWebhook),
            "confirmation_email" => Ok(Self::ConfirmationEmail),
            _ => Err(format!("invalid outbox kind: {s}")),
        }
    }
}

/// Processing state of an outbox event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutboxStatus {
    /// Waiting for its `next_attempt_at`.
    Pending,
    /// Claimed by a worker.
    Processing,
    /// Dispatched successfully.
    Done,
    /// Gave up after the retry budget; needs manual attention.
    Failed,
}

impl OutboxStatus {
    /// Wire value of this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl std::str::FromStr for OutboxStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "done" => Ok(Self::Done),
            "failed" => Ok(Self::Failed),
            _ => Err(format!("invalid outbox status: {s}")),
        }
    }
}

/// A stored side-effect intent.
#[derive(Debug, Clone)]
pub struct OutboxEvent {
    pub id: Uuid,
    pub order_id: OrderId,
    pub kind: OutboxKind,
    pub payload: serde_json::Value,
    pub status: OutboxStatus,
    pub attempts: i32,
    pub next_attempt_at: DateTime<Utc>,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Internal row type for outbox queries.
#[derive(Debug, sqlx::FromRow)]
struct OutboxEventRow {
    id: Uuid,
    order_id: i32,
    kind: String,
    payload: Json<serde_json::Value>,
    status: String,
    attempts: i32,
    next_attempt_at: DateTime<Utc>,
    last_error: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<OutboxEventRow> for OutboxEvent {
    type Error = RepositoryError;

    fn try_from(row: OutboxEventRow) -> Result<Self, Self::Error> {
        let corrupted =
            |e: String| RepositoryError::DataCorruption(format!("outbox {}: {e}", row.id));
        Ok(Self {
            id: row.id,
            order_id: OrderId::new(row.order_id),
            kind: row.kind.parse().map_err(corrupted)?,
            payload: row.payload.0,
            status: row.status.parse().map_err(corrupted)?,
            attempts: row.attempts,
            next_attempt_at: row.next_attempt_at,
            last_error: row.last_error,
            created_at: row.created_at,
        })
    }
}

/// Repository for outbox event operations.
pub struct OutboxRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OutboxRepository<'a> {
    /// Create a new outbox repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Claim up to `limit` due events for processing.
    ///
    /// Claimed rows move to `processing`; a crash leaves them there and
    /// [`Self::release_stale`] returns them to the pool.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn claim_due(&self, limit: i64) -> Result<Vec<OutboxEvent>, RepositoryError> {
        let rows: Vec<OutboxEventRow> = sqlx::query_as(
            "WITH due AS (
                 SELECT id FROM outbox_events
                 WHERE status = 'pending' AND next_attempt_at <= now()
                 ORDER BY next_attempt_at
                 LIMIT $1
                 FOR UPDATE SKIP LOCKED
             )
             UPDATE outbox_events e
             SET status = 'processing', updated_at = now()
             FROM due
             WHERE e.id = due.id
             RETURNING e.id, e.order_id, e.kind, e.payload, e.status, e.attempts,
                       e.next_attempt_at, e.last_error, e.created_at",
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Return events stuck in `processing` (a crashed worker) to `pending`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn release_stale(&self, older_than_secs: i64) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            "UPDATE outbox_events
             SET status = 'pending', updated_at = now()
             WHERE status = 'processing'
               AND updated_at < now() - make_interval(secs => $1)",
        )
        .bind(older_than_secs as f64)
        .execute(self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Mark an event as successfully dispatched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn mark_done(&self, id: Uuid) -> Result<(), RepositoryError> {
        sqlx::query(
            "UPDATE outbox_events
             SET status = 'done', last_error = NULL, updated_at = now()
             WHERE id = $1",
        )
        .bind(id)
        .execute(self.pool)
        .await?;
        Ok(())
    }

    /// Schedule a retry after a failed dispatch.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn mark_retry(
        &self,
        id: Uuid,
        delay_secs: i64,
        error: &str,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "UPDATE outbox_events
             SET status = 'pending',
                 attempts = attempts + 1,
                 next_attempt_at = now() + make_interval(secs => $2),
                 last_error = $3,
                 updated_at = now()
             WHERE id = $1",
        )
        .bind(id)
        .bind(delay_secs as f64)
        .bind(error)
        .execute(self.pool)
        .await?;
        Ok(())
    }

    /// Mark an event as permanently failed (retry budget exhausted).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn mark_failed(&self, id: Uuid, error: &str) -> Result<(), RepositoryError> {
        sqlx::query(
            "UPDATE outbox_events
             SET status = 'failed',
                 attempts = attempts + 1,
                 last_error = $2,
                 updated_at = now()
             WHERE id = $1",
        )
        .bind(id)
        .bind(error)
        .execute(self.pool)
        .await?;
        Ok(())
    }
}
