//! Expense ledger queries.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use crafteo_core::types::ExpenseId;

use super::RepositoryError;
use crate::models::expense::{Expense, ExpenseFilter, ExpenseInput};

const EXPENSE_COLUMNS: &str = "id, date, amount, category, subcategory, description, created_at";

/// Internal row type for expense queries.
#[derive(Debug, sqlx::FromRow)]
struct ExpenseRow {
    id: i32,
    date: NaiveDate,
    amount: Decimal,
    category: String,
    subcategory: Option<String>,
    description: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<ExpenseRow> for Expense {
    fn from(row: ExpenseRow) -> Self {
        Self {
            id: ExpenseId::new(row.id),
            date: row.date,
            amount: row.amount,
            category: row.category,
            subcategory: row.subcategory,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

/// One row of the expense summary, grouped by category.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ExpenseSummaryRow {
    pub category: String,
    pub entries: i64,
    pub total: Decimal,
}

/// Repository for the expense ledger.
pub struct ExpenseRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ExpenseRepository<'a> {
    /// Create a new expense repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List ledger entries with filtering and pagination, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, filter: &ExpenseFilter) -> Result<Vec<Expense>, RepositoryError> {
        let limit = filter.limit.unwrap_or(100);
        let offset = filter.offset.unwrap_or(0);

        let rows: Vec<ExpenseRow> = sqlx::query_as(&format!(
            "SELECT {EXPENSE_COLUMNS}
             FROM expenses
             WHERE ($1::date IS NULL OR date >= $1)
               AND ($2::date IS NULL OR date <= $2)
               AND ($3::text IS NULL OR category = $3)
             ORDER BY date DESC, created_at DESC
             LIMIT $4 OFFSET $5"
        ))
        .bind(filter.from)
        .bind(filter.to)
        .bind(&filter.category)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Create a ledger entry.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, input: &ExpenseInput) -> Result<Expense, RepositoryError> {
        let row: ExpenseRow = sqlx::query_as(&format!(
            "INSERT INTO expenses (date, amount, category, subcategory, description)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {EXPENSE_COLUMNS}"
        ))
        .bind(input.date)
        .bind(input.amount)
        .bind(&input.category)
        .bind(&input.subcategory)
        .bind(&input.description)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Replace a ledger entry.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the entry doesn't exist.
    pub async fn update(
        &self,
        id: ExpenseId,
        input: &ExpenseInput,
    ) -> Result<Expense, RepositoryError> {
        let row: Option<ExpenseRow> = sqlx::query_as(&format!(
            "UPDATE expenses
             SET date = $2, amount = $3, category = $4, subcategory = $5, description = $6
             WHERE id = $1
             RETURNING {EXPENSE_COLUMNS}"
        ))
        .bind(id.as_i32())
        .bind(input.date)
        .bind(input.amount)
        .bind(&input.category)
        .bind(&input.subcategory)
        .bind(&input.description)
        .fetch_optional(self.pool)
        .await?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    /// Delete a ledger entry.
    ///
    /// # Returns
    ///
    /// Returns `true` if the entry was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ExpenseId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Expense totals grouped by category for a date range.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn summary(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<ExpenseSummaryRow>, RepositoryError> {
        let rows: Vec<ExpenseSummaryRow> = sqlx::query_as(
            "SELECT category, COUNT(*) AS entries, COALESCE(SUM(amount), 0) AS total
             FROM expenses
             WHERE ($1::date IS NULL OR date >= $1)
               AND ($2::date IS NULL OR date <= $2)
             GROUP BY category
             ORDER BY category",
        )
        .bind(from)
        .bind(to)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}
