//! Expense ledger models.
//!
//! Expenses are plain ledger entries for the finance dashboard; they have
//! no relation to orders.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crafteo_core::types::ExpenseId;

/// A ledger entry.
#[derive(Debug, Clone, Serialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub category: String,
    pub subcategory: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating or replacing an expense.
#[derive(Debug, Clone, Deserialize)]
pub struct ExpenseInput {
    pub date: NaiveDate,
    pub amount: Decimal,
    pub category: String,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Filter criteria for listing expenses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExpenseFilter {
    /// Entries on or after this date.
    pub from: Option<NaiveDate>,
    /// Entries on or before this date.
    pub to: Option<NaiveDate>,
    /// Filter by category.
    pub category: Option<String>,
    /// Maximum number of results (default 100).
    pub limit: Option<i64>,
    /// Number of results to skip.
    pub offset: Option<i64>,
}
