//! Finance summary for the dashboard.

use axum::Json;
use axum::extract::{Query, State};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::db::expenses::ExpenseSummaryRow;
use crate::db::orders::SalesSummaryRow;
use crate::db::{ExpenseRepository, OrderRepository};
use crate::error::Result;
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

/// Date range for the summary.
#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Sales by status plus expenses by category for a date range.
#[derive(Debug, Serialize)]
pub struct FinanceSummary {
    pub sales: Vec<SalesSummaryRow>,
    pub expenses: Vec<ExpenseSummaryRow>,
}

/// Aggregate sales and expenses for the dashboard.
#[instrument(skip(_auth, state))]
pub async fn summary(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<FinanceSummary>> {
    let sales = OrderRepository::new(state.pool())
        .sales_summary(query.from, query.to)
        .await?;
    let expenses = ExpenseRepository::new(state.pool())
        .summary(query.from, query.to)
        .await?;

    Ok(Json(FinanceSummary { sales, expenses }))
}
