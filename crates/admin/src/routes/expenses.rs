//! Expense ledger handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use tracing::{info, instrument};

use crafteo_core::types::ExpenseId;

use crate::db::ExpenseRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::models::expense::{Expense, ExpenseFilter, ExpenseInput};
use crate::state::AppState;

/// List ledger entries with filters.
#[instrument(skip(_auth, state, filter))]
pub async fn list(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Query(filter): Query<ExpenseFilter>,
) -> Result<Json<Vec<Expense>>> {
    let expenses = ExpenseRepository::new(state.pool()).list(&filter).await?;
    Ok(Json(expenses))
}

/// Create a ledger entry.
#[instrument(skip(_auth, state, input), fields(category = %input.category))]
pub async fn create(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Json(input): Json<ExpenseInput>,
) -> Result<(StatusCode, Json<Expense>)> {
    validate(&input)?;
    let expense = ExpenseRepository::new(state.pool()).create(&input).await?;

    info!(expense_id = %expense.id, amount = %expense.amount, "expense recorded");
    Ok((StatusCode::CREATED, Json(expense)))
}

/// Replace a ledger entry.
#[instrument(skip(_auth, state, input))]
pub async fn update(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<ExpenseInput>,
) -> Result<Json<Expense>> {
    validate(&input)?;
    let expense = ExpenseRepository::new(state.pool())
        .update(ExpenseId::new(id), &input)
        .await?;

    info!(expense_id = %expense.id, "expense updated");
    Ok(Json(expense))
}

/// Delete a ledger entry.
#[instrument(skip(_auth, state))]
pub async fn remove(
    _auth: RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    let removed = ExpenseRepository::new(state.pool())
        .delete(ExpenseId::new(id))
        .await?;
    if !removed {
        return Err(AppError::NotFound(format!("expense {id}")));
    }

    info!(expense_id = id, "expense deleted");
    Ok(StatusCode::NO_CONTENT)
}

fn validate(input: &ExpenseInput) -> Result<()> {
    if input.amount.is_sign_negative() {
        return Err(AppError::Validation("amount must be non-negative".to_string()));
    }
    if input.category.trim().is_empty() {
        return Err(AppError::Validation("category must not be empty".to_string()));
    }
    Ok(())
}
