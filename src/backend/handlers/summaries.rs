use axum::extract::State;
use axum::Json;

use crate::backend::auth::CurrentUser;
use crate::backend::error::ApiError;
use crate::backend::AppState;
use crate::database::db::queries;
use crate::summary::{self, DebtSummary, IncomeExpenseSummary, SpendingSummary};

// Summaries are recomputed from the caller's rows on every request;
// nothing aggregated is ever stored.

pub async fn spending_summary(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<SpendingSummary>, ApiError> {
    let budgets = queries::list_budgets_by_owner(&state.db, user.id).await?;
    Ok(Json(summary::spending_summary(&budgets)))
}

pub async fn income_expense_summary(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<IncomeExpenseSummary>, ApiError> {
    let incomes = queries::list_incomes_by_owner(&state.db, user.id).await?;
    let expenses = queries::list_expenses_by_owner(&state.db, user.id).await?;
    Ok(Json(summary::income_expense_summary(&incomes, &expenses)))
}

pub async fn debt_summary(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<DebtSummary>, ApiError> {
    let debts = queries::list_debts_by_owner(&state.db, user.id).await?;
    Ok(Json(summary::debt_summary(&debts)))
}
