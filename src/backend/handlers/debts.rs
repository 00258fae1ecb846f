use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::backend::auth::CurrentUser;
use crate::backend::error::{ApiError, AppJson, FieldErrors};
use crate::backend::validation;
use crate::backend::AppState;
use crate::database::db::queries;
use crate::database::models::Debt;

#[derive(Debug, Deserialize)]
pub struct DebtPayload {
    pub creditor_name: Option<Value>,
    pub amount: Option<Value>,
    pub due_date: Option<Value>,
    pub paid_amount: Option<Value>,
    pub description: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct DebtResponse {
    pub id: i64,
    pub creditor_name: String,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub paid_amount: Decimal,
    pub remaining: Decimal,
    pub description: Option<String>,
    pub paid_off: bool,
    pub created_at: NaiveDateTime,
}

impl From<Debt> for DebtResponse {
    fn from(debt: Debt) -> Self {
        let remaining = debt.remaining();
        Self {
            id: debt.id,
            creditor_name: debt.creditor_name,
            amount: debt.amount,
            due_date: debt.due_date,
            paid_amount: debt.paid_amount,
            remaining,
            description: debt.description,
            paid_off: debt.paid_off,
            created_at: debt.created_at,
        }
    }
}

pub async fn list_debts(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<DebtResponse>>, ApiError> {
    let debts = queries::list_debts_by_owner(&state.db, user.id).await?;
    Ok(Json(debts.into_iter().map(DebtResponse::from).collect()))
}

pub async fn create_debt(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    AppJson(payload): AppJson<DebtPayload>,
) -> Result<(StatusCode, Json<DebtResponse>), ApiError> {
    let mut errors = FieldErrors::new();
    let creditor = validation::required_string(&mut errors, "creditor_name", payload.creditor_name.as_ref(), 255);
    let amount = validation::required_amount(&mut errors, "amount", payload.amount.as_ref());
    let due_date = validation::required_date(&mut errors, "due_date", payload.due_date.as_ref());
    let paid = validation::optional_amount(&mut errors, "paid_amount", payload.paid_amount.as_ref(), Decimal::ZERO);
    let description = validation::optional_string(&mut errors, "description", payload.description.as_ref());
    errors.into_result()?;

    let debt = queries::create_debt(
        &state.db,
        user.id,
        creditor.unwrap_or_default(),
        amount.unwrap_or_default(),
        due_date.unwrap_or_default(),
        paid.unwrap_or_default(),
        description,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(debt.into())))
}

// Only flips the flag; whatever is in paid_amount stays untouched.
pub async fn payoff_debt(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let updated = queries::mark_debt_paid_off(&state.db, id, user.id).await?;
    if !updated {
        return Err(ApiError::NotFound);
    }
    Ok(Json(json!({ "message": "Debt marked as paid off" })))
}
