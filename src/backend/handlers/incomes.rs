use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::backend::auth::CurrentUser;
use crate::backend::error::{ApiError, AppJson, FieldErrors};
use crate::backend::validation;
use crate::backend::AppState;
use crate::database::db::queries;
use crate::database::models::Income;

#[derive(Debug, Deserialize)]
pub struct IncomePayload {
    pub source: Option<Value>,
    pub amount: Option<Value>,
    pub date: Option<Value>,
    pub recurring: Option<Value>,
    pub description: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct IncomeResponse {
    pub id: i64,
    pub source: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub recurring: bool,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
}

impl From<Income> for IncomeResponse {
    fn from(income: Income) -> Self {
        Self {
            id: income.id,
            source: income.source,
            amount: income.amount,
            date: income.date,
            recurring: income.recurring,
            description: income.description,
            created_at: income.created_at,
        }
    }
}

pub async fn list_incomes(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<IncomeResponse>>, ApiError> {
    let incomes = queries::list_incomes_by_owner(&state.db, user.id).await?;
    Ok(Json(incomes.into_iter().map(IncomeResponse::from).collect()))
}

pub async fn create_income(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    AppJson(payload): AppJson<IncomePayload>,
) -> Result<(StatusCode, Json<IncomeResponse>), ApiError> {
    let mut errors = FieldErrors::new();
    let source = validation::required_string(&mut errors, "source", payload.source.as_ref(), 100);
    let amount = validation::required_amount(&mut errors, "amount", payload.amount.as_ref());
    let date = validation::required_date(&mut errors, "date", payload.date.as_ref());
    let recurring = validation::optional_bool(&mut errors, "recurring", payload.recurring.as_ref(), false);
    let description = validation::optional_string(&mut errors, "description", payload.description.as_ref());
    errors.into_result()?;

    let income = queries::create_income(
        &state.db,
        user.id,
        source.unwrap_or_default(),
        amount.unwrap_or_default(),
        date.unwrap_or_default(),
        recurring.unwrap_or_default(),
        description,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(income.into())))
}
