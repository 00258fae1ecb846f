use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{Duration, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::backend::auth::CurrentUser;
use crate::backend::error::{ApiError, AppJson, FieldErrors};
use crate::backend::validation;
use crate::backend::AppState;
use crate::database::db::queries;
use crate::database::models::Budget;

#[derive(Debug, Deserialize)]
pub struct BudgetPayload {
    pub category: Option<Value>,
    pub allocated_amount: Option<Value>,
    pub spent_amount: Option<Value>,
    pub start_date: Option<Value>,
    pub end_date: Option<Value>,
    pub is_recurring: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct AllocationPayload {
    pub allocated_amount: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct BudgetResponse {
    pub id: i64,
    pub category: i64,
    pub category_name: String,
    pub allocated_amount: Decimal,
    pub spent_amount: Decimal,
    pub remaining: Decimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_recurring: bool,
    pub created_at: NaiveDateTime,
}

impl BudgetResponse {
    fn new(budget: Budget, category_name: String) -> Self {
        let remaining = budget.remaining();
        Self {
            id: budget.id,
            category: budget.category_id,
            category_name,
            allocated_amount: budget.allocated_amount,
            spent_amount: budget.spent_amount,
            remaining,
            start_date: budget.start_date,
            end_date: budget.end_date,
            is_recurring: budget.is_recurring,
            created_at: budget.created_at,
        }
    }
}

pub async fn list_budgets(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<BudgetResponse>>, ApiError> {
    let budgets = queries::list_budgets_by_owner(&state.db, user.id).await?;
    let categories = queries::list_categories_by_owner(&state.db, user.id).await?;

    let responses = budgets
        .into_iter()
        .map(|budget| {
            let name = categories
                .iter()
                .find(|c| c.id == budget.category_id)
                .map(|c| c.name.clone())
                .unwrap_or_default();
            BudgetResponse::new(budget, name)
        })
        .collect();
    Ok(Json(responses))
}

pub async fn create_budget(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    AppJson(payload): AppJson<BudgetPayload>,
) -> Result<(StatusCode, Json<BudgetResponse>), ApiError> {
    let today = Utc::now().date_naive();

    let mut errors = FieldErrors::new();
    let category_id = validation::required_id(&mut errors, "category", payload.category.as_ref());
    let allocated = validation::required_amount(&mut errors, "allocated_amount", payload.allocated_amount.as_ref());
    let spent = validation::optional_amount(&mut errors, "spent_amount", payload.spent_amount.as_ref(), Decimal::ZERO);
    let start_date = validation::optional_date(&mut errors, "start_date", payload.start_date.as_ref(), today);
    let end_date = validation::optional_date(&mut errors, "end_date", payload.end_date.as_ref(), today + Duration::days(30));
    let is_recurring = validation::optional_bool(&mut errors, "is_recurring", payload.is_recurring.as_ref(), false);

    // The referenced category has to be visible to the caller.
    let mut category = None;
    if let Some(id) = category_id {
        category = queries::find_category_by_id_and_owner(&state.db, id, user.id).await?;
        if category.is_none() {
            errors.push("category", validation::invalid_pk(id));
        }
    }
    errors.into_result()?;

    let budget = queries::create_budget(
        &state.db,
        user.id,
        category_id.unwrap_or_default(),
        allocated.unwrap_or_default(),
        spent.unwrap_or_default(),
        start_date.unwrap_or_default(),
        end_date.unwrap_or_default(),
        is_recurring.unwrap_or_default(),
    )
    .await?;

    let category_name = category.map(|c| c.name).unwrap_or_default();
    Ok((
        StatusCode::CREATED,
        Json(BudgetResponse::new(budget, category_name)),
    ))
}

pub async fn update_allocation(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    AppJson(payload): AppJson<AllocationPayload>,
) -> Result<Json<Value>, ApiError> {
    let mut errors = FieldErrors::new();
    let allocated = validation::required_amount(&mut errors, "allocated_amount", payload.allocated_amount.as_ref());
    errors.into_result()?;

    let updated =
        queries::update_budget_allocation(&state.db, id, user.id, allocated.unwrap_or_default())
            .await?;
    if !updated {
        return Err(ApiError::NotFound);
    }
    Ok(Json(json!({ "message": "Budget allocation updated" })))
}
