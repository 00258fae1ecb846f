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
use crate::database::models::{Expense, NewExpense};

#[derive(Debug, Deserialize)]
pub struct ExpensePayload {
    pub budget: Option<Value>,
    pub description: Option<Value>,
    pub amount: Option<Value>,
    pub date: Option<Value>,
    pub recurring: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct ExpenseResponse {
    pub id: i64,
    pub budget: i64,
    pub budget_name: String,
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub recurring: bool,
    pub created_at: NaiveDateTime,
}

impl ExpenseResponse {
    fn new(expense: Expense, budget_name: String) -> Self {
        Self {
            id: expense.id,
            budget: expense.budget_id,
            budget_name,
            description: expense.description,
            amount: expense.amount,
            date: expense.date,
            recurring: expense.recurring,
            created_at: expense.created_at,
        }
    }
}

// Field-level parse only; whether the referenced budget is actually the
// caller's is checked against the database afterwards, and lands in the
// same error map under "budget".
struct ExpenseDraft {
    errors: FieldErrors,
    budget_id: Option<i64>,
    fields: Option<NewExpense>,
}

fn parse_expense(payload: &ExpensePayload) -> ExpenseDraft {
    let mut errors = FieldErrors::new();
    let budget_id = validation::required_id(&mut errors, "budget", payload.budget.as_ref());
    let description = validation::required_string(&mut errors, "description", payload.description.as_ref(), 255);
    let amount = validation::required_amount(&mut errors, "amount", payload.amount.as_ref());
    let date = validation::required_date(&mut errors, "date", payload.date.as_ref());
    let recurring = validation::optional_bool(&mut errors, "recurring", payload.recurring.as_ref(), false);

    let fields = if errors.is_empty() {
        Some(NewExpense {
            budget_id: budget_id.unwrap_or_default(),
            description: description.unwrap_or_default(),
            amount: amount.unwrap_or_default(),
            date: date.unwrap_or_default(),
            recurring: recurring.unwrap_or_default(),
        })
    } else {
        None
    };
    ExpenseDraft {
        errors,
        budget_id,
        fields,
    }
}

async fn check_budget_ref(
    state: &AppState,
    user_id: i64,
    draft: &mut ExpenseDraft,
) -> Result<(), sqlx::Error> {
    if let Some(id) = draft.budget_id {
        if queries::find_budget_by_id_and_owner(&state.db, id, user_id).await?.is_none() {
            draft.errors.push("budget", validation::invalid_pk(id));
            draft.fields = None;
        }
    }
    Ok(())
}

fn budget_name_for(names: &[(i64, String)], budget_id: i64) -> String {
    names
        .iter()
        .find(|(id, _)| *id == budget_id)
        .map(|(_, name)| name.clone())
        .unwrap_or_default()
}

pub async fn list_expenses(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<ExpenseResponse>>, ApiError> {
    let expenses = queries::list_expenses_by_owner(&state.db, user.id).await?;
    let names = queries::list_budget_names_by_owner(&state.db, user.id).await?;

    let responses = expenses
        .into_iter()
        .map(|expense| {
            let name = budget_name_for(&names, expense.budget_id);
            ExpenseResponse::new(expense, name)
        })
        .collect();
    Ok(Json(responses))
}

pub async fn create_expense(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    AppJson(payload): AppJson<ExpensePayload>,
) -> Result<(StatusCode, Json<ExpenseResponse>), ApiError> {
    let mut draft = parse_expense(&payload);
    check_budget_ref(&state, user.id, &mut draft).await?;

    match draft.fields {
        Some(expense) if draft.errors.is_empty() => {
            let created = queries::create_expense(&state.db, &expense).await?;
            let names = queries::list_budget_names_by_owner(&state.db, user.id).await?;
            let name = budget_name_for(&names, created.budget_id);
            Ok((StatusCode::CREATED, Json(ExpenseResponse::new(created, name))))
        }
        _ => Err(ApiError::Validation(draft.errors)),
    }
}

// All items go through the same checks as a single create; one bad item
// fails the whole batch with an array of per-item error maps.
pub async fn bulk_create_expenses(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    AppJson(payloads): AppJson<Vec<ExpensePayload>>,
) -> Result<(StatusCode, Json<Vec<ExpenseResponse>>), ApiError> {
    let mut drafts: Vec<ExpenseDraft> = payloads.iter().map(parse_expense).collect();
    for draft in &mut drafts {
        check_budget_ref(&state, user.id, draft).await?;
    }

    if drafts.iter().any(|d| !d.errors.is_empty()) {
        return Err(ApiError::BulkValidation(
            drafts.into_iter().map(|d| d.errors).collect(),
        ));
    }

    let expenses: Vec<NewExpense> = drafts.into_iter().filter_map(|d| d.fields).collect();
    let created = queries::create_expenses(&state.db, &expenses).await?;

    let names = queries::list_budget_names_by_owner(&state.db, user.id).await?;
    let responses = created
        .into_iter()
        .map(|expense| {
            let name = budget_name_for(&names, expense.budget_id);
            ExpenseResponse::new(expense, name)
        })
        .collect();
    Ok((StatusCode::CREATED, Json(responses)))
}
