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
use crate::database::models::{Goal, NewGoal};

#[derive(Debug, Deserialize)]
pub struct GoalPayload {
    pub name: Option<Value>,
    pub target_amount: Option<Value>,
    pub current_savings: Option<Value>,
    pub due_date: Option<Value>,
    pub progress: Option<Value>,
    pub priority: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct ProgressPayload {
    pub progress: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct PriorityPayload {
    pub priority: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct GoalResponse {
    pub id: i64,
    pub name: String,
    pub target_amount: Decimal,
    pub current_savings: Decimal,
    pub remaining: Decimal,
    pub due_date: NaiveDate,
    pub progress: i64,
    pub priority: Option<String>,
    pub created_at: NaiveDateTime,
}

impl From<Goal> for GoalResponse {
    fn from(goal: Goal) -> Self {
        let remaining = goal.remaining();
        Self {
            id: goal.id,
            name: goal.name,
            target_amount: goal.target_amount,
            current_savings: goal.current_savings,
            remaining,
            due_date: goal.due_date,
            progress: goal.progress,
            priority: goal.priority,
            created_at: goal.created_at,
        }
    }
}

// Create, full replace and bulk items all validate the same way;
// omitted optional fields land on their defaults.
fn parse_goal(payload: &GoalPayload) -> Result<NewGoal, FieldErrors> {
    let mut errors = FieldErrors::new();
    let name = validation::required_string(&mut errors, "name", payload.name.as_ref(), 255);
    let target = validation::required_amount(&mut errors, "target_amount", payload.target_amount.as_ref());
    let savings = validation::optional_amount(&mut errors, "current_savings", payload.current_savings.as_ref(), Decimal::ZERO);
    let due_date = validation::required_date(&mut errors, "due_date", payload.due_date.as_ref());
    let progress = validation::optional_int(&mut errors, "progress", payload.progress.as_ref(), 0);
    let priority = validation::optional_string(&mut errors, "priority", payload.priority.as_ref());

    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(NewGoal {
        name: name.unwrap_or_default(),
        target_amount: target.unwrap_or_default(),
        current_savings: savings.unwrap_or_default(),
        due_date: due_date.unwrap_or_default(),
        progress: progress.unwrap_or_default(),
        priority,
    })
}

pub async fn list_goals(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<GoalResponse>>, ApiError> {
    let goals = queries::list_goals_by_owner(&state.db, user.id).await?;
    Ok(Json(goals.into_iter().map(GoalResponse::from).collect()))
}

pub async fn create_goal(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    AppJson(payload): AppJson<GoalPayload>,
) -> Result<(StatusCode, Json<GoalResponse>), ApiError> {
    let goal = parse_goal(&payload).map_err(ApiError::Validation)?;
    let created = queries::create_goal(&state.db, user.id, &goal).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

// Either every item is valid and the whole batch lands, or nothing
// does. The 400 body is an array aligned with the submitted items:
// `{}` for the ones that were fine.
pub async fn bulk_create_goals(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    AppJson(payloads): AppJson<Vec<GoalPayload>>,
) -> Result<(StatusCode, Json<Vec<GoalResponse>>), ApiError> {
    let mut item_errors = Vec::with_capacity(payloads.len());
    let mut parsed = Vec::with_capacity(payloads.len());
    let mut any_invalid = false;

    for payload in &payloads {
        match parse_goal(payload) {
            Ok(goal) => {
                item_errors.push(FieldErrors::new());
                parsed.push(goal);
            }
            Err(errors) => {
                item_errors.push(errors);
                any_invalid = true;
            }
        }
    }
    if any_invalid {
        return Err(ApiError::BulkValidation(item_errors));
    }

    let created = queries::create_goals(&state.db, user.id, &parsed).await?;
    Ok((
        StatusCode::CREATED,
        Json(created.into_iter().map(GoalResponse::from).collect()),
    ))
}

pub async fn replace_goal(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    AppJson(payload): AppJson<GoalPayload>,
) -> Result<Json<GoalResponse>, ApiError> {
    let goal = parse_goal(&payload).map_err(ApiError::Validation)?;
    let updated = queries::replace_goal(&state.db, id, user.id, &goal)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(updated.into()))
}

pub async fn update_progress(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    AppJson(payload): AppJson<ProgressPayload>,
) -> Result<Json<Value>, ApiError> {
    let mut errors = FieldErrors::new();
    let progress = validation::required_int(&mut errors, "progress", payload.progress.as_ref());
    errors.into_result()?;

    let updated =
        queries::update_goal_progress(&state.db, id, user.id, progress.unwrap_or_default()).await?;
    if !updated {
        return Err(ApiError::NotFound);
    }
    Ok(Json(json!({ "message": "Goal progress updated" })))
}

pub async fn update_priority(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    AppJson(payload): AppJson<PriorityPayload>,
) -> Result<Json<Value>, ApiError> {
    let mut errors = FieldErrors::new();
    let priority = validation::required_text(&mut errors, "priority", payload.priority.as_ref());
    errors.into_result()?;

    let updated =
        queries::update_goal_priority(&state.db, id, user.id, &priority.unwrap_or_default()).await?;
    if !updated {
        return Err(ApiError::NotFound);
    }
    Ok(Json(json!({ "message": "Goal priority updated" })))
}
