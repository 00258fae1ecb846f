use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::backend::auth::CurrentUser;
use crate::backend::error::{ApiError, AppJson, FieldErrors};
use crate::backend::validation;
use crate::backend::AppState;
use crate::database::db::queries;
use crate::database::models::BudgetCategory;

#[derive(Debug, Deserialize)]
pub struct CategoryPayload {
    pub name: Option<Value>,
    pub description: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
}

impl From<BudgetCategory> for CategoryResponse {
    fn from(category: BudgetCategory) -> Self {
        Self {
            id: category.id,
            name: category.name,
            description: category.description,
            created_at: category.created_at,
        }
    }
}

fn parse_category(payload: &CategoryPayload) -> Result<(String, Option<String>), ApiError> {
    let mut errors = FieldErrors::new();
    let name = validation::required_string(&mut errors, "name", payload.name.as_ref(), 100);
    let description = validation::optional_string(&mut errors, "description", payload.description.as_ref());
    errors.into_result()?;
    Ok((name.unwrap_or_default(), description))
}

pub async fn list_categories(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<CategoryResponse>>, ApiError> {
    let categories = queries::list_categories_by_owner(&state.db, user.id).await?;
    Ok(Json(categories.into_iter().map(CategoryResponse::from).collect()))
}

pub async fn create_category(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    AppJson(payload): AppJson<CategoryPayload>,
) -> Result<(StatusCode, Json<CategoryResponse>), ApiError> {
    let (name, description) = parse_category(&payload)?;
    let category =
        queries::create_category(&state.db, user.id, &name, description.as_deref()).await?;
    Ok((StatusCode::CREATED, Json(category.into())))
}

pub async fn update_category(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    AppJson(payload): AppJson<CategoryPayload>,
) -> Result<Json<CategoryResponse>, ApiError> {
    let (name, description) = parse_category(&payload)?;
    let category = queries::update_category(&state.db, id, user.id, &name, description.as_deref())
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(category.into()))
}
