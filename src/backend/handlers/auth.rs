use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::backend::auth::{hash_password, verify_password};
use crate::backend::error::{ApiError, AppJson, FieldErrors};
use crate::backend::validation;
use crate::backend::AppState;
use crate::database::db::queries;
use crate::database::models::User;

#[derive(Debug, Deserialize)]
pub struct RegisterPayload {
    pub username: Option<Value>,
    pub email: Option<Value>,
    pub password: Option<Value>,
    pub first_name: Option<Value>,
    pub last_name: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct CredentialsPayload {
    pub username: Option<Value>,
    pub password: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct RefreshPayload {
    pub refresh: Option<Value>,
}

// What a user looks like on the wire; the password hash never leaves
// the database layer.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub currency_preference: String,
    pub created_at: NaiveDateTime,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            currency_preference: user.currency_preference,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user: UserResponse,
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
    pub access_expires_at: DateTime<Utc>,
    pub refresh_expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct TokenPairResponse {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Serialize)]
pub struct AccessResponse {
    pub access: String,
}

pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterPayload>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let mut errors = FieldErrors::new();
    let username = validation::required_string(&mut errors, "username", payload.username.as_ref(), 150);
    let email = validation::required_string(&mut errors, "email", payload.email.as_ref(), 254);
    let password = validation::required_text(&mut errors, "password", payload.password.as_ref());
    let first_name = validation::optional_string(&mut errors, "first_name", payload.first_name.as_ref());
    let last_name = validation::optional_string(&mut errors, "last_name", payload.last_name.as_ref());
    errors.into_result()?;

    let username = username.unwrap_or_default();
    if queries::find_user_by_username(&state.db, &username).await?.is_some() {
        return Err(ApiError::DuplicateUser);
    }

    let password_hash = hash_password(&password.unwrap_or_default())?;
    let user = queries::create_user(
        &state.db,
        &username,
        &email.unwrap_or_default(),
        &password_hash,
        &first_name.unwrap_or_default(),
        &last_name.unwrap_or_default(),
    )
    .await?;

    let pair = state.tokens.issue_pair(user.id)?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user: user.into(),
            access: pair.access,
            refresh: pair.refresh,
        }),
    ))
}

// Shared by /login and /api/token/, which differ only in how they
// report a bad username or password.
async fn authenticate(
    state: &AppState,
    payload: &CredentialsPayload,
) -> Result<Option<User>, ApiError> {
    let mut errors = FieldErrors::new();
    let username = validation::required_string(&mut errors, "username", payload.username.as_ref(), 150);
    let password = validation::required_text(&mut errors, "password", payload.password.as_ref());
    errors.into_result()?;

    let Some(user) = queries::find_user_by_username(&state.db, &username.unwrap_or_default()).await?
    else {
        return Ok(None);
    };
    if !verify_password(&password.unwrap_or_default(), &user.password_hash) {
        return Ok(None);
    }
    Ok(Some(user))
}

pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CredentialsPayload>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = authenticate(&state, &payload)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    let pair = state.tokens.issue_pair(user.id)?;
    Ok(Json(LoginResponse {
        access: pair.access,
        refresh: pair.refresh,
        access_expires_at: pair.access_expires_at,
        refresh_expires_at: pair.refresh_expires_at,
    }))
}

pub async fn token(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CredentialsPayload>,
) -> Result<Json<TokenPairResponse>, ApiError> {
    let user = authenticate(&state, &payload).await?.ok_or(ApiError::Unauthorized(
        "No active account found with the given credentials",
    ))?;

    let pair = state.tokens.issue_pair(user.id)?;
    Ok(Json(TokenPairResponse {
        access: pair.access,
        refresh: pair.refresh,
    }))
}

pub async fn refresh(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RefreshPayload>,
) -> Result<Json<AccessResponse>, ApiError> {
    let mut errors = FieldErrors::new();
    let refresh = validation::required_text(&mut errors, "refresh", payload.refresh.as_ref());
    errors.into_result()?;

    let claims = state
        .tokens
        .verify_refresh(&refresh.unwrap_or_default())
        .ok_or(ApiError::Unauthorized("Token is invalid or expired"))?;

    let (access, _) = state.tokens.issue_access(claims.user_id)?;
    Ok(Json(AccessResponse { access }))
}
