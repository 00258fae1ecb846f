use axum::extract::State;
use axum::Json;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::backend::auth::CurrentUser;
use crate::backend::error::{ApiError, AppJson, FieldErrors};
use crate::backend::validation;
use crate::backend::AppState;
use crate::database::db::queries;
use crate::database::models::Notification;

#[derive(Debug, Deserialize)]
pub struct MarkReadPayload {
    pub ids: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    pub id: i64,
    pub message: String,
    pub is_read: bool,
    pub created_at: NaiveDateTime,
}

impl From<Notification> for NotificationResponse {
    fn from(notification: Notification) -> Self {
        Self {
            id: notification.id,
            message: notification.message,
            is_read: notification.is_read,
            created_at: notification.created_at,
        }
    }
}

// Read notifications are gone from this list for good; there is no
// endpoint that shows them again.
pub async fn list_notifications(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<NotificationResponse>>, ApiError> {
    let notifications = queries::list_unread_notifications(&state.db, user.id).await?;
    Ok(Json(
        notifications.into_iter().map(NotificationResponse::from).collect(),
    ))
}

// Ids that are not the caller's, already read, or unknown are simply
// skipped; if that leaves nothing to flip, the whole call is a 404.
pub async fn mark_read(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    AppJson(payload): AppJson<MarkReadPayload>,
) -> Result<Json<Value>, ApiError> {
    let mut errors = FieldErrors::new();
    let ids = validation::required_id_list(&mut errors, "ids", payload.ids.as_ref());
    errors.into_result()?;

    let flipped =
        queries::mark_notifications_read(&state.db, user.id, &ids.unwrap_or_default()).await?;
    if flipped == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(Json(json!({ "message": "Notifications marked as read" })))
}
