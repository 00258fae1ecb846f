use chrono::NaiveDateTime;
use sqlx::FromRow;

// Created only as a side effect of other operations (e.g. goal creation);
// the API exposes list-unread and mark-read, nothing else.
#[derive(FromRow, Debug, Clone)]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub message: String,
    pub is_read: bool,
    pub created_at: NaiveDateTime,
}
