use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub struct Income {
    pub id: i64,
    pub user_id: i64,
    pub source: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub recurring: bool,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
}
