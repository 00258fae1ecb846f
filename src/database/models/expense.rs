use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

// Owned transitively: an expense belongs to whoever owns its budget.
#[derive(Debug, Clone)]
pub struct Expense {
    pub id: i64,
    pub budget_id: i64,
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub recurring: bool,
    pub created_at: NaiveDateTime,
}

/// A validated expense ready to be inserted (single or bulk create).
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub budget_id: i64,
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub recurring: bool,
}
