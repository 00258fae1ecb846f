use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

// Decimal columns are stored as TEXT, so rows are mapped by hand in queries.rs
// instead of deriving FromRow.
#[derive(Debug, Clone)]
pub struct Budget {
    pub id: i64,
    pub user_id: i64,
    pub category_id: i64,
    pub allocated_amount: Decimal,
    pub spent_amount: Decimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_recurring: bool,
    pub created_at: NaiveDateTime,
}

impl Budget {
    /// Derived, never stored; may go negative.
    pub fn remaining(&self) -> Decimal {
        self.allocated_amount - self.spent_amount
    }
}
