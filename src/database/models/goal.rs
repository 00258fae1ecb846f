use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub struct Goal {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub target_amount: Decimal,
    pub current_savings: Decimal,
    pub due_date: NaiveDate,
    pub progress: i64,
    pub priority: Option<String>,
    pub created_at: NaiveDateTime,
}

impl Goal {
    /// Derived, never stored; may go negative.
    pub fn remaining(&self) -> Decimal {
        self.target_amount - self.current_savings
    }
}

/// A validated goal ready to be inserted (single or bulk create, full replace).
#[derive(Debug, Clone)]
pub struct NewGoal {
    pub name: String,
    pub target_amount: Decimal,
    pub current_savings: Decimal,
    pub due_date: NaiveDate,
    pub progress: i64,
    pub priority: Option<String>,
}
