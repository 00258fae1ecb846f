use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub struct Debt {
    pub id: i64,
    pub user_id: i64,
    pub creditor_name: String,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub paid_amount: Decimal,
    pub description: Option<String>,
    pub paid_off: bool,
    pub created_at: NaiveDateTime,
}

impl Debt {
    /// Per-record remainder: amount minus partial payments. The debt summary
    /// endpoint does NOT use this; it counts the full amount of any debt
    /// flagged paid_off (see summary::debt_summary).
    pub fn remaining(&self) -> Decimal {
        self.amount - self.paid_amount
    }
}
