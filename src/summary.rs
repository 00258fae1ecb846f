use rust_decimal::Decimal;
use serde::Serialize;

use crate::database::models::{Budget, Debt, Expense, Income};

/*
Aggregation over a user's records. Nothing here is stored; every summary
is recomputed from the rows the caller loaded, so the figures are always
consistent with the data at read time.
 */

// Sums over an empty set come out at scale 0; force two places so the
// serialized figures always read like money ("0.00", "800.00").
fn two_dp(value: Decimal) -> Decimal {
    let mut v = value;
    v.rescale(2);
    v
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendingSummary {
    pub total_allocated: Decimal,
    pub total_spent: Decimal,
    pub remaining_budget: Decimal,
}

pub fn spending_summary(budgets: &[Budget]) -> SpendingSummary {
    let total_allocated: Decimal = budgets.iter().map(|b| b.allocated_amount).sum();
    let total_spent: Decimal = budgets.iter().map(|b| b.spent_amount).sum();

    SpendingSummary {
        total_allocated: two_dp(total_allocated),
        total_spent: two_dp(total_spent),
        remaining_budget: two_dp(total_allocated - total_spent),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncomeExpenseSummary {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub balance: Decimal,
}

// `expenses` is already the caller's slice (gathered through their budgets).
pub fn income_expense_summary(incomes: &[Income], expenses: &[Expense]) -> IncomeExpenseSummary {
    let total_income: Decimal = incomes.iter().map(|i| i.amount).sum();
    let total_expense: Decimal = expenses.iter().map(|e| e.amount).sum();

    IncomeExpenseSummary {
        total_income: two_dp(total_income),
        total_expense: two_dp(total_expense),
        balance: two_dp(total_income - total_expense),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebtSummary {
    pub total_debt: Decimal,
    pub total_paid: Decimal,
    pub remaining_debt: Decimal,
}

/// total_paid counts the full `amount` of debts whose `paid_off` flag is
/// set and ignores `paid_amount` entirely. Partial payments therefore do
/// not move this summary, even though each record's own `remaining`
/// subtracts them. Long-standing behavior; keep it.
pub fn debt_summary(debts: &[Debt]) -> DebtSummary {
    let total_debt: Decimal = debts.iter().map(|d| d.amount).sum();
    let total_paid: Decimal = debts
        .iter()
        .filter(|d| d.paid_off)
        .map(|d| d.amount)
        .sum();

    DebtSummary {
        total_debt: two_dp(total_debt),
        total_paid: two_dp(total_paid),
        remaining_debt: two_dp(total_debt - total_paid),
    }
}
