pub mod auth;
pub mod budgets;
pub mod categories;
pub mod debts;
pub mod expenses;
pub mod goals;
pub mod incomes;
pub mod notifications;
pub mod summaries;
