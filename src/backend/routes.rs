use axum::{
    routing::{get, post, put},
    Router,
};

use crate::backend::handlers::{
    auth, budgets, categories, debts, expenses, goals, incomes, notifications, summaries,
};
use crate::backend::AppState;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/api/token/", post(auth::token))
        .route("/api/token/refresh/", post(auth::refresh))
        .route("/budget/", get(budgets::list_budgets).post(budgets::create_budget))
        .route("/budget/:id/allocation", put(budgets::update_allocation))
        .route("/goals/", get(goals::list_goals).post(goals::create_goal))
        .route("/goals/bulk-create", post(goals::bulk_create_goals))
        .route("/goals/:id", put(goals::replace_goal))
        .route("/goals/:id/progress", put(goals::update_progress))
        .route("/goals/:id/priority", put(goals::update_priority))
        .route("/income/", get(incomes::list_incomes).post(incomes::create_income))
        .route("/expenses/", get(expenses::list_expenses).post(expenses::create_expense))
        .route("/expenses/bulk-create", post(expenses::bulk_create_expenses))
        .route("/debts/", get(debts::list_debts).post(debts::create_debt))
        .route("/debts/:id/payoff", put(debts::payoff_debt))
        .route("/categories/", get(categories::list_categories).post(categories::create_category))
        .route("/categories/:id", put(categories::update_category))
        .route("/spending-summary", get(summaries::spending_summary))
        .route("/income-expense-summary", get(summaries::income_expense_summary))
        .route("/debt-summary", get(summaries::debt_summary))
        .route("/notifications/", get(notifications::list_notifications))
        .route("/notifications/mark-read", put(notifications::mark_read))
}
