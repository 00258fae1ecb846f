pub mod user;
pub mod category;
pub mod budget;
pub mod expense;
pub mod income;
pub mod debt;
pub mod goal;
pub mod notification;

pub use user::User;
pub use category::BudgetCategory;
pub use budget::Budget;
pub use expense::{Expense, NewExpense};
pub use income::Income;
pub use debt::Debt;
pub use goal::{Goal, NewGoal};
pub use notification::Notification;
