use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Sqlite, SqliteConnection};
use rust_decimal::Decimal;
use sqlx::Row;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use crate::database::models::{
    Budget, BudgetCategory, Debt, Expense, Goal, Income, NewExpense, NewGoal, Notification, User,
};
/*
This file contains the specific SQL queries and CRUD logic for every
resource. Reads and updates always filter by the owning user id, so a
missing row and a row owned by someone else look identical to callers.
 */

// Monetary columns are TEXT; convert on the way out.
fn decimal_column(row: &SqliteRow, column: &str) -> Result<Decimal, sqlx::Error> {
    let text: String = row.try_get(column)?;
    Decimal::from_str_exact(&text)
        .map_err(|e| sqlx::Error::Decode(format!("Invalid Decimal format for {}: {}", column, e).into()))
}

fn map_budget_row(row: &SqliteRow) -> Result<Budget, sqlx::Error> {
    Ok(Budget {
        id: row.get("id"),
        user_id: row.get("user_id"),
        category_id: row.get("category_id"),
        allocated_amount: decimal_column(row, "allocated_amount")?,
        spent_amount: decimal_column(row, "spent_amount")?,
        start_date: row.get("start_date"),
        end_date: row.get("end_date"),
        is_recurring: row.get("is_recurring"),
        created_at: row.get("created_at"),
    })
}

fn map_expense_row(row: &SqliteRow) -> Result<Expense, sqlx::Error> {
    Ok(Expense {
        id: row.get("id"),
        budget_id: row.get("budget_id"),
        description: row.get("description"),
        amount: decimal_column(row, "amount")?,
        date: row.get("date"),
        recurring: row.get("recurring"),
        created_at: row.get("created_at"),
    })
}

fn map_income_row(row: &SqliteRow) -> Result<Income, sqlx::Error> {
    Ok(Income {
        id: row.get("id"),
        user_id: row.get("user_id"),
        source: row.get("source"),
        amount: decimal_column(row, "amount")?,
        date: row.get("date"),
        recurring: row.get("recurring"),
        description: row.get("description"),
        created_at: row.get("created_at"),
    })
}

fn map_debt_row(row: &SqliteRow) -> Result<Debt, sqlx::Error> {
    Ok(Debt {
        id: row.get("id"),
        user_id: row.get("user_id"),
        creditor_name: row.get("creditor_name"),
        amount: decimal_column(row, "amount")?,
        due_date: row.get("due_date"),
        paid_amount: decimal_column(row, "paid_amount")?,
        description: row.get("description"),
        paid_off: row.get("paid_off"),
        created_at: row.get("created_at"),
    })
}

fn map_goal_row(row: &SqliteRow) -> Result<Goal, sqlx::Error> {
    Ok(Goal {
        id: row.get("id"),
        user_id: row.get("user_id"),
        name: row.get("name"),
        target_amount: decimal_column(row, "target_amount")?,
        current_savings: decimal_column(row, "current_savings")?,
        due_date: row.get("due_date"),
        progress: row.get("progress"),
        priority: row.get("priority"),
        created_at: row.get("created_at"),
    })
}

/*==========User Queries=========== */

// Create user (currency_preference takes the schema default)
pub async fn create_user(
    pool: &Pool<Sqlite>,
    username: &str,
    email: &str,
    password_hash: &str,
    first_name: &str,
    last_name: &str,
) -> Result<User, sqlx::Error> {
    let now = Utc::now().naive_utc();
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, email, password_hash, first_name, last_name, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(first_name)
    .bind(last_name)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn find_user_by_username(
    pool: &Pool<Sqlite>,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await
}

pub async fn find_user_by_id(pool: &Pool<Sqlite>, id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/*==========Category Queries=========== */

pub async fn list_categories_by_owner(
    pool: &Pool<Sqlite>,
    user_id: i64,
) -> Result<Vec<BudgetCategory>, sqlx::Error> {
    sqlx::query_as::<_, BudgetCategory>(
        "SELECT * FROM budget_categories WHERE user_id = ? ORDER BY id ASC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn create_category(
    pool: &Pool<Sqlite>,
    user_id: i64,
    name: &str,
    description: Option<&str>,
) -> Result<BudgetCategory, sqlx::Error> {
    let now = Utc::now().naive_utc();
    sqlx::query_as::<_, BudgetCategory>(
        r#"
        INSERT INTO budget_categories (user_id, name, description, created_at)
        VALUES (?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(name)
    .bind(description)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn find_category_by_id_and_owner(
    pool: &Pool<Sqlite>,
    id: i64,
    user_id: i64,
) -> Result<Option<BudgetCategory>, sqlx::Error> {
    sqlx::query_as::<_, BudgetCategory>(
        "SELECT * FROM budget_categories WHERE id = ? AND user_id = ?",
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

// Full replace; an omitted description clears the stored one.
pub async fn update_category(
    pool: &Pool<Sqlite>,
    id: i64,
    user_id: i64,
    name: &str,
    description: Option<&str>,
) -> Result<Option<BudgetCategory>, sqlx::Error> {
    sqlx::query_as::<_, BudgetCategory>(
        r#"
        UPDATE budget_categories
        SET name = ?, description = ?
        WHERE id = ? AND user_id = ?
        RETURNING *
        "#,
    )
    .bind(name)
    .bind(description)
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/*==========Budget Queries=========== */

pub async fn list_budgets_by_owner(
    pool: &Pool<Sqlite>,
    user_id: i64,
) -> Result<Vec<Budget>, sqlx::Error> {
    sqlx::query(
        r#"
        SELECT
            id,
            user_id,
            category_id,
            allocated_amount,
            spent_amount,
            start_date,
            end_date,
            is_recurring,
            created_at
        FROM budgets
        WHERE user_id = ?
        ORDER BY id ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?
    .into_iter()
    .map(|row| map_budget_row(&row))
    .collect::<Result<Vec<Budget>, sqlx::Error>>()
}

pub async fn create_budget(
    pool: &Pool<Sqlite>,
    user_id: i64,
    category_id: i64,
    allocated_amount: Decimal,
    spent_amount: Decimal,
    start_date: NaiveDate,
    end_date: NaiveDate,
    is_recurring: bool,
) -> Result<Budget, sqlx::Error> {
    let now = Utc::now().naive_utc();
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO budgets (user_id, category_id, allocated_amount, spent_amount, start_date, end_date, is_recurring, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(category_id)
    .bind(allocated_amount.to_string())
    .bind(spent_amount.to_string())
    .bind(start_date)
    .bind(end_date)
    .bind(is_recurring)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(Budget {
        id,
        user_id,
        category_id,
        allocated_amount,
        spent_amount,
        start_date,
        end_date,
        is_recurring,
        created_at: now,
    })
}

pub async fn find_budget_by_id_and_owner(
    pool: &Pool<Sqlite>,
    id: i64,
    user_id: i64,
) -> Result<Option<Budget>, sqlx::Error> {
    sqlx::query(
        r#"
        SELECT
            id,
            user_id,
            category_id,
            allocated_amount,
            spent_amount,
            start_date,
            end_date,
            is_recurring,
            created_at
        FROM budgets
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .map(|row| map_budget_row(&row))
    .transpose()
}

// Budget id -> its category's name, for response shaping.
pub async fn list_budget_names_by_owner(
    pool: &Pool<Sqlite>,
    user_id: i64,
) -> Result<Vec<(i64, String)>, sqlx::Error> {
    sqlx::query_as::<_, (i64, String)>(
        r#"
        SELECT b.id, c.name
        FROM budgets b
        JOIN budget_categories c ON c.id = b.category_id
        WHERE b.user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn update_budget_allocation(
    pool: &Pool<Sqlite>,
    id: i64,
    user_id: i64,
    allocated_amount: Decimal,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE budgets
        SET allocated_amount = ?
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(allocated_amount.to_string())
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/*==========Expense Queries=========== */

// Expenses hang off budgets, so ownership goes through the budget's owner.
pub async fn list_expenses_by_owner(
    pool: &Pool<Sqlite>,
    user_id: i64,
) -> Result<Vec<Expense>, sqlx::Error> {
    sqlx::query(
        r#"
        SELECT
            e.id,
            e.budget_id,
            e.description,
            e.amount,
            e.date,
            e.recurring,
            e.created_at
        FROM expenses e
        JOIN budgets b ON b.id = e.budget_id
        WHERE b.user_id = ?
        ORDER BY e.id ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?
    .into_iter()
    .map(|row| map_expense_row(&row))
    .collect::<Result<Vec<Expense>, sqlx::Error>>()
}

async fn insert_expense(
    conn: &mut SqliteConnection,
    expense: &NewExpense,
    now: NaiveDateTime,
) -> Result<Expense, sqlx::Error> {
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO expenses (budget_id, description, amount, date, recurring, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(expense.budget_id)
    .bind(&expense.description)
    .bind(expense.amount.to_string())
    .bind(expense.date)
    .bind(expense.recurring)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;

    Ok(Expense {
        id,
        budget_id: expense.budget_id,
        description: expense.description.clone(),
        amount: expense.amount,
        date: expense.date,
        recurring: expense.recurring,
        created_at: now,
    })
}

pub async fn create_expense(
    pool: &Pool<Sqlite>,
    expense: &NewExpense,
) -> Result<Expense, sqlx::Error> {
    let mut conn = pool.acquire().await?;
    let now = Utc::now().naive_utc();
    insert_expense(&mut conn, expense, now).await
}

// All-or-nothing batch: one transaction, submission order preserved.
pub async fn create_expenses(
    pool: &Pool<Sqlite>,
    expenses: &[NewExpense],
) -> Result<Vec<Expense>, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let now = Utc::now().naive_utc();

    let mut created = Vec::with_capacity(expenses.len());
    for expense in expenses {
        created.push(insert_expense(&mut tx, expense, now).await?);
    }

    tx.commit().await?;
    Ok(created)
}

/*==========Income Queries=========== */

pub async fn list_incomes_by_owner(
    pool: &Pool<Sqlite>,
    user_id: i64,
) -> Result<Vec<Income>, sqlx::Error> {
    sqlx::query(
        r#"
        SELECT
            id,
            user_id,
            source,
            amount,
            date,
            recurring,
            description,
            created_at
        FROM incomes
        WHERE user_id = ?
        ORDER BY id ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?
    .into_iter()
    .map(|row| map_income_row(&row))
    .collect::<Result<Vec<Income>, sqlx::Error>>()
}

pub async fn create_income(
    pool: &Pool<Sqlite>,
    user_id: i64,
    source: String,
    amount: Decimal,
    date: NaiveDate,
    recurring: bool,
    description: Option<String>,
) -> Result<Income, sqlx::Error> {
    let now = Utc::now().naive_utc();
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO incomes (user_id, source, amount, date, recurring, description, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(&source)
    .bind(amount.to_string())
    .bind(date)
    .bind(recurring)
    .bind(&description)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(Income {
        id,
        user_id,
        source,
        amount,
        date,
        recurring,
        description,
        created_at: now,
    })
}

/*==========Debt Queries=========== */

pub async fn list_debts_by_owner(
    pool: &Pool<Sqlite>,
    user_id: i64,
) -> Result<Vec<Debt>, sqlx::Error> {
    sqlx::query(
        r#"
        SELECT
            id,
            user_id,
            creditor_name,
            amount,
            due_date,
            paid_amount,
            description,
            paid_off,
            created_at
        FROM debts
        WHERE user_id = ?
        ORDER BY id ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?
    .into_iter()
    .map(|row| map_debt_row(&row))
    .collect::<Result<Vec<Debt>, sqlx::Error>>()
}

pub async fn create_debt(
    pool: &Pool<Sqlite>,
    user_id: i64,
    creditor_name: String,
    amount: Decimal,
    due_date: NaiveDate,
    paid_amount: Decimal,
    description: Option<String>,
) -> Result<Debt, sqlx::Error> {
    let now = Utc::now().naive_utc();
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO debts (user_id, creditor_name, amount, due_date, paid_amount, description, paid_off, created_at)
        VALUES (?, ?, ?, ?, ?, ?, 0, ?)
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(&creditor_name)
    .bind(amount.to_string())
    .bind(due_date)
    .bind(paid_amount.to_string())
    .bind(&description)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(Debt {
        id,
        user_id,
        creditor_name,
        amount,
        due_date,
        paid_amount,
        description,
        paid_off: false,
        created_at: now,
    })
}

// Flips the flag only; paid_amount is left as recorded.
pub async fn mark_debt_paid_off(
    pool: &Pool<Sqlite>,
    id: i64,
    user_id: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE debts
        SET paid_off = 1
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/*==========Goal Queries=========== */

pub async fn list_goals_by_owner(
    pool: &Pool<Sqlite>,
    user_id: i64,
) -> Result<Vec<Goal>, sqlx::Error> {
    sqlx::query(
        r#"
        SELECT
            id,
            user_id,
            name,
            target_amount,
            current_savings,
            due_date,
            progress,
            priority,
            created_at
        FROM goals
        WHERE user_id = ?
        ORDER BY id ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?
    .into_iter()
    .map(|row| map_goal_row(&row))
    .collect::<Result<Vec<Goal>, sqlx::Error>>()
}

// Inserts the goal and its "New goal created" notification on one connection
// so both land in the caller's transaction.
async fn insert_goal(
    conn: &mut SqliteConnection,
    user_id: i64,
    goal: &NewGoal,
    now: NaiveDateTime,
) -> Result<Goal, sqlx::Error> {
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO goals (user_id, name, target_amount, current_savings, due_date, progress, priority, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(&goal.name)
    .bind(goal.target_amount.to_string())
    .bind(goal.current_savings.to_string())
    .bind(goal.due_date)
    .bind(goal.progress)
    .bind(&goal.priority)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO notifications (user_id, message, is_read, created_at)
        VALUES (?, ?, 0, ?)
        "#,
    )
    .bind(user_id)
    .bind(format!("New goal created: {}", goal.name))
    .bind(now)
    .execute(&mut *conn)
    .await?;

    Ok(Goal {
        id,
        user_id,
        name: goal.name.clone(),
        target_amount: goal.target_amount,
        current_savings: goal.current_savings,
        due_date: goal.due_date,
        progress: goal.progress,
        priority: goal.priority.clone(),
        created_at: now,
    })
}

pub async fn create_goal(
    pool: &Pool<Sqlite>,
    user_id: i64,
    goal: &NewGoal,
) -> Result<Goal, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let now = Utc::now().naive_utc();
    let created = insert_goal(&mut tx, user_id, goal, now).await?;
    tx.commit().await?;
    Ok(created)
}

// All-or-nothing batch; every goal gets its notification in the same transaction.
pub async fn create_goals(
    pool: &Pool<Sqlite>,
    user_id: i64,
    goals: &[NewGoal],
) -> Result<Vec<Goal>, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let now = Utc::now().naive_utc();

    let mut created = Vec::with_capacity(goals.len());
    for goal in goals {
        created.push(insert_goal(&mut tx, user_id, goal, now).await?);
    }

    tx.commit().await?;
    Ok(created)
}

// Full replace of every caller-settable column.
pub async fn replace_goal(
    pool: &Pool<Sqlite>,
    id: i64,
    user_id: i64,
    goal: &NewGoal,
) -> Result<Option<Goal>, sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE goals
        SET name = ?, target_amount = ?, current_savings = ?, due_date = ?, progress = ?, priority = ?
        WHERE id = ? AND user_id = ?
        RETURNING id, user_id, name, target_amount, current_savings, due_date, progress, priority, created_at
        "#,
    )
    .bind(&goal.name)
    .bind(goal.target_amount.to_string())
    .bind(goal.current_savings.to_string())
    .bind(goal.due_date)
    .bind(goal.progress)
    .bind(&goal.priority)
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .map(|row| map_goal_row(&row))
    .transpose()
}

pub async fn update_goal_progress(
    pool: &Pool<Sqlite>,
    id: i64,
    user_id: i64,
    progress: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE goals
        SET progress = ?
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(progress)
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn update_goal_priority(
    pool: &Pool<Sqlite>,
    id: i64,
    user_id: i64,
    priority: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE goals
        SET priority = ?
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(priority)
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/*==========Notification Queries=========== */

// The list endpoint only ever shows unread notifications.
pub async fn list_unread_notifications(
    pool: &Pool<Sqlite>,
    user_id: i64,
) -> Result<Vec<Notification>, sqlx::Error> {
    sqlx::query_as::<_, Notification>(
        "SELECT * FROM notifications WHERE user_id = ? AND is_read = 0 ORDER BY id ASC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

// Marks the caller-owned, still-unread subset of `ids`; returns how many
// rows actually flipped so the handler can 404 on a no-op.
pub async fn mark_notifications_read(
    pool: &Pool<Sqlite>,
    user_id: i64,
    ids: &[i64],
) -> Result<u64, sqlx::Error> {
    if ids.is_empty() {
        return Ok(0);
    }

    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!(
        "UPDATE notifications SET is_read = 1 WHERE user_id = ? AND is_read = 0 AND id IN ({})",
        placeholders
    );

    let mut query = sqlx::query(&sql).bind(user_id);
    for id in ids {
        query = query.bind(id);
    }
    let result = query.execute(pool).await?;

    Ok(result.rows_affected())
}
