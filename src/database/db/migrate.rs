use anyhow::Result;
use sqlx::{Pool, Sqlite};

/// Applies the embedded schema migrations (see migrations/).
pub async fn run_migrations(pool: &Pool<Sqlite>) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
