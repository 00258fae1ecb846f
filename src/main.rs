use dotenvy::dotenv;
use tracing_subscriber::EnvFilter;

use financial_planner::backend::{self, Config};
use financial_planner::database;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let pool = database::db::connection::get_db_pool(&config.database_url).await?;
    database::db::migrate::run_migrations(&pool).await?;

    backend::run_server(&config, pool).await?;
    Ok(())
}
