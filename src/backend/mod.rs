pub mod auth;
pub mod error;
pub mod handlers;
mod routes;
pub mod validation;

use std::env;
use std::net::SocketAddr;

use anyhow::Context;
use axum::{routing::get, Router};
use sqlx::{Pool, Sqlite};

use crate::backend::auth::TokenConfig;

/// Everything read from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    pub access_ttl_secs: i64,
    pub refresh_ttl_secs: i64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET is not set")?;
        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
            .parse()
            .context("BIND_ADDR is not a valid socket address")?;
        let access_ttl_secs = env_i64("ACCESS_TOKEN_TTL_SECS", 3600)?;
        let refresh_ttl_secs = env_i64("REFRESH_TOKEN_TTL_SECS", 86400)?;

        Ok(Self {
            database_url,
            bind_addr,
            jwt_secret,
            access_ttl_secs,
            refresh_ttl_secs,
        })
    }
}

fn env_i64(name: &str, default: i64) -> anyhow::Result<i64> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{} is not a valid integer", name)),
        Err(_) => Ok(default),
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db: Pool<Sqlite>,
    pub tokens: TokenConfig,
}

/// The full application, health check included. Tests drive this
/// directly without binding a socket.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "Backend is running" }))
        .merge(routes::api_routes())
        .with_state(state)
}

pub async fn run_server(config: &Config, pool: Pool<Sqlite>) -> anyhow::Result<()> {
    let state = AppState {
        db: pool,
        tokens: TokenConfig::new(
            &config.jwt_secret,
            config.access_ttl_secs,
            config.refresh_ttl_secs,
        ),
    };
    let app = build_router(state);

    tracing::info!(addr = %config.bind_addr, "server listening");

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
