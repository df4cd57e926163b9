use std::sync::Arc;

mod activities;
mod app;
mod auth;
mod config;
mod db;
mod error;
mod extract;
mod games;
#[cfg(test)]
mod memory;
mod state;
mod users;

use crate::{config::AppConfig, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        "educreate_backend=debug,axum=info,tower_http=info,sqlx=warn".to_string()
    });
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = Arc::new(AppConfig::from_env()?);
    tracing::info!(environment = ?config.environment, "starting");

    let db = db::connect(&config).await?;
    db::migrate(&db).await?;

    let app_state = AppState::new(config.clone(), db.clone());
    let served = app::serve(app::build_app(app_state), &config.host, config.port).await;

    db.close().await;
    tracing::info!("database pool closed");
    served
}
