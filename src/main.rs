mod api;
mod config;
mod db;
mod error;
mod json;
mod types;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::api::routes::{app, ApiState};
use crate::config::Config;
use crate::error::Result;

#[tokio::main]
async fn main() {
    // A missing .env file is fine; the real environment still applies.
    let _ = dotenvy::dotenv();

    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    // --- Database setup ---
    let pool = db::pool::open(&cfg.database_url, cfg.pool_min, cfg.pool_max).await?;
    info!(
        "Database ready at {} (pool {}..={})",
        cfg.database_url, cfg.pool_min, cfg.pool_max
    );

    // --- HTTP server ---
    match &cfg.auth {
        Some(creds) => info!("Basic auth enabled for user {}", creds.username),
        None => warn!("AUTH_CREDENTIALS not set, serving without authentication"),
    }
    let app = app(ApiState::new(pool, cfg.max_body_bytes), cfg.auth.as_ref());

    let bind_addr = format!("0.0.0.0:{}", cfg.api_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("HTTP API listening on {bind_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
