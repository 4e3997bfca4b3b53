use std::net::SocketAddr;

use axum::Router;
use common::utils::logging::init_logging_default;
use configs::AppConfig;
use dotenvy::dotenv;
use migration::MigratorTrait;
use tracing::info;

use crate::rate_limit::RateLimiter;
use crate::routes::{self, AppState};

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

/// Config file first, environment variables as fallback.
fn load_config() -> anyhow::Result<AppConfig> {
    match AppConfig::load_and_validate() {
        Ok(cfg) => Ok(cfg),
        Err(_) => AppConfig::from_env(),
    }
}

/// Public entry: build the app and run the HTTP server.
/// A failed store connection is fatal; we never serve traffic without one.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let cfg = load_config()?;

    let db = models::db::connect(&cfg.database).await?;
    migration::Migrator::up(&db, None).await?;

    let state = AppState { db };
    let cors = routes::build_cors(&cfg.cors);
    let limiter = RateLimiter::new(&cfg.rate_limit);
    let app: Router = routes::build_router(state, cors, limiter);

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, "starting income records server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}
