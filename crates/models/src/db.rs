use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use configs::DatabaseConfig;

/// Open a connection pool from an explicit configuration struct.
/// Connection failure here is fatal to the caller; the service must not
/// serve traffic without a working store connection.
pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new(cfg.url.clone());
    opts.max_connections(cfg.max_connections)
        .min_connections(cfg.min_connections)
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(cfg.idle_timeout_secs))
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .sqlx_logging(cfg.sqlx_logging);
    let db = Database::connect(opts).await?;
    Ok(db)
}

/// Convenience for tests and tools: config file first, env fallback.
pub fn database_config() -> anyhow::Result<DatabaseConfig> {
    let _ = dotenvy::dotenv();
    let mut cfg = match configs::load_default() {
        Ok(app) => app.database,
        Err(_) => DatabaseConfig::default(),
    };
    cfg.normalize_from_env();
    cfg.validate()?;
    Ok(cfg)
}
