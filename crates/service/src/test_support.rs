#![cfg(test)]
use migration::MigratorTrait;
use models::db;
use sea_orm::DatabaseConnection;
use tokio::sync::OnceCell;

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<()> = OnceCell::const_new();

/// Connect to the test database, running migrations on first use.
/// Callers skip their test when no `DATABASE_URL` is available.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let cfg = db::database_config()?;

    MIGRATED
        .get_or_init(|| async {
            let conn = db::connect(&cfg).await.expect("connect db for migration");
            migration::Migrator::up(&conn, None).await.expect("migrate up");
            drop(conn);
        })
        .await;

    // Return a fresh connection for the current test's runtime
    let conn = db::connect(&cfg).await?;
    Ok(conn)
}
