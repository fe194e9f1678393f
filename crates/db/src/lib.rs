use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod repositories;

pub use catalog::AttributeCatalog;
pub use config::CatalogConfig;
pub use error::{ChangeError, Operation};

pub type DbPool = sqlx::SqlitePool;

/// Create a connection pool for the configured database file.
///
/// The file is created if missing and foreign-key enforcement is switched on
/// for every connection.
pub async fn create_pool(config: &CatalogConfig) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::new()
        .filename(&config.database_path)
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(config.busy_timeout_secs));

    SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await
}

/// Round-trip a trivial query to verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
