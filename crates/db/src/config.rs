use std::path::PathBuf;

use attrdb_core::identity::RemapStrategy;

/// Catalog configuration, passed explicitly to [`crate::AttributeCatalog`].
///
/// There is exactly one active database per catalog; switching databases
/// means building a new catalog from a new config.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Path of the SQLite database file.
    pub database_path: PathBuf,
    /// Pool size. The engine is single-writer; extra connections only serve
    /// concurrent previews.
    pub max_connections: u32,
    /// How long a connection waits on a locked database, in seconds.
    pub busy_timeout_secs: u64,
    /// How a category rename derives new attribute ids.
    pub remap_strategy: RemapStrategy,
    /// Re-run the preview inside the write transaction before applying.
    pub revalidate_on_apply: bool,
}

impl CatalogConfig {
    pub const DEFAULT_DATABASE: &'static str = "attributes.db";
    pub const DEFAULT_MAX_CONNECTIONS: u32 = 4;
    pub const DEFAULT_BUSY_TIMEOUT_SECS: u64 = 5;

    /// Defaults for the given database file.
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
            max_connections: Self::DEFAULT_MAX_CONNECTIONS,
            busy_timeout_secs: Self::DEFAULT_BUSY_TIMEOUT_SECS,
            remap_strategy: RemapStrategy::default(),
            revalidate_on_apply: true,
        }
    }

    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default         |
    /// |----------------------------|-----------------|
    /// | `ATTRDB_DATABASE`          | `attributes.db` |
    /// | `ATTRDB_MAX_CONNECTIONS`   | `4`             |
    /// | `ATTRDB_BUSY_TIMEOUT_SECS` | `5`             |
    /// | `ATTRDB_REMAP_STRATEGY`    | `structured`    |
    /// | `ATTRDB_REVALIDATE`        | `true`          |
    pub fn from_env() -> Result<Self, String> {
        let database_path = std::env::var("ATTRDB_DATABASE")
            .unwrap_or_else(|_| Self::DEFAULT_DATABASE.into());

        let max_connections: u32 = std::env::var("ATTRDB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_CONNECTIONS.to_string())
            .parse()
            .map_err(|_| "ATTRDB_MAX_CONNECTIONS must be a valid u32".to_string())?;

        let busy_timeout_secs: u64 = std::env::var("ATTRDB_BUSY_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_BUSY_TIMEOUT_SECS.to_string())
            .parse()
            .map_err(|_| "ATTRDB_BUSY_TIMEOUT_SECS must be a valid u64".to_string())?;

        let remap_strategy = match std::env::var("ATTRDB_REMAP_STRATEGY") {
            Ok(value) => RemapStrategy::from_str_value(&value)?,
            Err(_) => RemapStrategy::default(),
        };

        let revalidate_on_apply = match std::env::var("ATTRDB_REVALIDATE") {
            Ok(value) => parse_flag(&value)
                .ok_or_else(|| "ATTRDB_REVALIDATE must be true or false".to_string())?,
            Err(_) => true,
        };

        Ok(Self {
            database_path: database_path.into(),
            max_connections,
            busy_timeout_secs,
            remap_strategy,
            revalidate_on_apply,
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
