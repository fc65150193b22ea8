//! Relational storage: connection pool, schema migrations, and the
//! [`VariantStore`] handle used by ingestion and queries.

pub mod migrations;
pub mod store;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub use migrations::{current_schema_version, run_migrations, LATEST_SCHEMA_VERSION};
pub use store::{FileRecord, GenotypeBreakdown, VariantRecord, VariantRow, VariantStore};

/// Database operation errors with contextual information
#[derive(Error, Debug)]
pub enum DbError {
    /// SQL query or connection error
    #[error("Database query failed: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Database configuration is invalid or missing
    #[error("Database configuration error: {0}. Check DATABASE_URL and connection settings.")]
    Config(String),

    /// Schema bookkeeping is inconsistent with the compiled migration list
    #[error("Schema migration error: {0}")]
    Migration(String),

    /// A bulk write touched fewer rows than it was given; the transaction was
    /// rolled back
    #[error("Bulk write affected {written} of {expected} rows")]
    ShortWrite { expected: u64, written: u64 },
}

impl DbError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: crate::config::DEFAULT_DATABASE_URL.to_string(),
            max_connections: crate::config::DEFAULT_DATABASE_MAX_CONNECTIONS,
            connect_timeout_secs: crate::config::DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS,
        }
    }
}

impl DbConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}

impl From<&crate::config::DatabaseConfig> for DbConfig {
    fn from(config: &crate::config::DatabaseConfig) -> Self {
        Self {
            url: config.url.clone(),
            max_connections: config.max_connections,
            connect_timeout_secs: config.connect_timeout_secs,
        }
    }
}

/// Open a pool against the configured SQLite database, creating the file if
/// it does not exist yet. Foreign keys are enforced on every connection.
///
/// In-memory URLs get a single connection that never expires, since each
/// SQLite connection to `:memory:` would otherwise see its own empty database.
pub async fn create_pool(config: &DbConfig) -> DbResult<SqlitePool> {
    if !config.url.starts_with("sqlite:") {
        return Err(DbError::config(format!(
            "unsupported database URL '{}', expected a sqlite: URL",
            config.url
        )));
    }

    let connect_options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let in_memory = config.url.contains(":memory:") || config.url.contains("mode=memory");

    let mut options = SqlitePoolOptions::new()
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs));

    options = if in_memory {
        options.max_connections(1).idle_timeout(None).max_lifetime(None)
    } else {
        options.max_connections(config.max_connections)
    };

    let pool = options.connect_with(connect_options).await?;

    tracing::info!(
        url = %config.url,
        max_connections = if in_memory { 1 } else { config.max_connections },
        "Database connection pool created"
    );

    Ok(pool)
}

pub async fn health_check(pool: &SqlitePool) -> DbResult<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map(|_| ())
        .map_err(DbError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DbConfig::default();
        assert!(config.url.starts_with("sqlite:"));
        assert!(config.max_connections > 0);
    }

    #[tokio::test]
    async fn test_rejects_non_sqlite_url() {
        let config = DbConfig::new("postgresql://localhost/vcfdb");
        let err = create_pool(&config).await.unwrap_err();
        assert!(matches!(err, DbError::Config(_)));
    }

    #[tokio::test]
    async fn test_in_memory_pool_health() {
        let pool = create_pool(&DbConfig::new("sqlite::memory:")).await.unwrap();
        health_check(&pool).await.unwrap();
    }
}
