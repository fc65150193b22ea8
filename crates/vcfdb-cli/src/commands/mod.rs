//! CLI command implementations
//!
//! Each subcommand has its own module with a `run` function.

pub mod add;
pub mod find;
pub mod migrate;
pub mod requeue;

use std::path::PathBuf;
use tracing::debug;
use vcfdb_server::db::{self, DbConfig, VariantStore};
use vcfdb_server::ingest::IngestConfig;

use crate::error::{CliError, Result};

/// Open the store and bring its schema up to date
pub(crate) async fn open_store(database_url: &str) -> Result<VariantStore> {
    let pool = db::create_pool(&DbConfig::new(database_url)).await?;
    let version = db::run_migrations(&pool).await?;
    debug!(schema_version = version, "Schema is current");
    Ok(VariantStore::new(pool))
}

/// Ingestion settings from the environment, with command-line overrides
pub(crate) fn ingest_config(
    raw_dir: Option<PathBuf>,
    processed_dir: Option<PathBuf>,
) -> Result<IngestConfig> {
    let mut config = IngestConfig::from_env();
    if let Some(dir) = raw_dir {
        config.raw_dir = dir;
    }
    if let Some(dir) = processed_dir {
        config.processed_dir = dir;
    }

    config
        .validate()
        .map_err(|e| CliError::config(e.to_string()))?;
    Ok(config)
}
