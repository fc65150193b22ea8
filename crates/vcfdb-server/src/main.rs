//! vcfdb Server - Main entry point

use anyhow::{Context, Result};
use tracing::info;
use vcfdb_common::logging::{init_logging, LogConfig};

use vcfdb_server::{
    api,
    config::Config,
    db::{self, DbConfig, VariantStore},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Environment variables take precedence over these defaults
    let log_config = LogConfig::builder()
        .log_file_prefix("vcfdb-server")
        .filter_directives("vcfdb_server=debug,tower_http=debug,sqlx=warn")
        .build()
        .merge_env()?;

    let _guard = init_logging(&log_config)?;

    info!("Starting vcfdb server");

    let config = Config::load()?;
    info!(
        "Configuration loaded - server will bind to {}:{}",
        config.server.host, config.server.port
    );

    let pool = db::create_pool(&DbConfig::from(&config.database))
        .await
        .context("Failed to connect to database")?;

    let schema_version = db::run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;
    info!(schema_version, "Database migrations completed");

    api::serve(config, VariantStore::new(pool)).await
}
