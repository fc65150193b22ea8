//! vcfdb CLI - Main entry point

use clap::Parser;
use std::process;
use tracing::error;
use vcfdb_cli::{commands, Cli, Commands};
use vcfdb_common::logging::{init_logging, LogConfig, LogLevel, LogOutput};

#[tokio::main]
async fn main() {
    // Pick up DATABASE_URL and VCFDB_* from .env before clap reads the environment
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Verbose mode logs debug events; otherwise only warnings reach the console
    let log_config = LogConfig::builder()
        .level(if cli.verbose { LogLevel::Debug } else { LogLevel::Warn })
        .output(LogOutput::Console)
        .log_file_prefix("vcfdb-cli")
        .build();

    // Environment variables take precedence
    let log_config = log_config.clone().merge_env().unwrap_or(log_config);

    // CLI should work without logging
    let _guard = init_logging(&log_config).ok();

    if let Err(e) = execute_command(&cli).await {
        error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Execute the CLI command
async fn execute_command(cli: &Cli) -> vcfdb_cli::Result<()> {
    let url = cli.database_url.as_str();

    match &cli.command {
        Commands::Add {
            raw_dir,
            processed_dir,
        } => commands::add::run(url, raw_dir.clone(), processed_dir.clone()).await,

        Commands::Find { chr, pos } => commands::find::run(url, chr.clone(), pos.clone()).await,

        Commands::Migrate => commands::migrate::run(url).await,

        Commands::Requeue {
            raw_dir,
            processed_dir,
        } => commands::requeue::run(url, raw_dir.clone(), processed_dir.clone()).await,
    }
}
