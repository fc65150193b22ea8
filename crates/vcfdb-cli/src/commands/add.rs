//! `vcfdb add` command implementation
//!
//! Stores every file in the intake area and prints what happened to each.

use colored::Colorize;
use std::path::{Path, PathBuf};
use vcfdb_server::ingest::{BatchReport, IngestPipeline};

use crate::error::{CliError, Result};
use crate::progress::{format_elapsed, BatchProgress};

/// Run one batch over the intake area
pub async fn run(
    database_url: &str,
    raw_dir: Option<PathBuf>,
    processed_dir: Option<PathBuf>,
) -> Result<()> {
    let config = super::ingest_config(raw_dir, processed_dir)?;
    let store = super::open_store(database_url).await?;
    let pipeline = IngestPipeline::connect(store, config).await?;

    let config = pipeline.config();
    println!(
        "Processing {} files from {} (version {})",
        format!("*.{}", config.extension).green(),
        config.raw_dir.display().to_string().cyan(),
        pipeline.version().cyan()
    );
    println!(
        "{}",
        format!(
            "Sub-folders inside {} will not be processed.",
            config.raw_dir.display()
        )
        .italic()
    );

    let mut progress = BatchProgress::new();
    let report = pipeline.run_batch_with(&mut progress).await?;
    progress.finish();

    print_report(&report);

    match report.aborted {
        Some(failure) => Err(CliError::BatchAborted(failure.message)),
        None => Ok(()),
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn print_report(report: &BatchReport) {
    for outcome in report.skipped() {
        println!(
            "{} {} (file id '{}' already stored at this version)",
            "-".yellow(),
            display_name(&outcome.file),
            outcome.file_id
        );
    }

    for outcome in report.unarchived() {
        println!(
            "{} {} stored but could not be moved to the processed area",
            "!".yellow(),
            display_name(&outcome.file)
        );
    }

    for failure in &report.failures {
        println!("{} {}", "✗".red(), failure.message);
    }

    println!();
    println!("{}", summary_line(report).bold());
    println!(
        "{}",
        format!("Processing took {}", format_elapsed(report.elapsed)).cyan()
    );
}

fn summary_line(report: &BatchReport) -> String {
    format!(
        "{} found, {} inserted, {} updated, {} skipped, {} failed",
        report.discovered,
        report.inserted(),
        report.updated(),
        report.skipped().count(),
        report.failed()
    )
}
