//! `vcfdb requeue` command implementation
//!
//! Moves processed files back to the intake area so the next `vcfdb add`
//! re-ingests them under the current version tag.

use colored::Colorize;
use std::path::PathBuf;
use vcfdb_server::ingest::IngestPipeline;

use crate::error::Result;
use crate::progress::create_spinner;

pub async fn run(
    database_url: &str,
    raw_dir: Option<PathBuf>,
    processed_dir: Option<PathBuf>,
) -> Result<()> {
    let config = super::ingest_config(raw_dir, processed_dir)?;
    let store = super::open_store(database_url).await?;
    let pipeline = IngestPipeline::connect(store, config).await?;

    let spinner = create_spinner("Moving processed files back to the intake area...");
    let requeued = pipeline.requeue_processed().await;
    spinner.finish_and_clear();
    let requeued = requeued?;

    for file in &requeued.conflicts {
        println!(
            "{} {} left in place: a file of the same name is waiting in the intake area",
            "!".yellow(),
            file.display()
        );
    }

    let moved = requeued.moved;
    if moved.is_empty() {
        if requeued.conflicts.is_empty() {
            println!(
                "No processed files found in {}",
                pipeline.config().processed_dir.display().to_string().cyan()
            );
        }
        return Ok(());
    }

    println!(
        "{} Moved {} file(s) to {}",
        "✓".green(),
        moved.len(),
        pipeline.config().raw_dir.display().to_string().cyan()
    );
    println!(
        "{}",
        format!(
            "Run 'vcfdb add' to re-process them under version {}.",
            pipeline.version()
        )
        .bold()
    );

    Ok(())
}
