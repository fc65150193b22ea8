//! `vcfdb migrate` command implementation

use colored::Colorize;
use vcfdb_server::db::{self, DbConfig};
use vcfdb_server::ingest::schema_version_tag;

use crate::error::Result;

/// Apply pending schema migrations and report the resulting version
pub async fn run(database_url: &str) -> Result<()> {
    let pool = db::create_pool(&DbConfig::new(database_url)).await?;

    let before = db::current_schema_version(&pool).await?;
    let after = db::run_migrations(&pool).await?;
    pool.close().await;

    println!("{}", describe(before, after));
    if before.is_some_and(|v| v < after) {
        println!(
            "{}",
            "Files stored under the previous schema are now stale.".yellow()
        );
        println!(
            "{}",
            "Run 'vcfdb requeue' and then 'vcfdb add' to refresh them.".yellow()
        );
    }

    Ok(())
}

fn describe(before: Option<i64>, after: i64) -> String {
    match before {
        Some(v) if v == after => format!(
            "{} Schema already at version {} ({})",
            "✓".green(),
            after,
            schema_version_tag(after)
        ),
        Some(v) => format!(
            "{} Schema migrated from version {} to {} ({})",
            "✓".green(),
            v,
            after,
            schema_version_tag(after)
        ),
        None => format!(
            "{} Schema created at version {} ({})",
            "✓".green(),
            after,
            schema_version_tag(after)
        ),
    }
}
