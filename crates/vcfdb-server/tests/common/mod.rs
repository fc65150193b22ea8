//! Shared fixtures for vcfdb server integration tests
//!
//! Every test gets its own in-memory SQLite database and its own temporary
//! intake/processed directories.

#![allow(dead_code)]

use anyhow::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use vcfdb_server::db::{create_pool, run_migrations, DbConfig, VariantStore};
use vcfdb_server::ingest::{IngestConfig, IngestPipeline};

pub const HEADER: &str = "#CHROM\tPOS\tID\tREF\tALT";

/// Initialize tracing for tests
pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let _ = fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,vcfdb_server=debug")),
        )
        .with_test_writer()
        .try_init();
}

pub async fn memory_store() -> Result<VariantStore> {
    let pool = create_pool(&DbConfig::new("sqlite::memory:")).await?;
    run_migrations(&pool).await?;
    Ok(VariantStore::new(pool))
}

/// Intake and processed directories under one temporary root
pub struct TestDirs {
    _root: TempDir,
    pub raw: PathBuf,
    pub processed: PathBuf,
}

impl TestDirs {
    pub fn new() -> Result<Self> {
        let root = TempDir::new()?;
        let raw = root.path().join("raw");
        let processed = root.path().join("processed");
        std::fs::create_dir_all(&raw)?;
        Ok(Self {
            _root: root,
            raw,
            processed,
        })
    }

    pub fn config(&self) -> IngestConfig {
        IngestConfig::default().with_dirs(&self.raw, &self.processed)
    }

    pub fn raw_file(&self, name: &str) -> PathBuf {
        self.raw.join(name)
    }

    pub fn processed_file(&self, name: &str) -> PathBuf {
        self.processed.join(name)
    }
}

/// Variant row as written to a fixture file:
/// (CHROM, POS, REF, ALT, sample cell)
pub type FixtureRow<'a> = (&'a str, i64, &'a str, &'a str, &'a str);

/// Write a fixture file with two metadata lines, a header naming `sample`,
/// and one line per row
pub fn write_vcf(dir: &Path, name: &str, sample: &str, rows: &[FixtureRow<'_>]) -> Result<PathBuf> {
    let mut text = String::from("##fileformat=VCFv4.2\n##source=vcfdb-tests\n");
    text.push_str(&format!("{HEADER}\t{sample}\n"));
    for (chrom, pos, reference, alt, cell) in rows {
        text.push_str(&format!("{chrom}\t{pos}\t.\t{reference}\t{alt}\t{cell}\n"));
    }

    let path = dir.join(name);
    std::fs::write(&path, text)?;
    Ok(path)
}

pub fn pipeline(store: &VariantStore, dirs: &TestDirs, version: &str) -> IngestPipeline {
    IngestPipeline::new(store.clone(), dirs.config(), version)
}
