//! Batch runner integration tests

mod common;

use anyhow::Result;
use std::path::{Path, PathBuf};
use common::{init_tracing, memory_store, pipeline, write_vcf, TestDirs};
use vcfdb_common::Locus;
use vcfdb_server::ingest::{BatchObserver, IngestAction, IngestOutcome, IngestResult};

#[derive(Default)]
struct Recorder {
    total: Option<usize>,
    seen: Vec<PathBuf>,
}

impl BatchObserver for Recorder {
    fn on_start(&mut self, total: usize) {
        self.total = Some(total);
    }

    fn on_file(&mut self, file: &Path, _result: &IngestResult<IngestOutcome>) {
        self.seen.push(file.to_path_buf());
    }
}

#[tokio::test]
async fn test_batch_isolates_failures() -> Result<()> {
    init_tracing();
    let store = memory_store().await?;
    let dirs = TestDirs::new()?;

    write_vcf(&dirs.raw, "b.vcf", "sampleB", &[("chr1", 5, "A", "G", "1/1")])?;
    write_vcf(&dirs.raw, "a.vcf", "sampleA", &[("chr1", 5, "A", "G", "0/1")])?;
    std::fs::write(dirs.raw_file("broken.vcf"), "no header here\n")?;
    std::fs::write(dirs.raw_file("notes.txt"), "ignored")?;
    std::fs::create_dir(dirs.raw_file("nested"))?;
    write_vcf(&dirs.raw.join("nested"), "deep.vcf", "sampleDeep", &[("chr1", 5, "A", "G", "0/1")])?;

    let mut recorder = Recorder::default();
    let report = pipeline(&store, &dirs, "v1")
        .run_batch_with(&mut recorder)
        .await?;

    assert_eq!(report.discovered, 3);
    assert_eq!(report.inserted(), 2);
    assert_eq!(report.failed(), 1);
    assert!(!report.is_aborted());
    assert!(report.failures[0].message.contains("broken.vcf"));

    assert_eq!(recorder.total, Some(3));
    let order: Vec<_> = recorder
        .seen
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(order, vec!["a.vcf", "b.vcf", "broken.vcf"]);

    assert!(dirs.processed_file("a.vcf").exists());
    assert!(dirs.processed_file("b.vcf").exists());
    assert!(dirs.raw_file("broken.vcf").exists());
    assert!(dirs.raw_file("notes.txt").exists());
    assert!(dirs.raw.join("nested").join("deep.vcf").exists());
    assert!(!store.exists("sampleDeep").await?);

    assert_eq!(store.query_by_position(&Locus::new("chr1", 5)).await?, 2);

    Ok(())
}

#[tokio::test]
async fn test_second_batch_skips_duplicates() -> Result<()> {
    let store = memory_store().await?;
    let dirs = TestDirs::new()?;
    let pipeline = pipeline(&store, &dirs, "v1");

    write_vcf(&dirs.raw, "s1.vcf", "sample1", &[("chr2", 9, "C", "T", "0/1")])?;
    pipeline.run_batch().await?;

    write_vcf(&dirs.raw, "s1-copy.vcf", "sample1", &[("chr2", 9, "C", "T", "0/1")])?;
    let report = pipeline.run_batch().await?;

    assert_eq!(report.inserted(), 0);
    let skipped: Vec<_> = report.skipped().collect();
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].action, IngestAction::Skip);
    assert!(dirs.raw_file("s1-copy.vcf").exists());
    assert_eq!(store.query_by_position(&Locus::new("chr2", 9)).await?, 1);

    Ok(())
}

#[tokio::test]
async fn test_batch_creates_missing_dirs() -> Result<()> {
    let store = memory_store().await?;
    let dirs = TestDirs::new()?;
    std::fs::remove_dir(&dirs.raw)?;

    let report = pipeline(&store, &dirs, "v1").run_batch().await?;

    assert_eq!(report.discovered, 0);
    assert!(dirs.raw.is_dir());
    assert!(dirs.processed.is_dir());

    Ok(())
}

#[tokio::test]
async fn test_unreachable_store_aborts_batch() -> Result<()> {
    let store = memory_store().await?;
    let dirs = TestDirs::new()?;

    write_vcf(&dirs.raw, "a.vcf", "sampleA", &[("chr1", 1, "A", "C", "0/1")])?;
    write_vcf(&dirs.raw, "b.vcf", "sampleB", &[("chr1", 1, "A", "C", "0/1")])?;
    store.pool().close().await;

    let mut recorder = Recorder::default();
    let report = pipeline(&store, &dirs, "v1")
        .run_batch_with(&mut recorder)
        .await?;

    assert!(report.is_aborted());
    assert_eq!(recorder.seen.len(), 1);
    assert!(report.outcomes.is_empty());
    assert!(report.failures.is_empty());
    assert!(dirs.raw_file("a.vcf").exists());
    assert!(dirs.raw_file("b.vcf").exists());

    Ok(())
}

#[tokio::test]
async fn test_requeue_then_reingest_under_new_version() -> Result<()> {
    init_tracing();
    let store = memory_store().await?;
    let dirs = TestDirs::new()?;

    let rows = [("chr4", 40, "G", "A", "0/1"), ("chr4", 41, "G", "C", "1/1")];
    write_vcf(&dirs.raw, "s1.vcf", "sample1", &rows)?;
    pipeline(&store, &dirs, "v1").run_batch().await?;
    let ids = store.record_ids("sample1").await?;

    let upgraded = pipeline(&store, &dirs, "v2");
    let requeued = upgraded.requeue_processed().await?;
    assert_eq!(requeued.moved, vec![dirs.raw_file("s1.vcf")]);
    assert!(requeued.conflicts.is_empty());
    assert!(!dirs.processed_file("s1.vcf").exists());

    let report = upgraded.run_batch().await?;
    assert_eq!(report.updated(), 1);
    assert_eq!(store.record_ids("sample1").await?, ids);
    assert_eq!(
        store.get("sample1").await?.and_then(|f| f.version).as_deref(),
        Some("v2")
    );
    assert!(dirs.processed_file("s1.vcf").exists());

    Ok(())
}

#[tokio::test]
async fn test_requeue_without_processed_dir() -> Result<()> {
    let store = memory_store().await?;
    let dirs = TestDirs::new()?;

    let requeued = pipeline(&store, &dirs, "v1").requeue_processed().await?;
    assert!(requeued.moved.is_empty());
    assert!(requeued.conflicts.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_requeue_never_replaces_pending_intake_file() -> Result<()> {
    let store = memory_store().await?;
    let dirs = TestDirs::new()?;
    std::fs::create_dir_all(&dirs.processed)?;
    std::fs::write(dirs.processed_file("s1.vcf"), "processed copy")?;
    std::fs::write(dirs.processed_file("s2.vcf"), "processed only")?;
    std::fs::write(dirs.raw_file("s1.vcf"), "pending intake file")?;

    let requeued = pipeline(&store, &dirs, "v1").requeue_processed().await?;

    assert_eq!(requeued.moved, vec![dirs.raw_file("s2.vcf")]);
    assert_eq!(requeued.conflicts, vec![dirs.processed_file("s1.vcf")]);
    assert_eq!(
        std::fs::read_to_string(dirs.raw_file("s1.vcf"))?,
        "pending intake file"
    );
    assert_eq!(
        std::fs::read_to_string(dirs.processed_file("s1.vcf"))?,
        "processed copy"
    );

    Ok(())
}
