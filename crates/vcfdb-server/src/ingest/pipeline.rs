// Ingestion engine
//
// Per file:
// 1. Read the header for the file id
// 2. Resolve it against the store: not seen, seen at this version, or stale
// 3. Insert, skip, or overwrite in place, one transaction per file
// 4. Move the file to the processed area once committed (best effort)
//
// A batch walks the intake area in name order and keeps going after per-file
// failures. Only an unreachable store stops it.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};

use super::archive;
use super::config::IngestConfig;
use super::error::{IngestError, IngestResult};
use super::models::{
    BatchReport, FileFailure, FileState, IngestAction, IngestOutcome, RequeueReport,
};
use super::parser;
use super::resolver;
use crate::db::{DbResult, FileRecord, VariantRow, VariantStore};

/// Hooks for reporting batch progress as it happens
pub trait BatchObserver {
    fn on_start(&mut self, _total: usize) {}
    fn on_file(&mut self, _file: &Path, _result: &IngestResult<IngestOutcome>) {}
}

impl BatchObserver for () {}

pub struct IngestPipeline {
    store: VariantStore,
    config: IngestConfig,
    version: String,
}

impl IngestPipeline {
    /// Create a pipeline that stamps writes with `version`
    pub fn new(store: VariantStore, config: IngestConfig, version: impl Into<String>) -> Self {
        Self {
            store,
            config,
            version: version.into(),
        }
    }

    /// Create a pipeline whose version tag comes from the configuration
    /// override or, failing that, the database's schema version
    pub async fn connect(store: VariantStore, config: IngestConfig) -> DbResult<Self> {
        let version = resolver::resolve_ingest_version(&store, config.version.as_deref()).await?;
        info!(version = %version, "Ingestion version resolved");
        Ok(Self::new(store, config, version))
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    pub fn store(&self) -> &VariantStore {
        &self.store
    }

    /// Ingest one source file.
    ///
    /// Skips are `Ok` with [`IngestAction::Skip`] and leave the file where it
    /// is. On error nothing is committed and the file is not moved.
    pub async fn ingest_file(&self, path: &Path) -> IngestResult<IngestOutcome> {
        let file_id = blocking(path, parser::read_file_id).await?;

        let state = resolver::resolve(&self.store, &file_id, &self.version)
            .await
            .map_err(|e| IngestError::storage(path, e))?;
        let action = state.action();

        let rows = match state {
            FileState::NotSeen => self.insert(path, &file_id).await?,
            FileState::SeenCurrentVersion => {
                info!(
                    file = %path.display(),
                    file_id = %file_id,
                    version = %self.version,
                    "File id already stored at this version, skipping; file left in place"
                );
                return Ok(IngestOutcome {
                    file: path.to_path_buf(),
                    file_id,
                    action: IngestAction::Skip,
                    rows: 0,
                    archived: false,
                });
            }
            FileState::SeenStaleVersion { stored_version } => {
                debug!(
                    file_id = %file_id,
                    stored_version = ?stored_version,
                    version = %self.version,
                    "Stored version is stale"
                );
                self.upsert(path, &file_id).await?
            }
        };

        info!(
            file = %path.display(),
            file_id = %file_id,
            version = %self.version,
            rows,
            action = %action,
            "File ingested"
        );

        let archived = self.archive(path).await;

        Ok(IngestOutcome {
            file: path.to_path_buf(),
            file_id,
            action,
            rows,
            archived,
        })
    }

    async fn insert(&self, path: &Path, file_id: &str) -> IngestResult<u64> {
        let parsed = blocking(path, parser::parse_file).await?;
        if parsed.rows.is_empty() {
            return Err(IngestError::EmptyWrite {
                file: path.to_path_buf(),
            });
        }

        let record = FileRecord {
            file_id: file_id.to_string(),
            file_name: file_name(path),
            version: Some(self.version.clone()),
        };

        self.store
            .bulk_insert(&record, &parsed.rows)
            .await
            .map_err(|e| IngestError::storage(path, e))
    }

    /// Overwrite stored rows positionally: the n-th parsed row replaces the
    /// n-th stored row of this file id
    async fn upsert(&self, path: &Path, file_id: &str) -> IngestResult<u64> {
        let parsed = blocking(path, parser::parse_file).await?;
        if parsed.rows.is_empty() {
            return Err(IngestError::EmptyWrite {
                file: path.to_path_buf(),
            });
        }

        let record_ids = self
            .store
            .record_ids(file_id)
            .await
            .map_err(|e| IngestError::storage(path, e))?;

        if record_ids.len() != parsed.rows.len() {
            return Err(IngestError::RecordCountMismatch {
                file: path.to_path_buf(),
                file_id: file_id.to_string(),
                parsed: parsed.rows.len(),
                stored: record_ids.len(),
            });
        }

        let pairs: Vec<(i64, VariantRow)> = record_ids.into_iter().zip(parsed.rows).collect();

        self.store
            .bulk_update(file_id, &self.version, &pairs)
            .await
            .map_err(|e| IngestError::storage(path, e))
    }

    /// Move a committed file to the processed area. Failure is logged and
    /// reported as `false`; the stored rows stay.
    async fn archive(&self, path: &Path) -> bool {
        match move_to(path, &self.config.processed_dir).await {
            Ok(target) => {
                debug!(file = %path.display(), target = %target.display(), "File archived");
                true
            }
            Err(e) => {
                warn!(
                    file = %path.display(),
                    processed_dir = %self.config.processed_dir.display(),
                    error = %e,
                    "File stored but could not be moved to the processed area"
                );
                false
            }
        }
    }

    /// Ingest every candidate file in the intake area
    pub async fn run_batch(&self) -> IngestResult<BatchReport> {
        self.run_batch_with(&mut ()).await
    }

    pub async fn run_batch_with<O: BatchObserver>(
        &self,
        observer: &mut O,
    ) -> IngestResult<BatchReport> {
        let started = Instant::now();

        for dir in [&self.config.raw_dir, &self.config.processed_dir] {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| IngestError::io(dir, e))?;
        }

        let files = archive::list_files(&self.config.raw_dir, &self.config.extension)
            .await
            .map_err(|e| IngestError::io(&self.config.raw_dir, e))?;

        info!(
            raw_dir = %self.config.raw_dir.display(),
            extension = %self.config.extension,
            files = files.len(),
            version = %self.version,
            "Starting ingestion batch; sub-directories are not processed"
        );

        observer.on_start(files.len());

        let mut report = BatchReport {
            discovered: files.len(),
            ..Default::default()
        };

        for path in &files {
            let result = self.ingest_file(path).await;
            observer.on_file(path, &result);

            match result {
                Ok(outcome) => report.outcomes.push(outcome),
                Err(err) if err.is_connection_failure() => {
                    error!(
                        file = %path.display(),
                        error = %err,
                        "Store unreachable, stopping batch"
                    );
                    report.aborted = Some(FileFailure {
                        file: path.clone(),
                        message: err.to_string(),
                    });
                    break;
                }
                Err(err) => {
                    error!(file = %path.display(), error = %err, "File ingestion failed");
                    report.failures.push(FileFailure {
                        file: path.clone(),
                        message: err.to_string(),
                    });
                }
            }
        }

        report.elapsed = started.elapsed();

        info!(
            inserted = report.inserted(),
            updated = report.updated(),
            skipped = report.skipped().count(),
            failed = report.failed(),
            aborted = report.is_aborted(),
            elapsed_ms = report.elapsed.as_millis() as u64,
            "Ingestion batch finished"
        );

        Ok(report)
    }

    /// Move every processed file back to the intake area so the next batch
    /// re-ingests it.
    ///
    /// A file whose name is already taken in the intake area is not moved, so
    /// a pending intake file is never replaced by an older processed copy.
    pub async fn requeue_processed(&self) -> IngestResult<RequeueReport> {
        let raw_dir = &self.config.raw_dir;
        let processed_dir = &self.config.processed_dir;

        tokio::fs::create_dir_all(raw_dir)
            .await
            .map_err(|e| IngestError::io(raw_dir, e))?;

        let files = match archive::list_files(processed_dir, &self.config.extension).await {
            Ok(files) => files,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(IngestError::io(processed_dir, e)),
        };

        let mut report = RequeueReport::default();
        for file in files {
            match archive::move_into_new(&file, raw_dir).await {
                Ok(target) => report.moved.push(target),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    warn!(
                        file = %file.display(),
                        raw_dir = %raw_dir.display(),
                        "Intake area already holds a file of this name, leaving processed copy"
                    );
                    report.conflicts.push(file);
                }
                Err(e) => return Err(IngestError::io(&file, e)),
            }
        }

        info!(
            files = report.moved.len(),
            conflicts = report.conflicts.len(),
            raw_dir = %raw_dir.display(),
            "Processed files moved back for re-ingestion"
        );

        Ok(report)
    }
}

async fn move_to(path: &Path, dir: &Path) -> io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    archive::move_into(path, dir).await
}

/// Run blocking file parsing off the async workers
async fn blocking<T, F>(path: &Path, f: F) -> IngestResult<T>
where
    T: Send + 'static,
    F: FnOnce(&Path) -> IngestResult<T> + Send + 'static,
{
    let owned = path.to_path_buf();
    tokio::task::spawn_blocking(move || f(&owned))
        .await
        .map_err(|e| IngestError::io(path, io::Error::other(e)))?
}

/// Stored name of a source file: its final path component
fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_is_last_component() {
        assert_eq!(file_name(Path::new("data/raw/s1.vcf")), "s1.vcf");
        assert_eq!(file_name(Path::new("s2.vcf")), "s2.vcf");
    }
}
