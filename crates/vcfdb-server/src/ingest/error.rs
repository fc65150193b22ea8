//! Per-file ingestion failures

use std::path::PathBuf;

use crate::db::DbError;

pub type IngestResult<T> = std::result::Result<T, IngestError>;

/// Why a source file could not be ingested.
///
/// Every variant names the file. Apart from connection-level storage failures
/// (see [`IngestError::is_connection_failure`]) these only fail the file they
/// name; a batch moves on to the next one and the file stays in the intake
/// area.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("{file}: header must be #CHROM, POS, ID, REF, ALT, ..., <sample>: {reason}")]
    HeaderFormat { file: PathBuf, reason: String },

    #[error("{file}: no variant rows would be written")]
    EmptyWrite { file: PathBuf },

    #[error("{file}: parsed {parsed} rows but {stored} are stored for file id '{file_id}'")]
    RecordCountMismatch {
        file: PathBuf,
        file_id: String,
        parsed: usize,
        stored: usize,
    },

    #[error("{file}: line {line}: {reason}")]
    MalformedRow {
        file: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("{file}: storage error: {source}")]
    Storage {
        file: PathBuf,
        #[source]
        source: DbError,
    },

    #[error("{file}: {source}")]
    Io {
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IngestError {
    pub fn header(file: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::HeaderFormat {
            file: file.into(),
            reason: reason.into(),
        }
    }

    pub fn storage(file: impl Into<PathBuf>, source: DbError) -> Self {
        // Fewer rows written than supplied is the empty-write case, whatever
        // layer noticed it.
        match source {
            DbError::ShortWrite { .. } => Self::EmptyWrite { file: file.into() },
            source => Self::Storage {
                file: file.into(),
                source,
            },
        }
    }

    pub fn io(file: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            file: file.into(),
            source,
        }
    }

    /// The file this error is about
    pub fn file(&self) -> &std::path::Path {
        match self {
            Self::HeaderFormat { file, .. }
            | Self::EmptyWrite { file }
            | Self::RecordCountMismatch { file, .. }
            | Self::MalformedRow { file, .. }
            | Self::Storage { file, .. }
            | Self::Io { file, .. } => file,
        }
    }

    /// True when the store itself is unreachable, as opposed to this one file
    /// being rejected. A batch stops at the first such error.
    pub fn is_connection_failure(&self) -> bool {
        match self {
            Self::Storage { source, .. } => match source {
                DbError::Sqlx(err) => matches!(
                    err,
                    sqlx::Error::Io(_)
                        | sqlx::Error::Tls(_)
                        | sqlx::Error::Configuration(_)
                        | sqlx::Error::PoolTimedOut
                        | sqlx::Error::PoolClosed
                        | sqlx::Error::WorkerCrashed
                ),
                DbError::Config(_) => true,
                DbError::Migration(_) | DbError::ShortWrite { .. } => false,
            },
            _ => false,
        }
    }
}
