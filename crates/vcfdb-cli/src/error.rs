//! Error types for the vcfdb CLI
//!
//! Messages are shown to operators as-is, so each one says what to check next.

use thiserror::Error;
use vcfdb_common::VcfdbError;
use vcfdb_server::db::DbError;
use vcfdb_server::ingest::IngestError;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    /// Storage could not be opened, migrated or queried
    #[error("{0}")]
    Database(#[from] DbError),

    /// Ingestion failed outside of a single file, e.g. the intake area is unreadable
    #[error("{0}")]
    Ingest(#[from] IngestError),

    /// A connection-level failure stopped the batch before every file was seen
    #[error("Batch aborted: {0}. Check that the database is reachable and run 'vcfdb add' again.")]
    BatchAborted(String),

    /// Lookup parameters were missing or malformed
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration is missing or invalid
    #[error("Configuration error: {0}. Check your environment variables or .env file.")]
    Config(String),

    /// Interactive prompt failed or was cancelled
    #[error("Prompt failed: {0}")]
    Prompt(#[from] inquire::InquireError),

    /// File system operation failed
    #[error("File operation failed: {0}. Check file permissions and disk space.")]
    Io(#[from] std::io::Error),

    /// Generic anyhow error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

impl From<VcfdbError> for CliError {
    fn from(err: VcfdbError) -> Self {
        match err {
            VcfdbError::InvalidInput(msg) => Self::InvalidInput(msg),
            VcfdbError::Config(msg) => Self::Config(msg),
            VcfdbError::Io(e) => Self::Io(e),
            other => Self::Other(anyhow::Error::new(other)),
        }
    }
}
