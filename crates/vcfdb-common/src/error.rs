//! Error types for vcfdb

use thiserror::Error;

/// Result type alias for vcfdb operations
pub type Result<T> = std::result::Result<T, VcfdbError>;

/// Main error type shared across the workspace
#[derive(Error, Debug)]
pub enum VcfdbError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A caller supplied missing or malformed parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl VcfdbError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// True for errors caused by the caller rather than by the system
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}
