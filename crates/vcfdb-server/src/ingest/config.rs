//! Ingestion configuration
//!
//! Where source files are picked up from, where they go once stored, and which
//! version tag new writes carry.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default intake (staging) directory.
pub const DEFAULT_RAW_DIR: &str = "data/raw";

/// Default directory for files that have been stored.
pub const DEFAULT_PROCESSED_DIR: &str = "data/processed";

/// Default extension of files picked up by a batch.
pub const DEFAULT_FILE_EXTENSION: &str = "vcf";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Intake area scanned by a batch (not recursive)
    pub raw_dir: PathBuf,
    /// Destination for successfully stored files
    pub processed_dir: PathBuf,
    /// Extension without the leading dot
    pub extension: String,
    /// Version tag override. When unset the tag is derived from the schema
    /// version, see [`crate::ingest::resolve_ingest_version`].
    pub version: Option<String>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            raw_dir: PathBuf::from(DEFAULT_RAW_DIR),
            processed_dir: PathBuf::from(DEFAULT_PROCESSED_DIR),
            extension: DEFAULT_FILE_EXTENSION.to_string(),
            version: None,
        }
    }
}

impl IngestConfig {
    /// Read `VCFDB_RAW_DIR`, `VCFDB_PROCESSED_DIR`, `VCFDB_FILE_EXTENSION` and
    /// `VCFDB_INGEST_VERSION`, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            raw_dir: std::env::var("VCFDB_RAW_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.raw_dir),
            processed_dir: std::env::var("VCFDB_PROCESSED_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.processed_dir),
            extension: std::env::var("VCFDB_FILE_EXTENSION")
                .map(|ext| ext.trim().trim_start_matches('.').to_string())
                .unwrap_or(defaults.extension),
            version: std::env::var("VCFDB_INGEST_VERSION")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
        }
    }

    pub fn with_dirs(
        mut self,
        raw_dir: impl Into<PathBuf>,
        processed_dir: impl Into<PathBuf>,
    ) -> Self {
        self.raw_dir = raw_dir.into();
        self.processed_dir = processed_dir.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.extension.is_empty() {
            anyhow::bail!("File extension cannot be empty");
        }

        if self.raw_dir == self.processed_dir {
            anyhow::bail!(
                "Intake and processed directories must differ (both are {})",
                self.raw_dir.display()
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_defaults() {
        let config = IngestConfig::default();
        assert_eq!(config.raw_dir, PathBuf::from("data/raw"));
        assert_eq!(config.processed_dir, PathBuf::from("data/processed"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_same_dirs_rejected() {
        let config = IngestConfig::default().with_dirs("data", "data");
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_from_env() {
        std::env::set_var("VCFDB_RAW_DIR", "/tmp/in");
        std::env::set_var("VCFDB_FILE_EXTENSION", ".tsv");
        std::env::set_var("VCFDB_INGEST_VERSION", " release-7 ");

        let config = IngestConfig::from_env();
        assert_eq!(config.raw_dir, PathBuf::from("/tmp/in"));
        assert_eq!(config.extension, "tsv");
        assert_eq!(config.version.as_deref(), Some("release-7"));

        std::env::remove_var("VCFDB_RAW_DIR");
        std::env::remove_var("VCFDB_FILE_EXTENSION");
        std::env::remove_var("VCFDB_INGEST_VERSION");
    }
}
