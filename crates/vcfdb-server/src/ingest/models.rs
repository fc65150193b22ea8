//! Ingestion state and outcome types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::db::{FileRecord, VariantRow};

/// A fully parsed source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedVcf {
    /// Sample column name from the header row
    pub file_id: String,
    /// Data rows in file order
    pub rows: Vec<VariantRow>,
}

/// What the store already knows about a file id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FileState {
    NotSeen,
    SeenCurrentVersion,
    SeenStaleVersion { stored_version: Option<String> },
}

impl FileState {
    /// Compare a stored file row, if any, against the active version tag
    pub fn classify(existing: Option<&FileRecord>, active_version: &str) -> Self {
        match existing {
            None => Self::NotSeen,
            Some(record) if record.version.as_deref() == Some(active_version) => {
                Self::SeenCurrentVersion
            }
            Some(record) => Self::SeenStaleVersion {
                stored_version: record.version.clone(),
            },
        }
    }

    pub fn action(&self) -> IngestAction {
        match self {
            Self::NotSeen => IngestAction::Insert,
            Self::SeenCurrentVersion => IngestAction::Skip,
            Self::SeenStaleVersion { .. } => IngestAction::Upsert,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestAction {
    Insert,
    Skip,
    Upsert,
}

impl std::fmt::Display for IngestAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestAction::Insert => write!(f, "inserted"),
            IngestAction::Skip => write!(f, "skipped"),
            IngestAction::Upsert => write!(f, "updated"),
        }
    }
}

/// Result of handling one source file without error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestOutcome {
    /// Source path as it was found in the intake area
    pub file: PathBuf,
    pub file_id: String,
    pub action: IngestAction,
    /// Variant rows written (zero for skips)
    pub rows: u64,
    /// Whether the file now sits in the processed area. Always false for
    /// skips; false after a commit means the move failed.
    pub archived: bool,
}

/// A file that failed, with the reason as shown to operators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFailure {
    pub file: PathBuf,
    pub message: String,
}

/// Summary of a batch run over the intake area
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    /// Candidate files found in the intake area
    pub discovered: usize,
    pub outcomes: Vec<IngestOutcome>,
    pub failures: Vec<FileFailure>,
    /// Set when a connection-level failure stopped the batch early
    pub aborted: Option<FileFailure>,
    pub elapsed: Duration,
}

impl BatchReport {
    fn count(&self, action: IngestAction) -> usize {
        self.outcomes.iter().filter(|o| o.action == action).count()
    }

    pub fn inserted(&self) -> usize {
        self.count(IngestAction::Insert)
    }

    pub fn updated(&self) -> usize {
        self.count(IngestAction::Upsert)
    }

    pub fn skipped(&self) -> impl Iterator<Item = &IngestOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.action == IngestAction::Skip)
    }

    /// Files that were stored but could not be moved afterwards
    pub fn unarchived(&self) -> impl Iterator<Item = &IngestOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.action != IngestAction::Skip && !o.archived)
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.is_some()
    }
}

/// Result of moving processed files back to the intake area
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequeueReport {
    /// New paths in the intake area
    pub moved: Vec<PathBuf>,
    /// Processed files left where they are because the intake area already
    /// holds a file of the same name
    pub conflicts: Vec<PathBuf>,
}
