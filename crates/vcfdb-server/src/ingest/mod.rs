//! Variant file ingestion
//!
//! # Architecture
//!
//! - **parser**: header validation, file id lookup, row extraction
//! - **resolver**: insert / skip / update decision from the file id alone
//! - **pipeline**: the per-file state machine and batch runner
//! - **archive**: moving files between the intake and processed areas
//! - **config**: intake/processed directories and the version tag override
//!
//! Storage goes through [`crate::db::VariantStore`]; nothing here issues SQL.

pub mod archive;
pub mod config;
pub mod error;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod resolver;

pub use config::IngestConfig;
pub use error::{IngestError, IngestResult};
pub use models::{
    BatchReport, FileFailure, FileState, IngestAction, IngestOutcome, ParsedVcf,
    RequeueReport,
};
pub use parser::{parse_file, read_file_id, VcfParser};
pub use pipeline::{BatchObserver, IngestPipeline};
pub use resolver::{resolve, resolve_ingest_version, schema_version_tag};
