//! vcfdb Server Library
//!
//! Ingests tab-separated variant files into a relational store and answers
//! occurrence lookups over HTTP.
//!
//! # Overview
//!
//! - **Storage**: SQLite through SQLx, with in-process schema migrations
//! - **Ingestion**: header check, insert/skip/update decision per file id,
//!   one transaction per file, archival of stored files
//! - **API**: count and genotype-breakdown lookups by chromosome/position
//! - **Configuration**: environment-based, see [`config::Config::load`]
//!
//! # Example
//!
//! ```no_run
//! use vcfdb_server::{config::Config, db, ingest::IngestPipeline};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let pool = db::create_pool(&(&config.database).into()).await?;
//!     db::run_migrations(&pool).await?;
//!
//!     let store = db::VariantStore::new(pool);
//!     let pipeline = IngestPipeline::connect(store, config.ingest.clone()).await?;
//!     let report = pipeline.run_batch().await?;
//!     println!("{} inserted", report.inserted());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod features;
pub mod ingest;
pub mod middleware;

// Re-export commonly used types
pub use error::{AppError, AppResult};
