//! vcfdb Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, logging, and error handling for the vcfdb workspace.
//!
//! # Overview
//!
//! - **Error Handling**: [`VcfdbError`] and the [`Result`] alias
//! - **Logging**: tracing subscriber setup shared by the server and the CLI
//! - **Types**: [`Locus`] lookups and [`GenotypeClass`] zygosity buckets
//!
//! # Example
//!
//! ```no_run
//! use vcfdb_common::{Locus, Result};
//!
//! fn lookup(chr: Option<&str>, pos: Option<&str>) -> Result<Locus> {
//!     Locus::from_params(chr, pos)
//! }
//! ```

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{Result, VcfdbError};
pub use types::{GenotypeClass, Locus};
