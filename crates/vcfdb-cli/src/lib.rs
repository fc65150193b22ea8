//! vcfdb CLI Library
//!
//! Operator command line for the variant store.
//!
//! # Overview
//!
//! - **Ingestion**: store every file in the intake area (`vcfdb add`)
//! - **Lookups**: list stored variants at a locus (`vcfdb find`)
//! - **Schema**: apply pending migrations (`vcfdb migrate`)
//! - **Re-ingestion**: move processed files back to the intake area (`vcfdb requeue`)

pub mod commands;
pub mod error;
pub mod progress;

// Re-export commonly used types
pub use error::{CliError, Result};

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// vcfdb - variant file database
#[derive(Parser, Debug)]
#[command(name = "vcfdb")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Database connection string
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = vcfdb_server::config::DEFAULT_DATABASE_URL,
        global = true
    )]
    pub database_url: String,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Store every file in the intake area
    #[command(after_help = "Sub-directories of the intake area are not processed.")]
    Add {
        /// Intake directory (defaults to VCFDB_RAW_DIR or data/raw)
        #[arg(long)]
        raw_dir: Option<PathBuf>,

        /// Processed directory (defaults to VCFDB_PROCESSED_DIR or data/processed)
        #[arg(long)]
        processed_dir: Option<PathBuf>,
    },

    /// Find occurrences of a chromosome/position pair across all stored files
    Find {
        /// Chromosome name, e.g. chr1 (prompted for when omitted)
        #[arg(long)]
        chr: Option<String>,

        /// Position (prompted for when omitted)
        #[arg(long)]
        pos: Option<String>,
    },

    /// Apply pending schema migrations
    Migrate,

    /// Move processed files back to the intake area for re-ingestion
    Requeue {
        /// Intake directory (defaults to VCFDB_RAW_DIR or data/raw)
        #[arg(long)]
        raw_dir: Option<PathBuf>,

        /// Processed directory (defaults to VCFDB_PROCESSED_DIR or data/processed)
        #[arg(long)]
        processed_dir: Option<PathBuf>,
    },
}
