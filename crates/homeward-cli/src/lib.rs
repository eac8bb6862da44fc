//! Homeward CLI Library
//!
//! Command-line interface for the animal records ETL:
//!
//! - **Pipeline Runs**: extract, transform, and load the full record set
//!   (`homeward run`), with a dry-run mode that assembles batches without
//!   submitting them
//! - **Connectivity Checks**: probe the source API and report its pagination
//!   metadata (`homeward probe`)

pub mod commands;
pub mod error;

// Re-export commonly used types
pub use error::{CliError, Result};

use clap::{Parser, Subcommand};
use homeward_etl::config::{
    DEFAULT_BASE_URL, DEFAULT_BATCH_SIZE, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECS,
};

/// Homeward - Animal records ETL
#[derive(Parser, Debug)]
#[command(name = "homeward")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Base URL of the animal API
    #[arg(long, env = "HOMEWARD_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    pub base_url: String,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the extract-transform-load pipeline
    Run {
        /// Records per batch submitted to the home endpoint (1-100)
        #[arg(long, env = "HOMEWARD_BATCH_SIZE", default_value_t = DEFAULT_BATCH_SIZE)]
        batch_size: usize,

        /// Retries after the initial attempt for each network operation
        #[arg(long, env = "HOMEWARD_MAX_RETRIES", default_value_t = DEFAULT_MAX_RETRIES)]
        max_retries: u32,

        /// Per-request timeout in seconds
        #[arg(long, env = "HOMEWARD_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
        timeout: u64,

        /// Assemble and count batches without submitting them
        #[arg(long)]
        dry_run: bool,

        /// Reject records whose birth timestamp cannot be parsed instead of
        /// loading them without one
        #[arg(long)]
        strict_timestamps: bool,
    },

    /// Probe the source API and report its pagination metadata
    Probe,
}
