//! Error types for the Homeward CLI
//!
//! User-facing errors: what went wrong and, where it helps, what to do about
//! it. Pipeline-internal failures carry their own messages and pass through.

use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Error type for CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    /// A pipeline or configuration failure, already descriptive
    #[error("{0}")]
    Etl(#[from] homeward_common::HomewardError),

    /// The run was interrupted (ctrl-c) before completion
    #[error("Run interrupted before completion")]
    Interrupted,

    /// Extraction failed fatally, so the record set is incomplete
    #[error("Extraction aborted; the record set is incomplete. Check that the animal API is reachable and retry.")]
    Aborted,

    /// Some batches exhausted their retries
    #[error("{records} record(s) in {batches} batch(es) failed to load")]
    LoadsFailed { records: u64, batches: u64 },

    /// Generic anyhow error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
