//! Homeward Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared error taxonomy and logging setup for the Homeward workspace.
//!
//! # Overview
//!
//! This crate provides functionality used across all Homeward workspace
//! members:
//!
//! - **Error Handling**: the failure taxonomy of the ETL pipeline
//!   (transport, HTTP status, validation, retry exhaustion) plus the usual
//!   ambient error sources
//! - **Logging**: `tracing`-based structured logging with console and file
//!   targets
//!
//! # Example
//!
//! ```no_run
//! use homeward_common::{HomewardError, Result};
//!
//! fn classify(err: &HomewardError) -> &'static str {
//!     if err.is_transient() { "retry" } else { "give up" }
//! }
//! ```

pub mod error;
pub mod logging;

// Re-export commonly used types
pub use error::{HomewardError, Result};
