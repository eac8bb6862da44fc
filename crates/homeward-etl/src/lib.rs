//! Homeward ETL Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Extract-transform-load pipeline for animal records.
//!
//! # Overview
//!
//! The pipeline walks the paginated animal listing of the source API,
//! enriches each summary through the detail endpoint, normalizes every record
//! into the shape the home endpoint expects, and submits the results in
//! bounded batches:
//!
//! - **Extract**: paginated traversal producing a lazy stream of raw records
//! - **Transform**: per-record validation and field normalization
//! - **Load**: order-preserving batching with partial-failure tolerance
//!
//! Every network call goes through a bounded retry policy with exponential
//! backoff; transient failures (timeouts, 5xx, 429) are retried, permanent
//! ones are not.
//!
//! # Example
//!
//! ```no_run
//! use homeward_etl::{EtlConfig, Pipeline};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> homeward_common::Result<()> {
//!     let config = EtlConfig::from_env()?;
//!     config.validate()?;
//!
//!     let pipeline = Pipeline::new(config)?;
//!     let report = pipeline.run(CancellationToken::new()).await;
//!     println!("loaded {} record(s)", report.stats.loaded);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod extract;
pub mod load;
pub mod model;
pub mod pipeline;
pub mod retry;
pub mod transform;

// Re-export commonly used types
pub use api::client::AnimalApiClient;
pub use config::EtlConfig;
pub use model::{Animal, RawRecord};
pub use pipeline::{Pipeline, PipelineReport, PipelineStats};
pub use retry::RetryPolicy;
