//! Pipeline orchestration
//!
//! Drives extract -> transform -> load record by record, so a large source is
//! never materialized in memory. Records stay in extraction order all the way
//! into batches. Counters have a single writer (the pipeline itself) and are
//! read once the run has finalized.
//!
//! State machine: `Idle -> Extracting -> Processing -> Finalized`, forward
//! only. A fatal extraction failure jumps straight to `Finalized` with
//! partial stats; the report then carries a non-success outcome.

use crate::api::client::AnimalApiClient;
use crate::config::EtlConfig;
use crate::extract::Extractor;
use crate::load::{Batcher, Loader};
use crate::model::Animal;
use crate::transform::Transformer;
use futures::StreamExt;
use homeward_common::{HomewardError, Result};
use serde::Serialize;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Pipeline lifecycle state, forward-only
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Idle,
    Extracting,
    Processing,
    Finalized,
}

/// Running counters for one pipeline run
#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineStats {
    /// Raw records produced by extraction
    pub extracted: u64,
    /// Records skipped because their detail fetch failed
    pub detail_failed: u64,
    /// Records that passed transformation
    pub transformed: u64,
    /// Records rejected by validation
    pub transform_failed: u64,
    /// Records accepted by the destination (or counted in dry-run)
    pub loaded: u64,
    /// Records in batches whose submission failed
    pub load_failed: u64,
    /// Batches accepted (or counted in dry-run)
    pub batches_submitted: u64,
    /// Batches that failed after exhausting retries
    pub batches_failed: u64,
}

impl PipelineStats {
    /// Share of extracted records that ended up loaded, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.extracted == 0 {
            0.0
        } else {
            (self.loaded as f64 / self.extracted as f64) * 100.0
        }
    }
}

/// Outcome of one pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub stats: PipelineStats,
    /// Extraction failed fatally; the record set is incomplete
    pub aborted: bool,
    /// The run was cancelled from outside
    pub cancelled: bool,
    /// Dry-run mode was active
    pub dry_run: bool,
    pub duration: Duration,
}

impl PipelineReport {
    /// Whether the run finished completely with nothing failed to load
    pub fn is_success(&self) -> bool {
        !self.aborted && !self.cancelled && self.stats.load_failed == 0
    }
}

/// Orchestrates one extract-transform-load run
pub struct Pipeline {
    config: EtlConfig,
    client: AnimalApiClient,
    state: PipelineState,
    stats: PipelineStats,
}

impl Pipeline {
    /// Create a pipeline from a validated configuration
    pub fn new(config: EtlConfig) -> Result<Self> {
        let client = AnimalApiClient::new(&config.base_url, config.timeout)?;

        Ok(Self {
            config,
            client,
            state: PipelineState::Idle,
            stats: PipelineStats::default(),
        })
    }

    /// Current lifecycle state
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Counters so far; stable once the run has finalized
    pub fn stats(&self) -> &PipelineStats {
        &self.stats
    }

    /// Run the pipeline to completion
    ///
    /// Consumes the pipeline: a traversal is not restartable, so neither is a
    /// run. Cancellation is honored between records and between batches; an
    /// in-flight submission always completes.
    pub async fn run(mut self, cancel: CancellationToken) -> PipelineReport {
        let started = Instant::now();
        info!(
            base_url = %self.config.base_url,
            batch_size = self.config.batch_size,
            max_retries = self.config.max_retries,
            dry_run = self.config.dry_run,
            "Starting pipeline"
        );

        self.advance(PipelineState::Extracting);

        let policy = self.config.retry_policy();
        let extractor = Extractor::new(self.client.clone(), policy.clone());
        let transformer = Transformer::new(self.config.strict_timestamps);
        let loader = Loader::new(self.client.clone(), policy);
        let mut batcher = Batcher::new(self.config.batch_size);
        let mut abort: Option<HomewardError> = None;

        let mut records = Box::pin(extractor.records());

        while let Some(item) = records.next().await {
            if cancel.is_cancelled() {
                info!("Cancellation requested, stopping before the next record");
                break;
            }

            match item {
                Ok(raw) => {
                    self.advance(PipelineState::Processing);
                    self.stats.extracted += 1;

                    match transformer.transform(&raw) {
                        Ok(animal) => {
                            self.stats.transformed += 1;
                            if let Some(batch) = batcher.push(animal) {
                                self.dispatch(&loader, batch).await;
                            }
                        }
                        Err(err) => {
                            self.stats.transform_failed += 1;
                            warn!(error = %err, "Record dropped by validation");
                        }
                    }
                }
                Err(err @ HomewardError::ExtractionFailed { .. }) => {
                    error!(error = %err, "Extraction aborted");
                    abort = Some(err);
                    break;
                }
                Err(_) => {
                    // Detail fetch failed for one record; already logged by
                    // the extractor.
                    self.stats.detail_failed += 1;
                }
            }
        }

        if abort.is_none() && !cancel.is_cancelled() {
            if let Some(batch) = batcher.finish() {
                self.dispatch(&loader, batch).await;
            }
        }

        self.advance(PipelineState::Finalized);

        let report = PipelineReport {
            stats: self.stats.clone(),
            aborted: abort.is_some(),
            cancelled: cancel.is_cancelled(),
            dry_run: self.config.dry_run,
            duration: started.elapsed(),
        };

        info!(
            extracted = report.stats.extracted,
            detail_failed = report.stats.detail_failed,
            transformed = report.stats.transformed,
            transform_failed = report.stats.transform_failed,
            loaded = report.stats.loaded,
            load_failed = report.stats.load_failed,
            batches_submitted = report.stats.batches_submitted,
            batches_failed = report.stats.batches_failed,
            success_rate = report.stats.success_rate(),
            duration_secs = report.duration.as_secs_f64(),
            aborted = report.aborted,
            dry_run = report.dry_run,
            "Pipeline summary"
        );

        report
    }

    /// Hand one batch to the loader, or count it in dry-run mode.
    async fn dispatch(&mut self, loader: &Loader, batch: Vec<Animal>) {
        let batch_number = self.stats.batches_submitted + self.stats.batches_failed + 1;

        if self.config.dry_run {
            info!(
                batch = batch_number,
                records = batch.len(),
                "Dry run, batch assembled but not submitted"
            );
            self.stats.batches_submitted += 1;
            self.stats.loaded += batch.len() as u64;
            return;
        }

        match loader.submit(batch_number, &batch).await {
            Ok(()) => {
                self.stats.batches_submitted += 1;
                self.stats.loaded += batch.len() as u64;
            }
            Err(err) => {
                self.stats.batches_failed += 1;
                self.stats.load_failed += batch.len() as u64;
                error!(
                    batch = batch_number,
                    records = batch.len(),
                    error = %err,
                    "Batch failed, continuing with the next one"
                );
            }
        }
    }

    fn advance(&mut self, next: PipelineState) {
        if self.state < next {
            debug!(from = ?self.state, to = ?next, "Pipeline state");
            self.state = next;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_states_are_ordered() {
        assert!(PipelineState::Idle < PipelineState::Extracting);
        assert!(PipelineState::Extracting < PipelineState::Processing);
        assert!(PipelineState::Processing < PipelineState::Finalized);
    }

    #[test]
    fn test_success_rate() {
        let stats = PipelineStats {
            extracted: 8,
            loaded: 6,
            ..Default::default()
        };
        assert!((stats.success_rate() - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_success_rate_with_no_records() {
        let stats = PipelineStats::default();
        assert_eq!(stats.success_rate(), 0.0);
    }

    #[test]
    fn test_report_success_requires_clean_run() {
        let clean = PipelineReport {
            stats: PipelineStats::default(),
            aborted: false,
            cancelled: false,
            dry_run: false,
            duration: Duration::from_secs(1),
        };
        assert!(clean.is_success());

        let mut failed_loads = clean.clone();
        failed_loads.stats.load_failed = 4;
        assert!(!failed_loads.is_success());

        let mut aborted = clean.clone();
        aborted.aborted = true;
        assert!(!aborted.is_success());

        let mut cancelled = clean;
        cancelled.cancelled = true;
        assert!(!cancelled.is_success());
    }

    #[test]
    fn test_pipeline_starts_idle() {
        let pipeline = Pipeline::new(EtlConfig::default()).unwrap();
        assert_eq!(pipeline.state(), PipelineState::Idle);
        assert_eq!(pipeline.stats().extracted, 0);
    }
}
