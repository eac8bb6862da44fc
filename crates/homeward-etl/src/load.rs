//! Batched loading into the destination API
//!
//! Canonical records accumulate in arrival order into bounded batches; each
//! full batch (and the final partial one) is one POST to the home endpoint.
//! A batch whose submission exhausts its retries is failed as a whole, no
//! splitting or per-record retry, and the run moves on to the next batch.
//!
//! Batching and submission are split so dry-run can assemble and count
//! batches without touching the network: the pipeline gates submission, the
//! loader never does.

use crate::api::client::AnimalApiClient;
use crate::model::Animal;
use crate::retry::RetryPolicy;
use homeward_common::Result;
use std::time::Instant;
use tracing::info;

/// Order-preserving accumulation of records into bounded batches
#[derive(Debug)]
pub struct Batcher {
    capacity: usize,
    buffer: Vec<Animal>,
}

impl Batcher {
    /// Create a batcher; `capacity` must be at least 1
    pub fn new(capacity: usize) -> Self {
        debug_assert!(capacity >= 1);
        Self {
            capacity,
            buffer: Vec::with_capacity(capacity),
        }
    }

    /// Add one record; returns a full batch once `capacity` is reached
    pub fn push(&mut self, animal: Animal) -> Option<Vec<Animal>> {
        self.buffer.push(animal);

        if self.buffer.len() >= self.capacity {
            let batch = std::mem::replace(&mut self.buffer, Vec::with_capacity(self.capacity));
            Some(batch)
        } else {
            None
        }
    }

    /// Drain the final partial batch, if any
    pub fn finish(self) -> Option<Vec<Animal>> {
        if self.buffer.is_empty() {
            None
        } else {
            Some(self.buffer)
        }
    }

    /// Records currently buffered
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

/// Submits batches to the home endpoint through the retry policy
pub struct Loader {
    client: AnimalApiClient,
    policy: RetryPolicy,
}

impl Loader {
    pub fn new(client: AnimalApiClient, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    /// Submit one batch
    ///
    /// On error every record in the batch counts as failed; the caller
    /// decides whether to keep going (it should).
    pub async fn submit(&self, batch_number: u64, batch: &[Animal]) -> Result<()> {
        let started = Instant::now();
        info!(
            batch = batch_number,
            records = batch.len(),
            "Submitting batch"
        );

        self.policy
            .run("submit_batch", || self.client.submit_batch(batch))
            .await?;

        info!(
            batch = batch_number,
            records = batch.len(),
            latency_ms = started.elapsed().as_millis() as u64,
            "Batch accepted"
        );

        Ok(())
    }
}
