//! Paginated extraction of raw records
//!
//! Walks the animal listing page by page, starting at page 1, and enriches
//! every listed animal through the detail endpoint (the listing omits the
//! fields the transformer needs). The result is a lazy, finite stream of raw
//! records in page-then-item order; a new traversal always starts over from
//! page one.
//!
//! Termination: the declared total page count is reached, or the source
//! returns an empty page early. An early empty page could also mean the
//! source would keep paging forever, so it stops the traversal and is logged
//! as a warning.
//!
//! Failure: a page fetch that exhausts its retries ends the stream with
//! `ExtractionFailed`, carrying how many pages were retrieved. A detail fetch
//! that exhausts its retries yields a non-fatal error item for that record
//! only.

use crate::api::client::AnimalApiClient;
use crate::api::types::AnimalSummary;
use crate::model::RawRecord;
use crate::retry::RetryPolicy;
use futures::stream::Stream;
use homeward_common::{HomewardError, Result};
use std::collections::VecDeque;
use tracing::{debug, info, warn};

/// Extracts the full record set from the source API
pub struct Extractor {
    client: AnimalApiClient,
    policy: RetryPolicy,
}

impl Extractor {
    pub fn new(client: AnimalApiClient, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    /// Produce the lazy record stream
    ///
    /// Each call starts a fresh traversal from page one. Fatal page failures
    /// appear as an `ExtractionFailed` item and end the stream; per-record
    /// detail failures appear as error items and the stream continues.
    pub fn records(&self) -> impl Stream<Item = Result<RawRecord>> {
        let state = ExtractState {
            client: self.client.clone(),
            policy: self.policy.clone(),
            next_page: 1,
            declared_total_pages: None,
            pending: VecDeque::new(),
            pages_fetched: 0,
            finished: false,
            failed: false,
        };

        futures::stream::unfold(state, |mut state| async move {
            loop {
                if state.failed {
                    return None;
                }

                if let Some(summary) = state.pending.pop_front() {
                    let item = state.fetch_detail(summary).await;
                    return Some((item, state));
                }

                if state.finished {
                    return None;
                }

                if let Err(err) = state.fetch_page().await {
                    state.failed = true;
                    return Some((Err(err), state));
                }
            }
        })
    }
}

struct ExtractState {
    client: AnimalApiClient,
    policy: RetryPolicy,
    next_page: u32,
    declared_total_pages: Option<u32>,
    pending: VecDeque<AnimalSummary>,
    pages_fetched: u32,
    finished: bool,
    failed: bool,
}

impl ExtractState {
    /// Fetch the next page and queue its items.
    ///
    /// Any page-level failure, exhausted retries or a permanent status, makes
    /// the record set incomplete, so it is escalated as `ExtractionFailed`.
    async fn fetch_page(&mut self) -> Result<()> {
        let page_no = self.next_page;

        let page = self
            .policy
            .run("fetch_page", || self.client.get_page(page_no))
            .await
            .map_err(|err| HomewardError::ExtractionFailed {
                pages_fetched: self.pages_fetched,
                source: Box::new(err),
            })?;

        self.pages_fetched += 1;

        if self.declared_total_pages.is_none() {
            self.declared_total_pages = Some(page.total_pages);
            info!(
                total_pages = page.total_pages,
                total_items = page.total_items,
                "Starting extraction"
            );
        }

        debug!(page = page_no, records = page.items.len(), "Fetched page");

        if page.items.is_empty() {
            if page_no < page.total_pages {
                warn!(
                    page = page_no,
                    total_pages = page.total_pages,
                    "Empty page before declared total, stopping traversal"
                );
            }
            self.finished = true;
            return Ok(());
        }

        self.pending.extend(page.items);

        if page_no >= page.total_pages {
            self.finished = true;
        } else {
            self.next_page += 1;
        }

        Ok(())
    }

    /// Enrich one summary through the detail endpoint.
    async fn fetch_detail(&mut self, summary: AnimalSummary) -> Result<RawRecord> {
        let id = summary.id;

        self.policy
            .run("fetch_detail", || self.client.get_detail(id))
            .await
            .map_err(|err| {
                warn!(animal_id = id, error = %err, "Skipping animal, detail fetch failed");
                err
            })
    }
}
