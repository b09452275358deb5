// src/pipeline/poll.rs

//! Poll coordinator.
//!
//! One cycle walks the dataset newest-first, page by page, and classifies
//! every record against the known-id cache. Pagination stops when:
//!
//! - the remote dataset is exhausted (empty page),
//! - `overfetch_factor * max_recent` records have been collected, or
//! - a page holds fewer than `new_ratio_threshold * page_size` unseen ids,
//!   after which older pages are assumed to be known already.
//!
//! `page_size` is clamped to what the API accepts, and the offset advances
//! by the limit actually requested.
//!
//! The cache is only updated once the whole cycle succeeded. A failed or
//! cancelled cycle leaves the cache and the last published result untouched.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::models::{CanonicalRecord, NewRecallEvent, PollConfig, PollResult, RecallId, translate};
use crate::pipeline::known_ids::SharedKnownIds;
use crate::pipeline::notify::RecallNotifier;
use crate::services::{QueryParams, RecallSource};

/// What the last poll cycles left behind.
#[derive(Debug, Clone, Default)]
pub struct PollState {
    /// Result of the last successful cycle
    pub last_result: Option<PollResult>,
    /// Whether the most recent cycle succeeded
    pub last_update_success: bool,
    /// Message of the most recent failure, cleared on success
    pub last_error: Option<String>,
}

impl PollState {
    /// Data is present and the latest cycle did not fail.
    pub fn available(&self) -> bool {
        self.last_update_success && self.last_result.is_some()
    }
}

/// Records gathered by one pagination loop, before anything is committed.
#[derive(Debug, Default)]
struct CycleOutcome {
    total_count: u64,
    collected: Vec<CanonicalRecord>,
    new_ids: HashSet<RecallId>,
    pages: usize,
}

/// Drives poll cycles against a recall source.
pub struct PollCoordinator {
    source: Arc<dyn RecallSource>,
    config: PollConfig,
    known_ids: SharedKnownIds,
    notifier: Option<Arc<dyn RecallNotifier>>,
    state: RwLock<PollState>,
}

impl PollCoordinator {
    /// Create a coordinator over an explicitly constructed cache.
    pub fn new(
        source: Arc<dyn RecallSource>,
        config: PollConfig,
        known_ids: SharedKnownIds,
    ) -> Self {
        Self {
            source,
            config,
            known_ids,
            notifier: None,
            state: RwLock::new(PollState::default()),
        }
    }

    /// Deliver an event for every newly observed recall.
    pub fn with_notifier(mut self, notifier: Arc<dyn RecallNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    pub fn known_ids(&self) -> &SharedKnownIds {
        &self.known_ids
    }

    /// Snapshot of the last published result and availability.
    pub async fn state(&self) -> PollState {
        self.state.read().await.clone()
    }

    /// Run one cycle and publish its outcome.
    ///
    /// On failure the previous result stays in place and availability drops.
    pub async fn refresh(&self) -> Result<PollResult> {
        match self.poll().await {
            Ok(result) => {
                let mut state = self.state.write().await;
                state.last_result = Some(result.clone());
                state.last_update_success = true;
                state.last_error = None;
                Ok(result)
            }
            Err(e) => {
                log::warn!("Poll cycle failed: {}", e);
                let mut state = self.state.write().await;
                state.last_update_success = false;
                state.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Run one cycle: paginate, commit seen ids, emit events.
    pub async fn poll(&self) -> Result<PollResult> {
        let outcome = self.paginate().await?;

        let evicted = self
            .known_ids
            .lock()
            .await
            .commit(outcome.collected.iter().map(|r| r.id));
        if evicted > 0 {
            log::debug!("Evicted {} old recall ids from cache", evicted);
        }

        log::info!(
            "Fetched {} recalls ({} new) - Total in dataset: {}",
            outcome.collected.len(),
            outcome.new_ids.len(),
            outcome.total_count
        );

        if !outcome.new_ids.is_empty() {
            self.notify_new(&outcome.collected, &outcome.new_ids);
        }

        let mut recent = outcome.collected;
        recent.truncate(self.config.max_recent);

        Ok(PollResult {
            total_count: outcome.total_count,
            recent_recalls: recent,
            new_recalls_count: outcome.new_ids.len(),
            last_update: Utc::now(),
        })
    }

    async fn paginate(&self) -> Result<CycleOutcome> {
        let page_size = self.config.effective_page_size();
        let collect_limit = self.config.collect_limit();
        let min_new = self.config.min_new_per_page();

        let mut outcome = CycleOutcome::default();
        let mut offset: u64 = 0;

        loop {
            let query = QueryParams::page(offset, page_size);
            let page = self.source.fetch_page(&query).await?;
            outcome.pages += 1;
            outcome.total_count = page.total_count;

            if page.is_empty() {
                log::debug!("Pagination exhausted at offset {}", offset);
                break;
            }

            let new_in_page = self.known_ids.lock().await.new_ids(&page.record_ids());
            let new_count = new_in_page.len();
            outcome.new_ids.extend(new_in_page);
            outcome
                .collected
                .extend(page.results.into_iter().map(translate));

            if outcome.collected.len() >= collect_limit {
                log::debug!(
                    "Collected {} recalls, stopping pagination",
                    outcome.collected.len()
                );
                break;
            }

            if (new_count as f64) < min_new {
                log::debug!("Most recalls already known, stopping pagination");
                break;
            }

            offset += u64::from(query.limit);
        }

        log::debug!("Poll cycle fetched {} page(s)", outcome.pages);
        Ok(outcome)
    }

    fn notify_new(&self, collected: &[CanonicalRecord], new_ids: &HashSet<RecallId>) {
        let Some(notifier) = &self.notifier else {
            return;
        };

        let mut emitted = HashSet::new();
        for record in collected {
            if new_ids.contains(&record.id) && emitted.insert(record.id) {
                notifier.notify(&NewRecallEvent::from(record));
            }
        }
        log::debug!("Fired {} new recall events", emitted.len());
    }
}
