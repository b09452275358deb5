//! Owner of the shared HTTP transport.
//!
//! Builds one `reqwest::Client`, hands it to both the poll coordinator and
//! the search service, and releases it on shutdown.

use std::sync::Arc;

use crate::error::Result;
use crate::models::Config;
use crate::pipeline::known_ids::KnownIdCache;
use crate::pipeline::notify::RecallNotifier;
use crate::pipeline::poll::PollCoordinator;
use crate::pipeline::search::SearchService;
use crate::services::{RecallFetcher, RecallSource};

/// Poll coordinator and search service over one connection pool.
pub struct RecallService {
    source: Arc<dyn RecallSource>,
    coordinator: PollCoordinator,
    search: SearchService,
}

impl RecallService {
    /// Build the transport and both components from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let fetcher = RecallFetcher::new(&config.api)?;
        log::debug!("Using recall endpoint {}", fetcher.endpoint());
        Ok(Self::with_source(Arc::new(fetcher), config))
    }

    /// Build both components over an existing source.
    pub fn with_source(source: Arc<dyn RecallSource>, config: &Config) -> Self {
        let known_ids = KnownIdCache::new(config.poll.cache_capacity).shared();
        let coordinator = PollCoordinator::new(Arc::clone(&source), config.poll.clone(), known_ids);
        let search = SearchService::new(Arc::clone(&source), &config.search);
        Self {
            source,
            coordinator,
            search,
        }
    }

    /// Deliver new-recall events to `notifier`.
    pub fn with_notifier(mut self, notifier: Arc<dyn RecallNotifier>) -> Self {
        self.coordinator = self.coordinator.with_notifier(notifier);
        self
    }

    pub fn coordinator(&self) -> &PollCoordinator {
        &self.coordinator
    }

    pub fn search(&self) -> &SearchService {
        &self.search
    }

    pub fn source(&self) -> &Arc<dyn RecallSource> {
        &self.source
    }

    /// Release the transport. Consumes the service so it happens once.
    pub fn shutdown(self) {
        let Self {
            source,
            coordinator,
            search,
        } = self;
        drop(search);
        drop(coordinator);
        log::debug!(
            "Releasing HTTP transport ({} handle(s) left)",
            Arc::strong_count(&source)
        );
        drop(source);
    }
}
