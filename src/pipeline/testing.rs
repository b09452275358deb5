//! In-memory recall source for pipeline tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{ApiPage, RawRecord, RecallId};
use crate::services::{QueryParams, RecallSource};

type Responder = dyn Fn(&QueryParams) -> Result<ApiPage> + Send + Sync;

/// Serves pages computed from the requested query and records every request.
pub(crate) struct FakeSource {
    respond: Box<Responder>,
    requests: Mutex<Vec<QueryParams>>,
}

impl FakeSource {
    pub(crate) fn new(
        respond: impl Fn(&QueryParams) -> Result<ApiPage> + Send + Sync + 'static,
    ) -> Self {
        Self {
            respond: Box::new(respond),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn requests(&self) -> Vec<QueryParams> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl RecallSource for FakeSource {
    async fn fetch_page(&self, query: &QueryParams) -> Result<ApiPage> {
        self.requests.lock().unwrap().push(query.clone());
        (self.respond)(query)
    }
}

/// A page of bare records with the given ids.
pub(crate) fn page_of(total_count: u64, ids: impl IntoIterator<Item = RecallId>) -> ApiPage {
    let results = ids
        .into_iter()
        .map(|id| RawRecord::new(id).with("libelle", format!("product {id}")))
        .collect();
    ApiPage::new(total_count, results)
}
