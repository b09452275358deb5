//! Response envelope of the records endpoint.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::recall::{RawRecord, RecallId};

/// One page of the remote dataset.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ApiPage {
    /// Size of the whole remote dataset, not of this page
    pub total_count: u64,

    #[serde(default)]
    pub results: Vec<RawRecord>,
}

impl ApiPage {
    pub fn new(total_count: u64, results: Vec<RawRecord>) -> Self {
        Self {
            total_count,
            results,
        }
    }

    /// Identifiers of the records in this page.
    pub fn record_ids(&self) -> HashSet<RecallId> {
        self.results.iter().map(|r| r.id).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
