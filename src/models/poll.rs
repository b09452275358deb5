//! Outputs of poll cycles and searches.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::recall::{CanonicalRecord, RecallId};

/// Result of one successful poll cycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PollResult {
    /// Size of the remote dataset as of the last page fetched
    pub total_count: u64,

    /// Most recent recalls first, capped at the configured maximum
    pub recent_recalls: Vec<CanonicalRecord>,

    /// Number of distinct ids not seen before this cycle
    pub new_recalls_count: usize,

    pub last_update: DateTime<Utc>,
}

/// Notification payload for a newly published recall.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewRecallEvent {
    pub recall_id: RecallId,
    pub sheet_number: Option<Value>,
    pub version_number: Option<Value>,
    pub recall_guid: Option<Value>,
    pub product_name: Option<Value>,
    pub category: Option<Value>,
    pub subcategory: Option<Value>,
    pub brand: Option<Value>,
    pub publication_date: Option<Value>,
    pub recall_reason: Option<Value>,
    pub risks: Option<Value>,
    pub recall_link: Option<Value>,
}

impl NewRecallEvent {
    /// Event type name used when forwarding to an event bus.
    pub const EVENT_TYPE: &'static str = "rappel_conso_new_recall";

    /// `{"event_type": ..., "data": ...}` wrapper for event consumers.
    pub fn envelope(&self) -> serde_json::Result<Value> {
        Ok(serde_json::json!({
            "event_type": Self::EVENT_TYPE,
            "data": serde_json::to_value(self)?,
        }))
    }
}

impl From<&CanonicalRecord> for NewRecallEvent {
    fn from(record: &CanonicalRecord) -> Self {
        let field = |key: &str| record.get(key).cloned();
        Self {
            recall_id: record.id,
            sheet_number: field("sheet_number"),
            version_number: field("version_number"),
            recall_guid: field("recall_guid"),
            product_name: field("product_name"),
            category: field("category"),
            subcategory: field("subcategory"),
            brand: field("brand"),
            publication_date: field("publication_date"),
            recall_reason: field("recall_reason"),
            risks: field("risks"),
            recall_link: field("recall_link"),
        }
    }
}

/// Response envelope of the search operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResponse {
    pub recalls: Vec<CanonicalRecord>,
    pub count: usize,
}

impl From<Vec<CanonicalRecord>> for SearchResponse {
    fn from(recalls: Vec<CanonicalRecord>) -> Self {
        Self {
            count: recalls.len(),
            recalls,
        }
    }
}
