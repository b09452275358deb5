// src/models/mod.rs

//! Domain models for the recall watcher.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod criteria;
mod page;
mod poll;
mod recall;

// Re-export all public types
pub use config::{API_MAX_LIMIT, ApiConfig, Config, PollConfig, SearchConfig};
pub use criteria::SearchCriteria;
pub use page::ApiPage;
pub use poll::{NewRecallEvent, PollResult, SearchResponse};
pub use recall::{CanonicalRecord, FIELD_RENAMES, RawRecord, RecallId, canonical_key, translate};
