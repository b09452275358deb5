//! Service layer for the recall watcher.
//!
//! This module contains the building blocks that talk to the API:
//! - Query construction (`QueryBuilder`)
//! - Page fetching (`RecallFetcher`, behind the `RecallSource` trait)

mod fetcher;
pub mod query;

pub use fetcher::{RecallFetcher, RecallSource};
pub use query::{QueryBuilder, QueryParams};
