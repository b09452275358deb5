//! Pipeline entry points for recall operations.
//!
//! - `PollCoordinator`: detect newly published recalls, page by page
//! - `SearchService`: one-shot filtered search
//! - `run_watch`: periodic polling until shutdown

pub mod known_ids;
pub mod notify;
pub mod poll;
pub mod search;
pub mod service;
pub mod watch;

#[cfg(test)]
pub(crate) mod testing;

pub use known_ids::{KnownIdCache, SharedKnownIds};
pub use notify::{ChannelNotifier, LogNotifier, RecallNotifier};
pub use poll::{PollCoordinator, PollState};
pub use search::SearchService;
pub use service::RecallService;
pub use watch::{WatchStats, run_watch};
