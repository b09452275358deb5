// src/lib.rs

//! Recall watcher library.
//!
//! Polls the RappelConso recall API, remembers which recalls were already
//! seen, and exposes a filtered search over the same dataset.

pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod utils;
