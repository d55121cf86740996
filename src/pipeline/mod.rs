// src/pipeline/mod.rs

//! Run-level wiring of fetcher, crawler and store.

mod sync;

pub use sync::{BoardSummary, RunSummary, run_sync};
