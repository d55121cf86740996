// src/pipeline/sync.rs

//! Incremental harvest-and-sync run.
//!
//! Boards run as independent sequential passes (disjoint id spaces,
//! disjoint tabs); within a board the order is seed dedup index, crawl,
//! then one batched sync.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::fetch::PageFetcher;
use crate::models::{BoardVariant, Config};
use crate::services::{BoardCrawler, DedupIndex, SyncWriter};
use crate::storage::RecordStore;

/// Per-board result of a run.
#[derive(Debug)]
pub struct BoardSummary {
    pub variant: BoardVariant,
    pub known_before: usize,
    pub candidates_seen: usize,
    pub duplicates: usize,
    pub detail_failures: usize,
    pub harvested: usize,
    pub written: usize,
    pub listing_failed: bool,
}

/// Whole-run result.
#[derive(Debug)]
pub struct RunSummary {
    pub started: DateTime<Utc>,
    pub finished: DateTime<Utc>,
    pub boards: Vec<BoardSummary>,
}

impl RunSummary {
    pub fn total_written(&self) -> usize {
        self.boards.iter().map(|b| b.written).sum()
    }
}

/// Harvest the given boards and sync new records into the store.
///
/// Store reads/writes escalate; everything the crawl could recover
/// from was already handled inside the orchestrator. Records collected
/// before a listing failure are still synced.
pub async fn run_sync(
    config: &Config,
    fetcher: &dyn PageFetcher,
    store: &dyn RecordStore,
    boards: &[BoardVariant],
) -> Result<RunSummary> {
    let started = Utc::now();
    let crawler = BoardCrawler::new(fetcher, &config.crawler)?;
    let mut summaries = Vec::new();

    for &variant in boards {
        let board = config.boards.for_variant(variant);
        log::info!(
            "[{variant}] Starting board pass (max {} pages)",
            board.max_pages
        );

        let mut known = DedupIndex::load(store, variant.sheet_name()).await?;
        let known_before = known.len();

        let outcome = crawler.run(variant, board, &mut known).await;
        log::info!(
            "[{variant}] Crawl done: {} new, {} duplicates, {} detail failures over {} pages",
            outcome.records.len(),
            outcome.duplicates,
            outcome.detail_failures,
            outcome.pages_fetched
        );

        let written = SyncWriter::sync(store, variant.sheet_name(), &outcome.records).await?;
        log::info!("[{variant}] Synced {written} new records");

        summaries.push(BoardSummary {
            variant,
            known_before,
            candidates_seen: outcome.candidates_seen,
            duplicates: outcome.duplicates,
            detail_failures: outcome.detail_failures,
            harvested: outcome.records.len(),
            written,
            listing_failed: outcome.listing_failed,
        });
    }

    let summary = RunSummary {
        started,
        finished: Utc::now(),
        boards: summaries,
    };
    log::info!(
        "Run complete: {} records written in {}s",
        summary.total_written(),
        (summary.finished - summary.started).num_seconds()
    );
    Ok(summary)
}
