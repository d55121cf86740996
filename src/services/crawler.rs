// src/services/crawler.rs

//! Board crawl orchestration.
//!
//! Walks listing pages newest-first, filters out already-known ids and
//! harvests detail bodies for the rest. Because listings are ordered
//! newest-first, a page whose every candidate is already known means
//! all older pages are known too, so the crawl stops there.

use std::time::Duration;

use crate::error::Result;
use crate::fetch::PageFetcher;
use crate::models::{BoardConfig, BoardVariant, CrawlerConfig, ListingCandidate, Record};
use crate::services::dedup::DedupIndex;
use crate::services::detail::ExtractStrategy;
use crate::services::listing::ListingParser;

/// Summary of one board crawl.
#[derive(Debug, Default)]
pub struct CrawlOutcome {
    /// Records whose ids were unknown when extracted, in listing order
    pub records: Vec<Record>,
    /// Listing pages actually fetched
    pub pages_fetched: u32,
    /// Candidates parsed across all pages
    pub candidates_seen: usize,
    /// Candidates skipped as already known
    pub duplicates: usize,
    /// Detail pages that failed to fetch (candidates dropped)
    pub detail_failures: usize,
    /// Whether a listing fetch failure cut the crawl short
    pub listing_failed: bool,
}

/// Orchestrates the page-by-page crawl of one board.
pub struct BoardCrawler<'a, F: PageFetcher + ?Sized> {
    fetcher: &'a F,
    parser: ListingParser,
    config: &'a CrawlerConfig,
}

impl<'a, F: PageFetcher + ?Sized> BoardCrawler<'a, F> {
    pub fn new(fetcher: &'a F, config: &'a CrawlerConfig) -> Result<Self> {
        Ok(Self {
            fetcher,
            parser: ListingParser::new()?,
            config,
        })
    }

    /// Crawl one board and return every newly observed record.
    ///
    /// `known` carries the store's ids in and the accepted ids out; it
    /// grows during the run so overlapping pages cannot re-yield an id.
    /// A listing fetch failure ends the crawl but keeps what was
    /// already accumulated.
    pub async fn run(
        &self,
        variant: BoardVariant,
        board: &BoardConfig,
        known: &mut DedupIndex,
    ) -> CrawlOutcome {
        let strategy = variant.strategy();
        let mut outcome = CrawlOutcome::default();

        for page in 1..=board.max_pages {
            let url = variant.listing_url(&board.base_url, page);
            log::info!("[{variant}] Fetching listing page {page}");

            let html = match self.fetcher.fetch(&url).await {
                Ok(html) => html,
                Err(e) => {
                    log::error!("[{variant}] Listing fetch failed for page {page} ({url}): {e}");
                    outcome.listing_failed = true;
                    break;
                }
            };
            outcome.pages_fetched += 1;
            self.pace(self.config.listing_delay_ms).await;

            let parsed = match self.parser.parse(&html, &url) {
                Ok(parsed) => parsed,
                Err(e) => {
                    log::error!("[{variant}] Listing parse failed for page {page} ({url}): {e}");
                    outcome.listing_failed = true;
                    break;
                }
            };

            if parsed.rows_seen == 0 {
                log::info!("[{variant}] Page {page} has no rows, end of board");
                break;
            }

            let had_candidates = !parsed.candidates.is_empty();
            let mut fresh = Vec::new();
            for candidate in parsed.candidates {
                outcome.candidates_seen += 1;
                if known.contains_num(candidate.id) {
                    outcome.duplicates += 1;
                } else {
                    fresh.push(candidate);
                }
            }

            // Termination is driven by full duplication only. A page of
            // nothing but pinned notices still warrants looking further.
            if had_candidates && fresh.is_empty() {
                log::info!("[{variant}] Page {page} fully duplicate, stopping pagination");
                break;
            }

            log::info!("[{variant}] Page {page}: {} new candidates", fresh.len());
            for candidate in fresh {
                self.harvest(variant, strategy, candidate, known, &mut outcome)
                    .await;
            }
        }

        outcome
    }

    /// Fetch one candidate's detail page and promote it to a record.
    ///
    /// Any failure here drops only this candidate; the id stays out of
    /// the dedup set so a later run can retry it.
    async fn harvest(
        &self,
        variant: BoardVariant,
        strategy: &dyn ExtractStrategy,
        candidate: ListingCandidate,
        known: &mut DedupIndex,
        outcome: &mut CrawlOutcome,
    ) {
        let html = match self.fetcher.fetch(&candidate.link).await {
            Ok(html) => html,
            Err(e) => {
                log::warn!(
                    "[{variant}] Detail fetch failed for id {} ({}): {e}",
                    candidate.id,
                    candidate.link
                );
                outcome.detail_failures += 1;
                self.pace(self.config.detail_delay_ms).await;
                return;
            }
        };
        self.pace(self.config.detail_delay_ms).await;

        let body = strategy.extract_body(&html);

        // Same id seen twice within one run (overlapping pages while
        // the site shifts under us): first acceptance wins.
        if !known.insert_num(candidate.id) {
            outcome.duplicates += 1;
            return;
        }

        outcome
            .records
            .push(Record::from_candidate(candidate, body.question, body.answer));
    }

    async fn pace(&self, delay_ms: u64) {
        if delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }
    }
}
