// src/services/mod.rs

//! Crawl services: listing parsing, detail extraction, dedup and sync.

pub mod crawler;
pub mod dedup;
pub mod detail;
pub mod listing;
pub mod sync;

pub use crawler::{BoardCrawler, CrawlOutcome};
pub use dedup::DedupIndex;
pub use detail::{BodyText, ExtractStrategy, FaqStrategy, QnaStrategy};
pub use listing::{ListingPage, ListingParser};
pub use sync::SyncWriter;
