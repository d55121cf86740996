// src/models/mod.rs

//! Domain models for the harvester application.

mod config;
mod record;

// Re-export all public types
pub use config::{BoardConfig, BoardsConfig, Config, CrawlerConfig, SheetsConfig};
pub use record::{BoardVariant, ListingCandidate, Record};
