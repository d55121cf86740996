//! Record store abstractions.
//!
//! The external store is a spreadsheet: each board variant owns one
//! tab whose first row is the column header. The trait is the narrow
//! contract the sync layer needs — read every row keyed by header, and
//! append a batch of rows in one call.

pub mod auth;
pub mod memory;
pub mod sheets;

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::Result;

// Re-export for convenience
pub use auth::SheetsAuth;
pub use memory::MemoryStore;
pub use sheets::SheetsStore;

/// A spreadsheet-like record store.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// List all data rows of a tab as records keyed by column header.
    ///
    /// The header row itself is not returned. An empty or header-only
    /// tab yields an empty list.
    async fn read_all(&self, sheet: &str) -> Result<Vec<HashMap<String, String>>>;

    /// Append rows to a tab in a single batched call.
    ///
    /// The store is expected to apply the whole batch or none of it.
    async fn append_rows(&self, sheet: &str, rows: &[Vec<String>]) -> Result<()>;
}

/// Fold a header row and data rows into keyed records.
///
/// Rows shorter than the header fill the missing cells with empty
/// strings; surplus cells are ignored.
pub(crate) fn rows_to_records(
    header: &[String],
    rows: &[Vec<String>],
) -> Vec<HashMap<String, String>> {
    rows.iter()
        .map(|row| {
            header
                .iter()
                .enumerate()
                .map(|(i, key)| (key.clone(), row.get(i).cloned().unwrap_or_default()))
                .collect()
        })
        .collect()
}
