// src/services/dedup.rs

//! Known-id tracking for incremental runs.
//!
//! The index is seeded once per board from the store's current `id`
//! column, then grows as the crawl accepts new records. Ids compare as
//! normalized strings so `"007"`, `7` and `" 7 "` are the same key.

use std::collections::HashSet;

use crate::error::Result;
use crate::storage::RecordStore;

/// Normalize an id for set membership.
pub fn normalize_id(raw: &str) -> String {
    let trimmed = raw.trim().trim_start_matches('0');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Set of ids already present in the store, plus ids accepted during
/// the current run.
#[derive(Debug, Default, Clone)]
pub struct DedupIndex {
    ids: HashSet<String>,
}

impl DedupIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the index from the store's current contents for one tab.
    ///
    /// A tab with no `id` column (e.g. headers only) seeds empty.
    pub async fn load(store: &dyn RecordStore, sheet: &str) -> Result<Self> {
        let rows = store.read_all(sheet).await?;
        let mut index = Self::new();
        for row in &rows {
            if let Some(id) = row.get("id") {
                index.insert(id);
            }
        }
        log::info!("[{sheet}] Seeded dedup index with {} known ids", index.len());
        Ok(index)
    }

    /// Whether an id is already known.
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(&normalize_id(id))
    }

    pub fn contains_num(&self, id: u64) -> bool {
        self.contains(&id.to_string())
    }

    /// Mark an id as known. Returns `false` if it was already present.
    pub fn insert(&mut self, id: &str) -> bool {
        self.ids.insert(normalize_id(id))
    }

    pub fn insert_num(&mut self, id: u64) -> bool {
        self.insert(&id.to_string())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl FromIterator<String> for DedupIndex {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut index = Self::new();
        for id in iter {
            index.insert(&id);
        }
        index
    }
}
