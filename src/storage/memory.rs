//! In-memory record store.
//!
//! Backs `--dry-run` executions (crawl everything, write nowhere
//! durable) and doubles as the test store. Tabs start header-only with
//! the standard column set.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::Result;
use crate::storage::{RecordStore, rows_to_records};

/// Standard column header for a board tab.
pub const HEADER: [&str; 9] = [
    "id",
    "category",
    "title",
    "publishedDate",
    "author",
    "questionBody",
    "answerBody",
    "status",
    "sourceUrl",
];

#[derive(Debug, Default)]
struct Tab {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// Volatile record store keyed by tab name.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tabs: Mutex<HashMap<String, Tab>>,
}

impl MemoryStore {
    /// Empty store; tabs materialize with the standard header on first
    /// touch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a tab with rows (test convenience).
    pub fn with_rows(self, sheet: &str, rows: Vec<Vec<String>>) -> Self {
        {
            let mut tabs = self.tabs.lock().unwrap();
            let tab = tabs.entry(sheet.to_string()).or_insert_with(default_tab);
            tab.rows.extend(rows);
        }
        self
    }

    /// Total data rows in a tab.
    pub fn row_count(&self, sheet: &str) -> usize {
        self.tabs
            .lock()
            .unwrap()
            .get(sheet)
            .map(|t| t.rows.len())
            .unwrap_or(0)
    }
}

fn default_tab() -> Tab {
    Tab {
        header: HEADER.iter().map(|s| s.to_string()).collect(),
        rows: Vec::new(),
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn read_all(&self, sheet: &str) -> Result<Vec<HashMap<String, String>>> {
        let tabs = self.tabs.lock().unwrap();
        Ok(tabs
            .get(sheet)
            .map(|tab| rows_to_records(&tab.header, &tab.rows))
            .unwrap_or_default())
    }

    async fn append_rows(&self, sheet: &str, rows: &[Vec<String>]) -> Result<()> {
        let mut tabs = self.tabs.lock().unwrap();
        let tab = tabs.entry(sheet.to_string()).or_insert_with(default_tab);
        tab.rows.extend(rows.iter().cloned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, title: &str) -> Vec<String> {
        let mut row = vec![String::new(); HEADER.len()];
        row[0] = id.to_string();
        row[2] = title.to_string();
        row
    }

    #[tokio::test]
    async fn test_read_all_keys_by_header() {
        let store = MemoryStore::new().with_rows("QnA", vec![row("104", "old question")]);

        let records = store.read_all("QnA").await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["id"], "104");
        assert_eq!(records[0]["title"], "old question");
    }

    #[tokio::test]
    async fn test_append_is_per_tab() {
        let store = MemoryStore::new();
        store.append_rows("QnA", &[row("1", "q")]).await.unwrap();
        store.append_rows("FAQ", &[row("1", "f")]).await.unwrap();

        assert_eq!(store.row_count("QnA"), 1);
        assert_eq!(store.row_count("FAQ"), 1);
        assert_eq!(store.read_all("FAQ").await.unwrap()[0]["title"], "f");
    }

    #[tokio::test]
    async fn test_missing_tab_reads_empty() {
        let store = MemoryStore::new();
        assert!(store.read_all("QnA").await.unwrap().is_empty());
    }
}
