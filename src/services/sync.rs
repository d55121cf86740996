// src/services/sync.rs

//! Idempotent batch sync into the record store.
//!
//! Candidates are re-checked against the store's authoritative id set
//! right before writing, so a stale in-memory dedup index can never
//! produce duplicate rows. The surviving rows go out as one batched
//! append.

use crate::error::Result;
use crate::models::Record;
use crate::services::dedup::normalize_id;
use crate::storage::RecordStore;

/// Store cell capacity; longer text keeps its first N characters.
pub const MAX_CELL_CHARS: usize = 30_000;

/// Writes new records into one board tab.
pub struct SyncWriter;

impl SyncWriter {
    /// Append the records whose ids are absent from the store.
    ///
    /// Returns the number of rows written. Calling this twice with the
    /// same candidates writes nothing the second time.
    pub async fn sync(store: &dyn RecordStore, sheet: &str, records: &[Record]) -> Result<usize> {
        if records.is_empty() {
            log::info!("[{sheet}] Nothing to sync");
            return Ok(0);
        }

        let existing = store.read_all(sheet).await?;
        let mut known: std::collections::HashSet<String> = existing
            .iter()
            .filter_map(|row| row.get("id"))
            .map(|id| normalize_id(id))
            .collect();

        log::info!(
            "[{sheet}] {} rows in store, checking {} candidates",
            existing.len(),
            records.len()
        );

        let mut rows = Vec::new();
        for record in records {
            if !known.insert(normalize_id(&record.id.to_string())) {
                continue;
            }
            rows.push(
                record
                    .to_row()
                    .into_iter()
                    .map(|cell| truncate_cell(&cell))
                    .collect(),
            );
        }

        if rows.is_empty() {
            log::info!("[{sheet}] All candidates already present, nothing written");
            return Ok(0);
        }

        let written = rows.len();
        store.append_rows(sheet, &rows).await?;
        Ok(written)
    }
}

/// Keep the first [`MAX_CELL_CHARS`] characters of a cell.
fn truncate_cell(cell: &str) -> String {
    cell.chars().take(MAX_CELL_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::storage::memory::HEADER;

    fn record(id: u64, body: &str) -> Record {
        Record {
            id,
            category: "일반".to_string(),
            title: format!("질문 {id}"),
            published_date: "2026-08-01".to_string(),
            author: "작성자".to_string(),
            question_body: body.to_string(),
            answer_body: String::new(),
            status: String::new(),
            source_url: format!("https://example.com/qna.asp?rSeq={id}"),
        }
    }

    fn stored_row(id: &str) -> Vec<String> {
        let mut row = vec![String::new(); HEADER.len()];
        row[0] = id.to_string();
        row
    }

    #[tokio::test]
    async fn test_sync_writes_only_absent_ids() {
        let store = MemoryStore::new().with_rows("QnA", vec![stored_row("104")]);
        let records = vec![record(105, "new"), record(104, "already there")];

        let written = SyncWriter::sync(&store, "QnA", &records).await.unwrap();
        assert_eq!(written, 1);
        assert_eq!(store.row_count("QnA"), 2);
    }

    #[tokio::test]
    async fn test_sync_is_idempotent() {
        let store = MemoryStore::new();
        let records = vec![record(1, "a"), record(2, "b")];

        assert_eq!(SyncWriter::sync(&store, "QnA", &records).await.unwrap(), 2);
        assert_eq!(SyncWriter::sync(&store, "QnA", &records).await.unwrap(), 0);
        assert_eq!(store.row_count("QnA"), 2);
    }

    #[tokio::test]
    async fn test_sync_dedupes_within_batch() {
        let store = MemoryStore::new();
        let records = vec![record(9, "first copy"), record(9, "second copy")];

        assert_eq!(SyncWriter::sync(&store, "QnA", &records).await.unwrap(), 1);
        let rows = store.read_all("QnA").await.unwrap();
        assert_eq!(rows[0]["questionBody"], "first copy");
    }

    #[tokio::test]
    async fn test_sync_truncates_long_bodies() {
        let store = MemoryStore::new();
        let body: String = "가".repeat(40_000);
        let records = vec![record(1, &body)];

        SyncWriter::sync(&store, "QnA", &records).await.unwrap();

        let rows = store.read_all("QnA").await.unwrap();
        let stored = &rows[0]["questionBody"];
        assert_eq!(stored.chars().count(), 30_000);
        assert_eq!(*stored, body.chars().take(30_000).collect::<String>());
    }

    #[tokio::test]
    async fn test_sync_respects_stale_index_defense() {
        // Store state moved on after the crawl's dedup index was seeded.
        let store = MemoryStore::new();
        let records = vec![record(50, "raced")];
        store
            .append_rows("QnA", &[record(50, "landed first").to_row()])
            .await
            .unwrap();

        assert_eq!(SyncWriter::sync(&store, "QnA", &records).await.unwrap(), 0);
        assert_eq!(store.row_count("QnA"), 1);
    }

    #[tokio::test]
    async fn test_sync_empty_batch_is_noop() {
        let store = MemoryStore::new();
        assert_eq!(SyncWriter::sync(&store, "QnA", &[]).await.unwrap(), 0);
        assert_eq!(store.row_count("QnA"), 0);
    }
}
