//! Google Sheets record store.
//!
//! Talks to the Sheets v4 values API directly: `values/{tab}` to read
//! the current contents and `values/{tab}:append` for the batched
//! write. The spreadsheet and its tabs are provisioned out of band.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::error::{AppError, Result};
use crate::storage::{RecordStore, SheetsAuth, rows_to_records};

const API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Response shape of a `values` read.
#[derive(Debug, Deserialize, Default)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Sheets-backed record store.
pub struct SheetsStore {
    client: Client,
    auth: SheetsAuth,
    spreadsheet_id: String,
}

impl SheetsStore {
    /// Create a store for one spreadsheet.
    pub fn new(client: Client, auth: SheetsAuth, spreadsheet_id: impl Into<String>) -> Self {
        Self {
            client,
            auth,
            spreadsheet_id: spreadsheet_id.into(),
        }
    }

    fn values_url(&self, suffix: &str) -> String {
        format!("{}/{}/values/{}", API_BASE, self.spreadsheet_id, suffix)
    }

    async fn read_values(&self, sheet: &str) -> Result<Vec<Vec<String>>> {
        let url = self.values_url(sheet);
        let response = self
            .client
            .get(&url)
            .bearer_auth(self.auth.bearer())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::store(format!(
                "Reading tab {sheet} failed: {status}: {body}"
            )));
        }

        let range: ValueRange = response.json().await?;
        Ok(range.values)
    }
}

#[async_trait]
impl RecordStore for SheetsStore {
    async fn read_all(&self, sheet: &str) -> Result<Vec<HashMap<String, String>>> {
        let mut values = self.read_values(sheet).await?;
        if values.is_empty() {
            return Ok(Vec::new());
        }
        let header = values.remove(0);
        Ok(rows_to_records(&header, &values))
    }

    async fn append_rows(&self, sheet: &str, rows: &[Vec<String>]) -> Result<()> {
        if rows.is_empty() {
            return Ok(());
        }

        let url = format!("{}?valueInputOption=RAW", self.values_url(&format!("{sheet}:append")));
        let body = json!({ "values": rows });

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.auth.bearer())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::store(format!(
                "Appending {} rows to tab {sheet} failed: {status}: {text}",
                rows.len()
            )));
        }

        log::info!("[{sheet}] Appended {} rows to spreadsheet", rows.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_url_shape() {
        let store = SheetsStore::new(Client::new(), SheetsAuth::new("t"), "sheet-id");
        assert_eq!(
            store.values_url("QnA"),
            "https://sheets.googleapis.com/v4/spreadsheets/sheet-id/values/QnA"
        );
    }

    #[test]
    fn test_value_range_deserializes_missing_values() {
        let range: ValueRange = serde_json::from_str(r#"{"range":"QnA!A1:I1"}"#).unwrap();
        assert!(range.values.is_empty());

        let range: ValueRange =
            serde_json::from_str(r#"{"values":[["id","title"],["1","t"]]}"#).unwrap();
        assert_eq!(range.values.len(), 2);
    }
}
