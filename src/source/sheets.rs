//! Google Sheets row source (values API, API-key access).
//!
//! The first row of the range is the header. Each following row becomes a
//! record keyed by header cell, the same shape `get_all_records` produces.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;

use super::RowSource;
use crate::models::RawRow;

// ---

/// Body of `GET /v4/spreadsheets/{id}/values/{range}`.
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

pub struct SheetsSource {
    // ---
    client: reqwest::Client,
    base_url: String,
    spreadsheet_id: String,
    range: String,
    api_key: String,
}

impl SheetsSource {
    // ---
    pub fn new(
        client: reqwest::Client,
        base_url: &str,
        spreadsheet_id: &str,
        range: &str,
        api_key: &str,
    ) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
            spreadsheet_id: spreadsheet_id.to_string(),
            range: range.to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Values endpoint for the configured range. The key is not included.
    fn values_url(&self) -> Result<Url> {
        // ---
        let mut url = Url::parse(&self.base_url)
            .with_context(|| format!("invalid Sheets base URL '{}'", self.base_url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("Sheets base URL '{}' cannot carry a path", self.base_url))?
            .pop_if_empty()
            .extend([
                "v4",
                "spreadsheets",
                self.spreadsheet_id.as_str(),
                "values",
                self.range.as_str(),
            ]);
        Ok(url)
    }
}

#[async_trait]
impl RowSource for SheetsSource {
    async fn fetch_rows(&self) -> Result<Vec<RawRow>> {
        // ---
        let url = self.values_url()?;
        tracing::debug!("Fetching sheet values from: {}", url);

        let body: ValueRange = self
            .client
            .get(url.clone())
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .with_context(|| format!("request to '{url}' failed"))?
            .json()
            .await
            .with_context(|| format!("unexpected body from '{url}'"))?;

        let rows = records_from_values(body.values);
        tracing::info!("Fetched {} rows from sheet '{}'", rows.len(), self.range);
        Ok(rows)
    }

    fn kind(&self) -> &'static str {
        "sheets"
    }
}

/// Zip every data row with the header row.
///
/// Cells beyond the header are ignored; missing trailing cells are left out
/// of the record.
fn records_from_values(values: Vec<Vec<Value>>) -> Vec<RawRow> {
    // ---
    let mut rows = values.into_iter();
    let Some(header) = rows.next() else {
        return Vec::new();
    };
    let header: Vec<String> = header.iter().map(cell_text).collect();

    rows.map(|cells| {
        header
            .iter()
            .cloned()
            .zip(cells)
            .collect::<RawRow>()
    })
    .collect()
}

fn cell_text(cell: &Value) -> String {
    // ---
    match cell {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
