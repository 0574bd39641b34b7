//! Paginated JSON API row source.
//!
//! Pages look like `{"results": [{...}, ...], "next_cursor": "..."}`. The
//! cursor is passed back as `?cursor=` until it is absent or the page limit
//! is hit.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;

use super::RowSource;
use crate::models::RawRow;

// ---

pub struct ApiSource {
    // ---
    client: reqwest::Client,
    url: String,
    max_pages: u32,
}

impl ApiSource {
    // ---
    pub fn new(client: reqwest::Client, url: &str, max_pages: u32) -> Self {
        Self {
            client,
            url: url.to_string(),
            max_pages,
        }
    }
}

#[async_trait]
impl RowSource for ApiSource {
    async fn fetch_rows(&self) -> Result<Vec<RawRow>> {
        // ---
        let mut all_rows = Vec::new();
        let mut cursor: Option<String> = None;
        let mut page_count = 0;

        loop {
            if page_count >= self.max_pages {
                tracing::debug!(
                    "Hit page limit of {}, stopping pagination. Fetched {} rows so far.",
                    self.max_pages,
                    all_rows.len()
                );
                break;
            }
            page_count += 1;

            let mut request = self.client.get(&self.url);
            if let Some(ref cursor) = cursor {
                request = request.query(&[("cursor", cursor)]);
            }

            tracing::debug!("Fetching page {} from: {}", page_count, self.url);

            let response: Value = request
                .send()
                .await
                .and_then(|r| r.error_for_status())
                .with_context(|| format!("request to '{}' failed", self.url))?
                .json()
                .await
                .with_context(|| format!("page {page_count} from '{}' is not JSON", self.url))?;

            let (rows, next) = parse_page(&response, page_count);
            all_rows.extend(rows);
            cursor = next;

            tracing::debug!("Page {} next_cursor: {:?}", page_count, cursor);

            if cursor.is_none() {
                break;
            }
        }

        tracing::info!(
            "Finished fetching {} total rows from {} pages",
            all_rows.len(),
            page_count
        );
        Ok(all_rows)
    }

    fn kind(&self) -> &'static str {
        "api"
    }
}

/// Split one page into its object rows and the next cursor.
fn parse_page(page: &Value, page_number: u32) -> (Vec<RawRow>, Option<String>) {
    // ---
    let mut rows = Vec::new();

    if let Some(results) = page.get("results").and_then(|d| d.as_array()) {
        for (i, item) in results.iter().enumerate() {
            match item.as_object() {
                Some(row) => rows.push(row.clone()),
                None => tracing::debug!(
                    "Skipping item {} on page {}: not an object - Raw item: {}",
                    i,
                    page_number,
                    item
                ),
            }
        }
    } else {
        tracing::debug!(
            "Page {} response missing 'results' field or not an array",
            page_number
        );
    }

    let next = page
        .get("next_cursor")
        .and_then(|c| c.as_str())
        .map(String::from);

    (rows, next)
}
