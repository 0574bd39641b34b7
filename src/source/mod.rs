//! Row sources: where raw rows come from.
//!
//! The engine only sees [`RawRow`]s. A source owns the network details of its
//! backing store and hands back every row it has, in storage order.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::config::{Config, SourceConfig};
use crate::models::RawRow;

mod api;
mod sheets;

pub use api::ApiSource;
pub use sheets::SheetsSource;

// ---

#[async_trait]
pub trait RowSource: Send + Sync {
    /// Fetch all rows, oldest first.
    async fn fetch_rows(&self) -> Result<Vec<RawRow>>;

    /// Short name for logs and health output.
    fn kind(&self) -> &'static str;
}

/// Build the source selected by configuration.
pub fn from_config(cfg: &Config) -> Result<Arc<dyn RowSource>> {
    // ---
    let client = reqwest::Client::builder()
        .timeout(cfg.fetch_timeout)
        .build()?;

    let source: Arc<dyn RowSource> = match &cfg.source {
        SourceConfig::Sheets {
            base_url,
            spreadsheet_id,
            range,
            api_key,
        } => Arc::new(SheetsSource::new(
            client,
            base_url,
            spreadsheet_id,
            range,
            api_key,
        )),
        SourceConfig::Api { url, max_pages } => Arc::new(ApiSource::new(client, url, *max_pages)),
    };
    Ok(source)
}
