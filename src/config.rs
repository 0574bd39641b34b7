//! Configuration loader for the `sensorflow-airquality` service.
//!
//! This module centralizes all runtime configuration values and their defaults,
//! loading from environment variables (with optional `.env` file support
//! provided by the caller). By consolidating configuration logic here, we
//! avoid scattering `env::var` calls throughout the codebase.
//!
use std::{env, net::SocketAddr, time::Duration};

use anyhow::{anyhow, Result};

use crate::normalize::ColumnNames;

/// Parse an optional integer variable with a default value.
macro_rules! parse_var_u32 {
    ($lookup:expr, $var_name:expr, $default:expr) => {
        $lookup($var_name)
            .map(|v| v.parse::<u32>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Parse an optional integer variable that must be greater than zero.
macro_rules! parse_var_positive_u32 {
    ($lookup:expr, $var_name:expr, $default:expr) => {
        match parse_var_u32!($lookup, $var_name, $default) {
            0 => return Err(anyhow!("Invalid {}: must be greater than 0", $var_name)),
            value => value,
        }
    };
}

/// Parse a required string variable.
macro_rules! require_var {
    ($lookup:expr, $var_name:expr) => {
        $lookup($var_name)
            .ok_or_else(|| anyhow!("{} must be set in .env or environment", $var_name))?
    };
}

const DEFAULT_SHEETS_BASE_URL: &str = "https://sheets.googleapis.com";

/// Where raw rows are fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceConfig {
    // ---
    /// Google Sheets values API, read with an API key.
    Sheets {
        base_url: String,
        spreadsheet_id: String,
        range: String,
        api_key: String,
    },

    /// Paginated JSON API.
    Api { url: String, max_pages: u32 },
}

/// Strongly typed application configuration.
///
/// All fields are immutable after loading, ensuring a consistent configuration
/// snapshot for the lifetime of the application.
#[derive(Debug, Clone)]
pub struct Config {
    // ---
    /// Address the HTTP server binds to.
    pub bind_addr: SocketAddr,

    /// Row source selection and its settings.
    pub source: SourceConfig,

    /// Timeout applied to every fetch from the source.
    pub fetch_timeout: Duration,

    /// Column names expected in the source.
    pub columns: ColumnNames,
}

/// Load configuration from environment variables with defaults.
///
/// Source (one of):
/// - `SHEETS_SPREADSHEET_ID` + `SHEETS_API_KEY` – Google Sheets source
///   (`SHEETS_RANGE` default `Sheet1`, `SHEETS_BASE_URL` default Google's)
/// - `SENSOR_API_URL` – paginated JSON API (`API_MAX_PAGES` default 100)
///
/// Optional:
/// - `BIND_ADDR` – listen address (default: `0.0.0.0:8080`)
/// - `FETCH_TIMEOUT_SECS` – source fetch timeout (default: 10)
/// - `COLUMN_TIMESTAMP`, `COLUMN_TEMPERATURE`, `COLUMN_HUMIDITY`,
///   `COLUMN_GAS` – column name overrides
///
/// Returns an error if any required variable is missing or invalid.
pub fn load_from_env() -> Result<Config> {
    // ---
    load_from(|name| env::var(name).ok())
}

/// Same as [`load_from_env`] over an arbitrary variable lookup.
pub fn load_from(lookup: impl Fn(&str) -> Option<String>) -> Result<Config> {
    // ---
    let source = if let Some(spreadsheet_id) = lookup("SHEETS_SPREADSHEET_ID") {
        SourceConfig::Sheets {
            base_url: lookup("SHEETS_BASE_URL")
                .unwrap_or_else(|| DEFAULT_SHEETS_BASE_URL.to_string()),
            spreadsheet_id,
            range: lookup("SHEETS_RANGE").unwrap_or_else(|| "Sheet1".to_string()),
            api_key: require_var!(lookup, "SHEETS_API_KEY"),
        }
    } else if let Some(url) = lookup("SENSOR_API_URL") {
        SourceConfig::Api {
            url,
            max_pages: parse_var_positive_u32!(lookup, "API_MAX_PAGES", 100),
        }
    } else {
        return Err(anyhow!(
            "either SHEETS_SPREADSHEET_ID or SENSOR_API_URL must be set in .env or environment"
        ));
    };

    let bind_addr = lookup("BIND_ADDR")
        .unwrap_or_else(|| "0.0.0.0:8080".to_string())
        .parse::<SocketAddr>()
        .map_err(|e| anyhow!("Invalid BIND_ADDR: {}", e))?;

    let fetch_timeout_secs = parse_var_positive_u32!(lookup, "FETCH_TIMEOUT_SECS", 10);
    let fetch_timeout = Duration::from_secs(fetch_timeout_secs.into());

    let defaults = ColumnNames::default();
    let columns = ColumnNames {
        timestamp: lookup("COLUMN_TIMESTAMP").unwrap_or(defaults.timestamp),
        temperature: lookup("COLUMN_TEMPERATURE").unwrap_or(defaults.temperature),
        humidity: lookup("COLUMN_HUMIDITY").unwrap_or(defaults.humidity),
        gas_level: lookup("COLUMN_GAS").unwrap_or(defaults.gas_level),
    };

    Ok(Config {
        bind_addr,
        source,
        fetch_timeout,
        columns,
    })
}

impl Config {
    /// Log the loaded configuration for debugging purposes.
    ///
    /// Masks the Sheets API key while showing all other configuration values
    /// that were loaded.
    pub fn log_config(&self) {
        // ---
        tracing::info!("Configuration loaded:");
        tracing::info!("  BIND_ADDR          : {}", self.bind_addr);
        tracing::info!("  FETCH_TIMEOUT_SECS : {}", self.fetch_timeout.as_secs());

        match &self.source {
            SourceConfig::Sheets {
                base_url,
                spreadsheet_id,
                range,
                api_key,
            } => {
                tracing::info!("  SHEETS_BASE_URL    : {}", base_url);
                tracing::info!("  SHEETS_SPREADSHEET : {}", spreadsheet_id);
                tracing::info!("  SHEETS_RANGE       : {}", range);
                tracing::info!("  SHEETS_API_KEY     : {}", mask_secret(api_key));
            }
            SourceConfig::Api { url, max_pages } => {
                tracing::info!("  SENSOR_API_URL     : {}", url);
                tracing::info!("  API_MAX_PAGES      : {}", max_pages);
            }
        }

        tracing::info!("  COLUMNS            : {:?}", self.columns);
    }
}

/// Keep the first four characters of a secret.
fn mask_secret(secret: &str) -> String {
    // ---
    let visible: String = secret.chars().take(4).collect();
    if visible.len() == secret.len() {
        "****".to_string()
    } else {
        format!("{visible}****")
    }
}
