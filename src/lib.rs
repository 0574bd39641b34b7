//! Query engine for air-quality sensor readings kept in a spreadsheet.
//!
//! Raw rows go through [`normalize`] into a [`TimeSeries`], are narrowed to one
//! calendar date by [`select`], and reduced per field by [`aggregate`]. The
//! [`query`] service runs that cycle fresh for every request; [`commands`] and
//! [`routes`] expose it as chat-style commands and JSON over HTTP.

pub mod aggregate;
pub mod commands;
pub mod config;
pub mod error;
pub mod format;
pub mod models;
pub mod normalize;
pub mod query;
pub mod routes;
pub mod select;
pub mod source;

pub use config::Config;
pub use error::QueryError;
pub use models::{RawRow, Reading, TimeSeries};
pub use query::QueryService;
