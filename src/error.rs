//! Error taxonomy for a single query.
//!
//! The normalizer and date selector never fail; they degrade to smaller or
//! empty results. Everything that can go wrong during a query lands in
//! [`QueryError`], which the request boundary turns into a user message.

use chrono::NaiveDate;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, QueryError>;

#[derive(Debug, Error)]
pub enum QueryError {
    /// Wrong argument count or shape. Carries the message shown to the user.
    #[error("{0}")]
    Usage(String),

    /// The full time series holds no valid reading.
    #[error("no data available")]
    NoDataAvailable,

    /// Nothing was recorded on the requested date.
    #[error("no data recorded for {0}")]
    NoDataForDate(NaiveDate),

    /// Contract violation inside the engine.
    #[error("internal error: {0}")]
    Internal(String),

    /// Source unreachable or any other fault outside the engine.
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl QueryError {
    // ---
    pub fn usage(msg: impl Into<String>) -> Self {
        Self::Usage(msg.into())
    }

    /// True for failures the user can't fix by changing the request.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Internal(_) | Self::Unexpected(_))
    }
}
