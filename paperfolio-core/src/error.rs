//! Engine-wide error taxonomy.
//!
//! Every failure is local and synchronous: operations fail fast and fail
//! whole, never retry, and never partially commit a multi-symbol aggregate.
//! Presentation layers catch and display; the engine only reports.

use crate::data::provider::DataError;
use crate::domain::date::{CalendarDate, DateError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    /// A calendar date failed validation or parsing.
    #[error(transparent)]
    InvalidDate(#[from] DateError),

    /// The query date has no bar in the symbol's series (weekend, holiday,
    /// or simply outside the recorded history).
    #[error("no trading data for {symbol} on {date}")]
    DateNotFound {
        symbol: String,
        date: CalendarDate,
    },

    /// The end of a range resolved to an earlier bar than the start.
    #[error("invalid date range: {start} to {end}")]
    InvalidRange {
        start: CalendarDate,
        end: CalendarDate,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("portfolio '{name}' owned by '{owner}' does not exist")]
    PortfolioNotFound { name: String, owner: String },

    /// Price fetch or price cache failure.
    #[error(transparent)]
    Data(#[from] DataError),

    /// Snapshot save/load failure.
    #[error("persistence error: {0}")]
    Persistence(String),
}
