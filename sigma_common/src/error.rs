//! Error types shared between the library and the CLI.
//!
//! The `SigmaError` enum unifies the failure cases of store I/O, JSON
//! (de)serialization, provider access and metric arithmetic, allowing every
//! layer to propagate a single error type.
use std::io;

use thiserror::Error;

use crate::model::info::Field;

/// Unified error type shared by the library and the CLI.
#[derive(Error, Debug)]
pub enum SigmaError {
    /// I/O error originating from the standard library (store file, ticker import file).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// A symbol that cannot be a ticker (empty, too long, bad characters).
    #[error("Invalid ticker symbol: {0:?}")]
    InvalidTicker(String),

    /// A provider field required by a computation was absent.
    #[error("Missing field {field} for {ticker}")]
    MissingField {
        /// Ticker the snapshot or statement belongs to.
        ticker: String,
        /// Name of the absent field.
        field: Field,
    },

    /// A ratio had a zero denominator; the string names the ratio.
    #[error("Division by zero while computing {0}")]
    DivisionByZero(String),

    /// The provider refused or could not serve the request.
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Transport failure talking to the provider.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The watchlist store holds no tickers (or could not be read as a list).
    #[error("Watchlist store is empty")]
    EmptyStore,

    /// A background fetch was cancelled before it completed.
    #[error("Operation cancelled")]
    Cancelled,
}

impl SigmaError {
    /// Shorthand for a `MissingField` error.
    pub fn missing(ticker: impl ToString, field: Field) -> Self {
        SigmaError::MissingField {
            ticker: ticker.to_string(),
            field,
        }
    }
}
