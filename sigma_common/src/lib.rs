//!
//! Common types and logic for the SigmaSight stock research tools.
//!
//! This crate aggregates:
//! - `error`: unified error type `SigmaError` used across the workspace.
//! - `result`: handy `Result<T, SigmaError>` alias.
//! - `tickers`: ticker symbols and parsing helpers.
//! - `model`: provider data: info snapshots, statements, prices, series.
//! - `provider`: the data-provider trait and an in-memory implementation.
//! - `fetch`: concurrent, cancellable snapshot fetching.
//! - `store`: the JSON-file watchlist store.
//! - `dip`: dip ranking against the 200-day moving average.
//! - `quality`: Piotroski-style quality score.
//! - `metrics`: the dashboard chart series.
//! - `summary`: side-panel and watchlist-row figures.
//! - `format`: display formatting of figures.
#![warn(missing_docs)]
pub mod dip;
pub mod error;
pub mod fetch;
pub mod format;
pub mod metrics;
pub mod model;
pub mod provider;
pub mod quality;
pub mod result;
pub mod store;
pub mod summary;
pub mod tickers;

pub use error::SigmaError;
pub use result::Result;
pub use tickers::Ticker;
