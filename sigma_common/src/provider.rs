//! Access to the external financial-data provider.
//!
//! The `Provider` trait is the only seam through which the library sees market
//! data. Implementations perform blocking I/O; they must be `Send + Sync` so
//! the fetch helpers can call them from worker threads.
use std::collections::HashMap;

use chrono::NaiveDate;

use crate::Result;
use crate::error::SigmaError;
use crate::model::info::InfoSnapshot;
use crate::model::price::{Dividend, PricePoint};
use crate::model::statement::Statement;
use crate::tickers::Ticker;

/// Source of market data for a ticker.
pub trait Provider: Send + Sync {
    /// Key/value info snapshot. An unknown ticker yields an empty snapshot.
    fn info(&self, ticker: &Ticker) -> Result<InfoSnapshot>;

    /// Annual income statements.
    fn income_statement(&self, ticker: &Ticker) -> Result<Statement>;

    /// Annual balance sheets.
    fn balance_sheet(&self, ticker: &Ticker) -> Result<Statement>;

    /// Annual cash flow statements.
    fn cash_flow(&self, ticker: &Ticker) -> Result<Statement>;

    /// Dividend history, oldest first.
    fn dividends(&self, ticker: &Ticker) -> Result<Vec<Dividend>>;

    /// Daily closes between `from` and `to` inclusive, oldest first.
    fn daily_closes(&self, ticker: &Ticker, from: NaiveDate, to: NaiveDate) -> Result<Vec<PricePoint>>;
}

/// Everything a provider can report for one ticker.
#[derive(Debug, Clone, Default)]
pub struct TickerData {
    /// Info snapshot.
    pub info: InfoSnapshot,
    /// Income statement table.
    pub income: Statement,
    /// Balance sheet table.
    pub balance: Statement,
    /// Cash flow table.
    pub cash_flow: Statement,
    /// Dividend history.
    pub dividends: Vec<Dividend>,
    /// Daily closes, oldest first.
    pub closes: Vec<PricePoint>,
}

/// In-memory provider serving fixed data.
///
/// Tickers it does not know get an empty snapshot and empty tables, matching
/// how remote providers answer for unlisted symbols. Tickers registered with
/// [`StaticProvider::unavailable`] fail with `ProviderUnavailable`.
#[derive(Debug, Default)]
pub struct StaticProvider {
    data: HashMap<Ticker, TickerData>,
    failing: Vec<Ticker>,
}

impl StaticProvider {
    /// Provider with no tickers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register data for a ticker.
    pub fn with(mut self, ticker: Ticker, data: TickerData) -> Self {
        self.data.insert(ticker, data);
        self
    }

    /// Register a ticker whose requests fail.
    pub fn unavailable(mut self, ticker: Ticker) -> Self {
        self.failing.push(ticker);
        self
    }

    fn lookup(&self, ticker: &Ticker) -> Result<Option<&TickerData>> {
        if self.failing.contains(ticker) {
            return Err(SigmaError::ProviderUnavailable(format!("no response for {}", ticker)));
        }
        Ok(self.data.get(ticker))
    }
}

impl Provider for StaticProvider {
    fn info(&self, ticker: &Ticker) -> Result<InfoSnapshot> {
        Ok(self.lookup(ticker)?.map(|d| d.info.clone()).unwrap_or_default())
    }

    fn income_statement(&self, ticker: &Ticker) -> Result<Statement> {
        Ok(self.lookup(ticker)?.map(|d| d.income.clone()).unwrap_or_default())
    }

    fn balance_sheet(&self, ticker: &Ticker) -> Result<Statement> {
        Ok(self.lookup(ticker)?.map(|d| d.balance.clone()).unwrap_or_default())
    }

    fn cash_flow(&self, ticker: &Ticker) -> Result<Statement> {
        Ok(self.lookup(ticker)?.map(|d| d.cash_flow.clone()).unwrap_or_default())
    }

    fn dividends(&self, ticker: &Ticker) -> Result<Vec<Dividend>> {
        Ok(self.lookup(ticker)?.map(|d| d.dividends.clone()).unwrap_or_default())
    }

    fn daily_closes(&self, ticker: &Ticker, from: NaiveDate, to: NaiveDate) -> Result<Vec<PricePoint>> {
        let closes = self
            .lookup(ticker)?
            .map(|d| {
                d.closes
                    .iter()
                    .filter(|p| p.date >= from && p.date <= to)
                    .copied()
                    .collect()
            })
            .unwrap_or_default();
        Ok(closes)
    }
}
