//! Dip ranking: how far each ticker trades below its 200-day moving average.
use serde::Serialize;

use crate::Result;
use crate::error::SigmaError;
use crate::fetch::Fetcher;
use crate::model::info::{Field, InfoSnapshot};
use crate::store::Watchlist;
use crate::tickers::Ticker;

/// One row of a dip ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DipEntry {
    /// Ranked ticker.
    pub ticker: Ticker,
    /// `(price - avg200) / avg200 * 100`; negative means below the average.
    pub percent: f64,
}

/// Percent deviation of `price` from `average`.
pub fn dip_percent(price: f64, average: f64) -> Result<f64> {
    if average == 0.0 {
        return Err(SigmaError::DivisionByZero("dip percent (200-day average is zero)".to_string()));
    }
    Ok((price - average) / average * 100.0)
}

/// Dip percent for one ticker from its info snapshot.
///
/// Both the current price and the 200-day average are required.
pub fn entry_from_snapshot(ticker: &Ticker, info: &InfoSnapshot) -> Result<DipEntry> {
    let price = info.require(ticker, Field::CurrentPrice)?;
    let average = info.require(ticker, Field::TwoHundredDayAverage)?;
    let percent = dip_percent(price, average)?;
    Ok(DipEntry {
        ticker: ticker.clone(),
        percent,
    })
}

/// Sort entries ascending by percent, biggest dip first.
///
/// The sort is stable: entries with equal percent keep their input order.
pub fn rank(mut entries: Vec<DipEntry>) -> Vec<DipEntry> {
    entries.sort_by(|a, b| a.percent.total_cmp(&b.percent));
    entries
}

/// Dip ranking of every ticker on the watchlist.
///
/// Snapshots are fetched concurrently through `fetcher`. An empty watchlist
/// is `EmptyStore`.
pub fn rank_watchlist(fetcher: &Fetcher, watchlist: &Watchlist) -> Result<Vec<DipEntry>> {
    if watchlist.is_empty() {
        return Err(SigmaError::EmptyStore);
    }
    let snapshots = fetcher.snapshots(watchlist.tickers())?;
    let entries = watchlist
        .tickers()
        .iter()
        .zip(&snapshots)
        .map(|(ticker, info)| entry_from_snapshot(ticker, info))
        .collect::<Result<Vec<_>>>()?;
    Ok(rank(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{StaticProvider, TickerData};
    use std::sync::Arc;
    use std::sync::atomic::AtomicBool;

    fn ticker(s: &str) -> Ticker {
        s.parse().unwrap()
    }

    fn entry(s: &str, percent: f64) -> DipEntry {
        DipEntry {
            ticker: ticker(s),
            percent,
        }
    }

    fn quoted(price: f64, average: f64) -> TickerData {
        TickerData {
            info: InfoSnapshot {
                current_price: Some(price),
                two_hundred_day_average: Some(average),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn fetcher(provider: StaticProvider) -> Fetcher {
        Fetcher::new(Arc::new(provider), Arc::new(AtomicBool::new(false)))
    }

    #[test]
    fn ranks_biggest_dip_first() {
        let ranked = rank(vec![entry("A", 5.0), entry("B", -3.0), entry("C", -10.0)]);
        let order: Vec<&str> = ranked.iter().map(|e| e.ticker.as_str()).collect();
        assert_eq!(order, vec!["C", "B", "A"]);
    }

    #[test]
    fn ties_keep_watchlist_order() {
        let ranked = rank(vec![entry("X", 1.0), entry("Y", -2.0), entry("Z", 1.0)]);
        let order: Vec<&str> = ranked.iter().map(|e| e.ticker.as_str()).collect();
        assert_eq!(order, vec!["Y", "X", "Z"]);
    }

    #[test]
    fn percent_is_relative_to_the_average() {
        assert_eq!(dip_percent(96.0, 128.0).unwrap(), -25.0);
        assert_eq!(dip_percent(160.0, 128.0).unwrap(), 25.0);
    }

    #[test]
    fn zero_average_is_division_by_zero() {
        assert!(matches!(dip_percent(10.0, 0.0), Err(SigmaError::DivisionByZero(_))));
    }

    #[test]
    fn missing_price_is_missing_field() {
        let info = InfoSnapshot {
            two_hundred_day_average: Some(100.0),
            ..Default::default()
        };
        match entry_from_snapshot(&ticker("AAPL"), &info) {
            Err(SigmaError::MissingField { field, .. }) => assert_eq!(field, Field::CurrentPrice),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn ranks_watchlist_from_provider() {
        let provider = StaticProvider::new()
            .with(ticker("AAPL"), quoted(160.0, 128.0))
            .with(ticker("MSFT"), quoted(96.0, 128.0))
            .with(ticker("TSLA"), quoted(64.0, 128.0));
        let watchlist = Watchlist::from_tickers(vec![ticker("AAPL"), ticker("MSFT"), ticker("TSLA")]);

        let ranked = rank_watchlist(&fetcher(provider), &watchlist).unwrap();
        let order: Vec<(&str, f64)> = ranked
            .iter()
            .map(|e| (e.ticker.as_str(), e.percent))
            .collect();
        assert_eq!(order, vec![("TSLA", -50.0), ("MSFT", -25.0), ("AAPL", 25.0)]);
    }

    #[test]
    fn empty_watchlist_is_empty_store() {
        let result = rank_watchlist(&fetcher(StaticProvider::new()), &Watchlist::new());
        assert!(matches!(result, Err(SigmaError::EmptyStore)));
    }

    #[test]
    fn zero_average_in_watchlist_surfaces_error() {
        let provider = StaticProvider::new()
            .with(ticker("AAPL"), quoted(105.0, 100.0))
            .with(ticker("NEW"), quoted(10.0, 0.0));
        let watchlist = Watchlist::from_tickers(vec![ticker("AAPL"), ticker("NEW")]);

        let result = rank_watchlist(&fetcher(provider), &watchlist);
        assert!(matches!(result, Err(SigmaError::DivisionByZero(_))));
    }
}
