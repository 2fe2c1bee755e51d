//! Watchlist persistence.
//!
//! The watchlist is an ordered list of unique tickers stored as a JSON array
//! of strings in a single file. Every mutation rewrites the whole file; the
//! write is not atomic. A missing, empty or unreadable file is treated as an
//! empty watchlist so a damaged store never stops the program.
//!
//! Mutations are pure with respect to the in-memory list: they take the
//! current `Watchlist` by value and hand back the resulting one.
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::error::SigmaError;
use crate::provider::Provider;
use crate::tickers::Ticker;

/// File name used when no store path is configured.
pub const DEFAULT_STORE_FILE: &str = "watchlist_config.json";

/// Ordered list of unique tickers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Watchlist {
    tickers: Vec<Ticker>,
}

impl Watchlist {
    /// Empty watchlist.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from tickers, keeping the first occurrence of duplicates.
    pub fn from_tickers<I: IntoIterator<Item = Ticker>>(tickers: I) -> Self {
        tickers
            .into_iter()
            .fold(Watchlist::new(), |list, t| list.with_ticker(t).0)
    }

    /// Tickers in insertion order.
    pub fn tickers(&self) -> &[Ticker] {
        &self.tickers
    }

    /// `true` if the ticker is on the list.
    pub fn contains(&self, ticker: &Ticker) -> bool {
        self.tickers.contains(ticker)
    }

    /// Number of tickers.
    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    /// `true` if the list has no tickers.
    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }

    /// List with `ticker` appended, and whether it changed.
    pub fn with_ticker(mut self, ticker: Ticker) -> (Self, bool) {
        if self.contains(&ticker) {
            return (self, false);
        }
        self.tickers.push(ticker);
        (self, true)
    }

    /// List with `ticker` removed, and whether it changed.
    pub fn without_ticker(mut self, ticker: &Ticker) -> (Self, bool) {
        let before = self.tickers.len();
        self.tickers.retain(|t| t != ticker);
        let changed = self.tickers.len() != before;
        (self, changed)
    }
}

/// File-backed watchlist store.
#[derive(Debug, Clone)]
pub struct WatchlistStore {
    path: PathBuf,
}

impl WatchlistStore {
    /// Store backed by the file at `path`. Nothing is touched until the first call.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the store file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted watchlist.
    ///
    /// A missing file is created holding `[]`. An empty or corrupt file is
    /// logged and read as an empty list.
    pub fn load(&self) -> Result<Watchlist> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("Creating watchlist store at {}", self.path.display());
                self.save(&Watchlist::new())?;
                return Ok(Watchlist::new());
            }
            Err(e) => return Err(e.into()),
        };

        match Self::parse(&contents) {
            Ok(watchlist) => {
                debug!("Loaded {} tickers from {}", watchlist.len(), self.path.display());
                Ok(watchlist)
            }
            Err(SigmaError::EmptyStore) => {
                warn!("Watchlist store {} is empty, starting with no tickers", self.path.display());
                Ok(Watchlist::new())
            }
            Err(e) => {
                warn!(
                    "Watchlist store {} is unreadable, treating it as empty: {}",
                    self.path.display(),
                    e
                );
                Ok(Watchlist::new())
            }
        }
    }

    /// Overwrite the store with `watchlist`.
    pub fn save(&self, watchlist: &Watchlist) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec(watchlist)?;
        fs::write(&self.path, json)?;
        debug!("Saved {} tickers to {}", watchlist.len(), self.path.display());
        Ok(())
    }

    /// Append `ticker` if the provider knows it and it is not listed yet.
    ///
    /// Already-listed tickers and tickers the provider has no data for leave
    /// the list and the file untouched.
    pub fn add(&self, provider: &dyn Provider, ticker: &Ticker, watchlist: Watchlist) -> Result<Watchlist> {
        if watchlist.contains(ticker) {
            info!("{} is already on the watchlist", ticker);
            return Ok(watchlist);
        }

        let snapshot = provider.info(ticker)?;
        if snapshot.is_empty() {
            warn!("Provider returned no data for {}, not adding it", ticker);
            return Ok(watchlist);
        }

        let (watchlist, _) = watchlist.with_ticker(ticker.clone());
        self.save(&watchlist)?;
        info!("Added {} to the watchlist", ticker);
        Ok(watchlist)
    }

    /// Remove `ticker` if listed.
    pub fn remove(&self, ticker: &Ticker, watchlist: Watchlist) -> Result<Watchlist> {
        let (watchlist, changed) = watchlist.without_ticker(ticker);
        if changed {
            self.save(&watchlist)?;
            info!("Removed {} from the watchlist", ticker);
        } else {
            info!("{} is not on the watchlist", ticker);
        }
        Ok(watchlist)
    }

    fn parse(contents: &str) -> Result<Watchlist> {
        if contents.trim().is_empty() {
            return Err(SigmaError::EmptyStore);
        }
        let tickers: Vec<Ticker> = serde_json::from_str(contents)?;
        Ok(Watchlist::from_tickers(tickers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::info::InfoSnapshot;
    use crate::provider::{StaticProvider, TickerData};
    use tempfile::TempDir;

    fn ticker(s: &str) -> Ticker {
        s.parse().unwrap()
    }

    fn known(symbols: &[&str]) -> StaticProvider {
        symbols.iter().fold(StaticProvider::new(), |p, s| {
            p.with(
                ticker(s),
                TickerData {
                    info: InfoSnapshot {
                        short_name: Some(format!("{} Corp", s)),
                        current_price: Some(100.0),
                        ..Default::default()
                    },
                    ..Default::default()
                },
            )
        })
    }

    fn store_in(dir: &TempDir) -> WatchlistStore {
        WatchlistStore::new(dir.path().join(DEFAULT_STORE_FILE))
    }

    #[test]
    fn missing_file_loads_empty_and_is_created() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(!store.path().exists());

        let watchlist = store.load().unwrap();
        assert!(watchlist.is_empty());
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "[]");
    }

    #[test]
    fn empty_and_corrupt_files_load_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        fs::write(store.path(), "").unwrap();
        assert!(store.load().unwrap().is_empty());

        fs::write(store.path(), "{\"not\": \"a list\"").unwrap();
        assert!(store.load().unwrap().is_empty());

        fs::write(store.path(), "[\"AAPL\", 42]").unwrap();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn add_then_load_contains_ticker_once() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let provider = known(&["AAPL", "MSFT"]);

        let list = store.load().unwrap();
        let list = store.add(&provider, &ticker("AAPL"), list).unwrap();
        let list = store.add(&provider, &ticker("MSFT"), list).unwrap();
        assert_eq!(list.len(), 2);

        let reloaded = store.load().unwrap();
        assert_eq!(reloaded, list);
        assert_eq!(
            reloaded.tickers().iter().filter(|t| t.as_str() == "AAPL").count(),
            1
        );
        assert_eq!(fs::read_to_string(store.path()).unwrap(), r#"["AAPL","MSFT"]"#);
    }

    #[test]
    fn add_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let provider = known(&["AAPL"]);

        let list = store.add(&provider, &ticker("AAPL"), Watchlist::new()).unwrap();
        let list = store.add(&provider, &ticker("aapl"), list).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[test]
    fn add_without_provider_data_is_a_no_op() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let provider = known(&["AAPL"]);

        let list = store.add(&provider, &ticker("ZZZZ"), Watchlist::new()).unwrap();
        assert!(list.is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn add_propagates_provider_failure() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let provider = StaticProvider::new().unavailable(ticker("AAPL"));

        let result = store.add(&provider, &ticker("AAPL"), Watchlist::new());
        assert!(matches!(result, Err(SigmaError::ProviderUnavailable(_))));
    }

    #[test]
    fn remove_then_load_excludes_ticker() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let provider = known(&["AAPL", "MSFT", "TSLA"]);

        let list = ["AAPL", "MSFT", "TSLA"]
            .iter()
            .try_fold(Watchlist::new(), |list, s| store.add(&provider, &ticker(s), list))
            .unwrap();

        let list = store.remove(&ticker("MSFT"), list).unwrap();
        let reloaded = store.load().unwrap();
        assert_eq!(reloaded, list);
        assert!(!reloaded.contains(&ticker("MSFT")));
        assert_eq!(
            reloaded.tickers(),
            &[ticker("AAPL"), ticker("TSLA")]
        );
    }

    #[test]
    fn remove_absent_ticker_leaves_file_alone() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), r#"["AAPL"]"#).unwrap();

        let list = store.load().unwrap();
        let list = store.remove(&ticker("MSFT"), list).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(fs::read_to_string(store.path()).unwrap(), r#"["AAPL"]"#);
    }

    #[test]
    fn duplicate_entries_in_file_are_collapsed() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), r#"["AAPL","msft","AAPL"]"#).unwrap();

        let list = store.load().unwrap();
        assert_eq!(list.tickers(), &[ticker("AAPL"), ticker("MSFT")]);
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let store = WatchlistStore::new(dir.path().join("nested").join("list.json"));
        store.save(&Watchlist::from_tickers(vec![ticker("AAPL")])).unwrap();
        assert_eq!(store.load().unwrap().len(), 1);
    }
}
