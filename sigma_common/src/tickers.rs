//! Ticker symbols and parsing helpers shared between the library and the CLI.

use std::fmt;
use std::io::BufRead;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SigmaError;

/// Longest symbol accepted, exchange suffix included (e.g. `BRK-B`, `SHOP.TO`).
const MAX_LEN: usize = 10;

/// Trait providing list parsing for tickers.
pub trait TickerParser {
    /// Parses tickers from a buffered reader.
    ///
    /// Symbols may be separated by commas, whitespace or new lines. Returns an
    /// error if any symbol is invalid.
    fn parse_from_reader<R: BufRead>(reader: R) -> Result<Vec<Ticker>, SigmaError>;
}

impl TickerParser for Ticker {
    fn parse_from_reader<R: BufRead>(reader: R) -> Result<Vec<Self>, SigmaError> {
        let mut tickers = Vec::new();

        for line_result in reader.lines() {
            let line = line_result?;
            for raw in line.split(|c: char| c == ',' || c.is_whitespace()) {
                if raw.is_empty() {
                    continue;
                }
                let ticker = raw.parse::<Self>()?;
                if !tickers.contains(&ticker) {
                    tickers.push(ticker);
                }
            }
        }
        Ok(tickers)
    }
}

/// Upper-cased ticker symbol identifying a listed company.
#[derive(Debug, Clone, Serialize, Deserialize, Hash, Eq, PartialEq, Ord, PartialOrd)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    /// Symbol as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Ticker {
    type Err = SigmaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let symbol = s.trim().to_ascii_uppercase();
        let valid_chars = symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
        let starts_alnum = symbol
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphanumeric());

        if symbol.len() > MAX_LEN || !valid_chars || !starts_alnum {
            return Err(SigmaError::InvalidTicker(s.to_string()));
        }
        Ok(Ticker(symbol))
    }
}

impl TryFrom<String> for Ticker {
    type Error = SigmaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Ticker> for String {
    fn from(ticker: Ticker) -> Self {
        ticker.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Ticker {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
