//! Alpha Vantage implementation of the `Provider` trait.
//!
//! Every call is one blocking `GET {base_url}/query?function=..&symbol=..&apikey=..`.
//! Alpha Vantage answers throttling and bad keys with HTTP 200 and a `Note`,
//! `Information` or `Error Message` body; those become `ProviderUnavailable`.
use std::time::Duration;

use chrono::NaiveDate;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde_json::Value;
use sigma_common::model::info::InfoSnapshot;
use sigma_common::model::price::{Dividend, PricePoint};
use sigma_common::model::statement::{LineItem, Statement};
use sigma_common::provider::Provider;
use sigma_common::{Result, SigmaError, Ticker};

use crate::model::responses::{
    self, BALANCE_ITEMS, CASH_FLOW_ITEMS, DailySeriesResponse, DividendsResponse, Fields,
    GlobalQuoteResponse, INCOME_ITEMS, ReportsResponse,
};

/// Public Alpha Vantage endpoint.
pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co";

/// Request timeout for a single call.
const TIMEOUT_SECS: u64 = 15;

/// Body keys Alpha Vantage uses to report a refused request.
const REFUSAL_KEYS: [&str; 3] = ["Error Message", "Note", "Information"];

/// Blocking Alpha Vantage client.
pub struct AlphaVantage {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
}

impl AlphaVantage {
    /// Client for `base_url` authenticating with `api_key`.
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .build()
            .map_err(|e| SigmaError::Http(e.to_string()))?;
        Ok(AlphaVantage {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Run one query and return the raw JSON body.
    fn query(&self, function: &str, ticker: &Ticker, extra: &[(&str, &str)]) -> Result<Value> {
        let url = format!("{}/query", self.base_url);
        debug!("GET {} function={} symbol={}", url, function, ticker);

        let mut params = vec![
            ("function", function),
            ("symbol", ticker.as_str()),
            ("apikey", self.api_key.as_str()),
        ];
        params.extend_from_slice(extra);

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .map_err(|e| SigmaError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SigmaError::ProviderUnavailable(format!(
                "{} for {} returned HTTP {}",
                function, ticker, status
            )));
        }

        let body: Value = response.json().map_err(|e| SigmaError::Http(e.to_string()))?;
        check_refusal(function, ticker, &body)?;
        Ok(body)
    }

    fn query_as<T: DeserializeOwned>(&self, function: &str, ticker: &Ticker, extra: &[(&str, &str)]) -> Result<T> {
        let body = self.query(function, ticker, extra)?;
        Ok(serde_json::from_value(body)?)
    }

    fn statement(&self, function: &str, ticker: &Ticker, items: &[(&str, LineItem)]) -> Result<Statement> {
        let response: ReportsResponse = self.query_as(function, ticker, &[])?;
        if response.annual_reports.is_empty() {
            warn!("{}: no annual reports for {}", function, ticker);
        }
        Ok(responses::into_statement(&response.annual_reports, items))
    }
}

fn check_refusal(function: &str, ticker: &Ticker, body: &Value) -> Result<()> {
    for key in REFUSAL_KEYS {
        if let Some(message) = body.get(key).and_then(Value::as_str) {
            warn!("{} for {} refused: {}", function, ticker, message);
            return Err(SigmaError::ProviderUnavailable(format!("{}: {}", key, message)));
        }
    }
    Ok(())
}

impl Provider for AlphaVantage {
    fn info(&self, ticker: &Ticker) -> Result<InfoSnapshot> {
        let overview: Fields = self.query_as("OVERVIEW", ticker, &[])?;
        if overview.is_empty() {
            // Unknown symbols come back as `{}`.
            debug!("OVERVIEW for {} is empty", ticker);
            return Ok(InfoSnapshot::default());
        }
        let quote: GlobalQuoteResponse = self.query_as("GLOBAL_QUOTE", ticker, &[])?;
        Ok(responses::into_snapshot(&overview, &quote.quote))
    }

    fn income_statement(&self, ticker: &Ticker) -> Result<Statement> {
        self.statement("INCOME_STATEMENT", ticker, INCOME_ITEMS)
    }

    fn balance_sheet(&self, ticker: &Ticker) -> Result<Statement> {
        self.statement("BALANCE_SHEET", ticker, BALANCE_ITEMS)
    }

    fn cash_flow(&self, ticker: &Ticker) -> Result<Statement> {
        self.statement("CASH_FLOW", ticker, CASH_FLOW_ITEMS)
    }

    fn dividends(&self, ticker: &Ticker) -> Result<Vec<Dividend>> {
        let response: DividendsResponse = self.query_as("DIVIDENDS", ticker, &[])?;
        Ok(responses::into_dividends(response))
    }

    fn daily_closes(&self, ticker: &Ticker, from: NaiveDate, to: NaiveDate) -> Result<Vec<PricePoint>> {
        let response: DailySeriesResponse =
            self.query_as("TIME_SERIES_DAILY", ticker, &[("outputsize", "full")])?;
        Ok(responses::into_closes(response, from, to))
    }
}
