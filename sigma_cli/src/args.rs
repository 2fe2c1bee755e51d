//! Command-line arguments for `sigmasight`.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sigma_common::Ticker;
use sigma_common::fetch::DEFAULT_WORKERS;
use sigma_common::metrics::Metric;
use sigma_common::store::DEFAULT_STORE_FILE;

use crate::alphavantage::DEFAULT_BASE_URL;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about = "Stock research from the terminal", long_about = None)]
pub struct Args {
    /// Path of the JSON watchlist store.
    #[clap(long, default_value = DEFAULT_STORE_FILE)]
    pub store: PathBuf,

    /// Alpha Vantage API key.
    #[clap(long, env = "ALPHAVANTAGE_API_KEY", default_value = "demo", hide_env_values = true)]
    pub api_key: String,

    /// Base URL of the Alpha Vantage API.
    #[clap(long, env = "ALPHAVANTAGE_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Number of concurrent provider requests for watchlist-wide commands.
    #[clap(long, default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    /// Print results as JSON instead of text.
    #[clap(long)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show or edit the watchlist.
    #[command(subcommand)]
    Watchlist(WatchlistCommand),

    /// Rank watchlist tickers by distance below their 200-day average.
    Dip,

    /// Quality score of one company.
    Score {
        /// Ticker to score.
        ticker: Ticker,
    },

    /// Data behind one dashboard chart.
    Chart {
        /// Ticker to chart.
        ticker: Ticker,
        /// One of: ytd-price, revenue, ebitda, free-cash-flow, net-income, eps,
        /// cash-debt, dividend-rate, shares-outstanding, market-cap,
        /// enterprise-value, pe-ratio.
        metric: Metric,
    },

    /// Dividend, balance, margins, value and quality panels for one ticker.
    Summary {
        /// Ticker to summarise.
        ticker: Ticker,
    },
}

/// Watchlist subcommands.
#[derive(Debug, Subcommand)]
pub enum WatchlistCommand {
    /// Price and day change of every listed ticker.
    List,

    /// Add tickers the provider knows about.
    Add {
        /// Tickers to add.
        #[clap(required = true)]
        tickers: Vec<Ticker>,
    },

    /// Remove tickers.
    Remove {
        /// Tickers to remove.
        #[clap(required = true)]
        tickers: Vec<Ticker>,
    },

    /// Add every ticker listed in a text file.
    /// Tickers may be separated by commas, spaces, or new lines.
    Import {
        /// File to read.
        path: PathBuf,
    },
}
