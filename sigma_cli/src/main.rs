//! sigmasight: stock research from the terminal.
//!
//! Keeps a watchlist of tickers in a JSON file and prints research figures for
//! them using Alpha Vantage as the data source: the watchlist with day change,
//! a ranking of how far each ticker trades below its 200-day average, a
//! Piotroski-style quality score, the data behind the dashboard charts, and
//! the side-panel summary of one company.
//!
//! Usage example (CLI):
//! ```bash
//! export ALPHAVANTAGE_API_KEY=...
//! sigmasight watchlist add AAPL MSFT KO
//! sigmasight dip
//! sigmasight chart MSFT revenue
//! sigmasight --json summary KO
//! ```
//!
//! `watchlist import` reads tickers separated by commas, spaces, or new lines.
//! See `sigma_common::tickers` for details.
#![warn(missing_docs)]
mod alphavantage;
mod args;
mod model;
mod report;

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::process::ExitCode;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use chrono::Local;
use clap::Parser;
use log::{debug, error, info, warn};
use sigma_common::fetch::Fetcher;
use sigma_common::provider::Provider;
use sigma_common::store::{Watchlist, WatchlistStore};
use sigma_common::summary::{self, Summary};
use sigma_common::tickers::TickerParser;
use sigma_common::{Result, SigmaError, Ticker, dip, metrics, quality};

use crate::alphavantage::AlphaVantage;
use crate::args::{Args, Command, WatchlistCommand};

fn main() -> ExitCode {
    init_logger();
    let args = Args::parse();
    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = cancel.clone();
        if let Err(e) = ctrlc::set_handler(move || {
            info!("Ctrl+C received. Cancelling...");
            cancel.store(true, Ordering::SeqCst);
        }) {
            warn!("Could not install Ctrl+C handler: {}", e);
        }
    }

    let result = AlphaVantage::new(&args.base_url, &args.api_key).and_then(|provider| {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        run(args, Arc::new(provider), cancel, &mut out)
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}

/// Execute one parsed command against `provider`, writing results to `out`.
fn run<W: Write>(args: Args, provider: Arc<dyn Provider>, cancel: Arc<AtomicBool>, out: &mut W) -> Result<()> {
    let fetcher = Fetcher::new(provider, cancel).with_workers(args.workers);
    let store = WatchlistStore::new(&args.store);
    debug!("Using watchlist store {}", store.path().display());

    match args.command {
        Command::Watchlist(WatchlistCommand::List) => {
            let watchlist = store.load()?;
            let rows = summary::watch_rows(&fetcher, &watchlist)?;
            if args.json {
                report::json(out, &rows)
            } else {
                report::watchlist(out, &rows)
            }
        }
        Command::Watchlist(WatchlistCommand::Add { tickers }) => {
            let watchlist = add_all(&store, &fetcher, &tickers)?;
            print_tickers(out, &watchlist, args.json)
        }
        Command::Watchlist(WatchlistCommand::Import { path }) => {
            let file = File::open(&path)?;
            let tickers = Ticker::parse_from_reader(BufReader::new(file))?;
            info!("Importing {} tickers from {}", tickers.len(), path.display());
            let watchlist = add_all(&store, &fetcher, &tickers)?;
            print_tickers(out, &watchlist, args.json)
        }
        Command::Watchlist(WatchlistCommand::Remove { tickers }) => {
            let mut watchlist = store.load()?;
            for ticker in &tickers {
                watchlist = store.remove(ticker, watchlist)?;
            }
            print_tickers(out, &watchlist, args.json)
        }
        Command::Dip => {
            let watchlist = store.load()?;
            let ranking = dip::rank_watchlist(&fetcher, &watchlist)?;
            if args.json {
                report::json(out, &ranking)
            } else {
                report::dip(out, &ranking)
            }
        }
        Command::Score { ticker } => {
            let score = quality::score(fetcher.provider(), &ticker)?;
            if args.json {
                report::json(out, &score)
            } else {
                report::quality(out, &ticker, &score)
            }
        }
        Command::Chart { ticker, metric } => {
            let today = Local::now().date_naive();
            let data = metrics::derive(fetcher.provider(), &ticker, metric, today)?;
            if args.json {
                report::json(out, &data)
            } else {
                report::chart(out, &ticker, metric, &data)
            }
        }
        Command::Summary { ticker } => {
            let summary = Summary::gather(fetcher.provider(), &ticker)?;
            if args.json {
                report::json(out, &summary)
            } else {
                report::summary(out, &summary)
            }
        }
    }
}

/// Add `tickers` one by one, stopping early on Ctrl+C.
fn add_all(store: &WatchlistStore, fetcher: &Fetcher, tickers: &[Ticker]) -> Result<Watchlist> {
    let mut watchlist = store.load()?;
    for ticker in tickers {
        if fetcher.is_cancelled() {
            return Err(SigmaError::Cancelled);
        }
        watchlist = store.add(fetcher.provider(), ticker, watchlist)?;
    }
    Ok(watchlist)
}

fn print_tickers<W: Write>(out: &mut W, watchlist: &Watchlist, json: bool) -> Result<()> {
    if json {
        return report::json(out, watchlist);
    }
    let symbols: Vec<&str> = watchlist.tickers().iter().map(Ticker::as_str).collect();
    writeln!(out, "Watchlist: {}", symbols.join(", "))?;
    Ok(())
}
