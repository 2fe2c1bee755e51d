//! Background fetching of info snapshots.
//!
//! A `Fetcher` owns a shared provider and a cancellation flag. Requests for
//! several tickers are spread over a small pool of worker threads; jobs and
//! results travel over `crossbeam_channel` channels. The caller blocks until
//! every snapshot has arrived, a request fails, or the cancellation flag is
//! raised. On cancellation the call returns immediately; requests already in
//! flight finish on their worker threads and their results are dropped.
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use crossbeam_channel::{RecvTimeoutError, unbounded};
use log::{debug, error, info};

use crate::Result;
use crate::error::SigmaError;
use crate::model::info::InfoSnapshot;
use crate::provider::Provider;
use crate::tickers::Ticker;

/// Default number of concurrent provider requests.
pub const DEFAULT_WORKERS: usize = 4;
/// How often the collector checks the cancellation flag.
const POLL_INTERVAL_MS: u64 = 50;

/// Runs provider requests on worker threads with cooperative cancellation.
#[derive(Clone)]
pub struct Fetcher {
    provider: Arc<dyn Provider>,
    cancel: Arc<AtomicBool>,
    workers: usize,
}

impl Fetcher {
    /// Fetcher over `provider`, stopped when `cancel` becomes `true`.
    pub fn new(provider: Arc<dyn Provider>, cancel: Arc<AtomicBool>) -> Self {
        Self {
            provider,
            cancel,
            workers: DEFAULT_WORKERS,
        }
    }

    /// Limit the number of concurrent requests (at least one).
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// The underlying provider, for synchronous calls.
    pub fn provider(&self) -> &dyn Provider {
        self.provider.as_ref()
    }

    /// `true` once cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    /// Info snapshots for `tickers`, in the same order.
    ///
    /// Fails with the first provider error observed, or `Cancelled`.
    pub fn snapshots(&self, tickers: &[Ticker]) -> Result<Vec<InfoSnapshot>> {
        if self.is_cancelled() {
            return Err(SigmaError::Cancelled);
        }
        if tickers.is_empty() {
            return Ok(Vec::new());
        }

        let (job_tx, job_rx) = unbounded::<(usize, Ticker)>();
        let (result_tx, result_rx) = unbounded::<(usize, Result<InfoSnapshot>)>();
        let stop = Arc::new(AtomicBool::new(false));

        for job in tickers.iter().cloned().enumerate() {
            // The receiver is alive until the workers below drop it.
            let _ = job_tx.send(job);
        }
        drop(job_tx);

        let workers = self.workers.min(tickers.len());
        debug!("Fetching {} snapshots on {} workers", tickers.len(), workers);
        for _ in 0..workers {
            let provider = Arc::clone(&self.provider);
            let cancel = Arc::clone(&self.cancel);
            let stop = Arc::clone(&stop);
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            thread::spawn(move || {
                for (index, ticker) in job_rx.iter() {
                    if cancel.load(Ordering::Relaxed) || stop.load(Ordering::Relaxed) {
                        break;
                    }
                    let result = provider.info(&ticker);
                    if result_tx.send((index, result)).is_err() {
                        break;
                    }
                }
            });
        }
        drop(result_tx);

        let mut collected: Vec<Option<InfoSnapshot>> = vec![None; tickers.len()];
        let mut remaining = tickers.len();
        let poll = Duration::from_millis(POLL_INTERVAL_MS);

        while remaining > 0 {
            if self.is_cancelled() {
                stop.store(true, Ordering::Relaxed);
                info!("Fetch cancelled with {} requests outstanding", remaining);
                return Err(SigmaError::Cancelled);
            }
            match result_rx.recv_timeout(poll) {
                Ok((index, Ok(snapshot))) => {
                    collected[index] = Some(snapshot);
                    remaining -= 1;
                }
                Ok((index, Err(e))) => {
                    stop.store(true, Ordering::Relaxed);
                    error!("Fetching {} failed: {}", tickers[index], e);
                    return Err(e);
                }
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        if self.is_cancelled() {
            return Err(SigmaError::Cancelled);
        }
        collected
            .into_iter()
            .zip(tickers)
            .map(|(snapshot, ticker)| {
                snapshot.ok_or_else(|| {
                    SigmaError::ProviderUnavailable(format!("no response for {}", ticker))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::price::{Dividend, PricePoint};
    use crate::model::statement::Statement;
    use crate::provider::{StaticProvider, TickerData};
    use chrono::NaiveDate;

    fn ticker(s: &str) -> Ticker {
        s.parse().unwrap()
    }

    fn priced(price: f64) -> TickerData {
        TickerData {
            info: InfoSnapshot {
                current_price: Some(price),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn returns_snapshots_in_input_order() {
        let provider = StaticProvider::new()
            .with(ticker("AAPL"), priced(1.0))
            .with(ticker("MSFT"), priced(2.0))
            .with(ticker("TSLA"), priced(3.0));
        let fetcher = Fetcher::new(Arc::new(provider), Arc::new(AtomicBool::new(false))).with_workers(2);

        let tickers = vec![ticker("TSLA"), ticker("AAPL"), ticker("MSFT")];
        let prices: Vec<Option<f64>> = fetcher
            .snapshots(&tickers)
            .unwrap()
            .iter()
            .map(|s| s.current_price)
            .collect();
        assert_eq!(prices, vec![Some(3.0), Some(1.0), Some(2.0)]);
    }

    #[test]
    fn first_provider_error_is_returned() {
        let provider = StaticProvider::new()
            .with(ticker("AAPL"), priced(1.0))
            .unavailable(ticker("MSFT"));
        let fetcher = Fetcher::new(Arc::new(provider), Arc::new(AtomicBool::new(false)));

        let result = fetcher.snapshots(&[ticker("AAPL"), ticker("MSFT")]);
        assert!(matches!(result, Err(SigmaError::ProviderUnavailable(_))));
    }

    #[test]
    fn raised_flag_cancels_before_fetching() {
        let fetcher = Fetcher::new(Arc::new(StaticProvider::new()), Arc::new(AtomicBool::new(true)));
        assert!(matches!(fetcher.snapshots(&[ticker("AAPL")]), Err(SigmaError::Cancelled)));
    }

    struct SlowProvider;

    impl Provider for SlowProvider {
        fn info(&self, _ticker: &Ticker) -> Result<InfoSnapshot> {
            thread::sleep(Duration::from_secs(2));
            Ok(InfoSnapshot::default())
        }
        fn income_statement(&self, _ticker: &Ticker) -> Result<Statement> {
            Ok(Statement::new())
        }
        fn balance_sheet(&self, _ticker: &Ticker) -> Result<Statement> {
            Ok(Statement::new())
        }
        fn cash_flow(&self, _ticker: &Ticker) -> Result<Statement> {
            Ok(Statement::new())
        }
        fn dividends(&self, _ticker: &Ticker) -> Result<Vec<Dividend>> {
            Ok(Vec::new())
        }
        fn daily_closes(&self, _ticker: &Ticker, _from: NaiveDate, _to: NaiveDate) -> Result<Vec<PricePoint>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn cancellation_interrupts_slow_requests() {
        let cancel = Arc::new(AtomicBool::new(false));
        let fetcher = Fetcher::new(Arc::new(SlowProvider), Arc::clone(&cancel));

        let trigger = Arc::clone(&cancel);
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(100));
            trigger.store(true, Ordering::SeqCst);
        });

        let started = std::time::Instant::now();
        let result = fetcher.snapshots(&[ticker("AAPL"), ticker("MSFT")]);
        assert!(matches!(result, Err(SigmaError::Cancelled)));
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
