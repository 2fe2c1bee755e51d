//! Side-panel figures for one ticker and per-row figures for the watchlist.
use chrono::NaiveDate;
use serde::Serialize;

use crate::Result;
use crate::error::SigmaError;
use crate::fetch::Fetcher;
use crate::model::info::{Field, InfoSnapshot};
use crate::model::statement::{LineItem, Statement};
use crate::provider::Provider;
use crate::quality::{QualityInputs, QualityScore};
use crate::store::Watchlist;
use crate::tickers::Ticker;

/// Longest company name shown on a watchlist row before truncation.
pub const MAX_NAME_CHARS: usize = 15;

/// Dividend panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DividendPanel {
    /// Dividend yield as reported by the provider.
    pub dividend_yield: Option<f64>,
    /// Payout ratio in percent, rounded to two decimals.
    pub payout_ratio_percent: Option<f64>,
    /// Last ex-dividend date.
    pub ex_dividend_date: Option<NaiveDate>,
    /// Next payment date.
    pub payment_date: Option<NaiveDate>,
}

/// Balance panel, latest balance sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BalancePanel {
    /// Cash and cash equivalents.
    pub cash: Option<f64>,
    /// Total debt.
    pub debt: Option<f64>,
    /// Cash minus debt.
    pub net: Option<f64>,
}

/// Margins and growth panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MarginsPanel {
    /// Profit margin as a ratio.
    pub profit_margin: Option<f64>,
    /// Operating margin as a ratio.
    pub operating_margin: Option<f64>,
    /// Gross profit of the latest period.
    pub gross_profit: Option<f64>,
    /// Total revenue of the latest period.
    pub revenue: Option<f64>,
    /// Revenue change over the previous period, in percent.
    pub revenue_growth_percent: Option<f64>,
}

/// Valuation panel.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValuePanel {
    pub market_cap: Option<f64>,
    pub trailing_pe: Option<f64>,
    pub price_to_sales: Option<f64>,
    pub ev_to_ebitda: Option<f64>,
    pub price_to_book: Option<f64>,
    pub free_cash_flow: Option<f64>,
}

/// Every side-panel figure for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Ticker summarised.
    pub ticker: Ticker,
    /// Company name, if known.
    pub name: Option<String>,
    /// Dividend panel.
    pub dividend: DividendPanel,
    /// Balance panel.
    pub balance: BalancePanel,
    /// Margins and growth panel.
    pub margins: MarginsPanel,
    /// Valuation panel.
    pub value: ValuePanel,
    /// Quality score panel.
    pub quality: QualityScore,
}

/// Round to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl Summary {
    /// Assemble the panels from already fetched data.
    pub fn from_parts(
        ticker: &Ticker,
        info: &InfoSnapshot,
        income: &Statement,
        balance: &Statement,
        cash_flow: &Statement,
    ) -> Self {
        let cash = balance.latest(LineItem::CashAndCashEquivalents);
        let debt = balance.latest(LineItem::TotalDebt);
        let net = cash.zip(debt).map(|(c, d)| c - d);

        let inputs = QualityInputs::from_statements(info, income, balance, cash_flow);

        Summary {
            ticker: ticker.clone(),
            name: info.short_name.clone(),
            dividend: DividendPanel {
                dividend_yield: info.get(Field::DividendYield),
                payout_ratio_percent: info.get(Field::PayoutRatio).map(|r| round2(r * 100.0)),
                ex_dividend_date: info.ex_dividend_date,
                payment_date: info.dividend_date,
            },
            balance: BalancePanel { cash, debt, net },
            margins: MarginsPanel {
                profit_margin: info.get(Field::ProfitMargins),
                operating_margin: info.get(Field::OperatingMargins),
                gross_profit: income.latest(LineItem::GrossProfit),
                revenue: income.latest(LineItem::TotalRevenue),
                revenue_growth_percent: income.series(LineItem::TotalRevenue).percent_change(),
            },
            value: ValuePanel {
                market_cap: info.get(Field::MarketCap),
                trailing_pe: info.get(Field::TrailingPe),
                price_to_sales: info.get(Field::PriceToSales),
                ev_to_ebitda: info.get(Field::EnterpriseToEbitda),
                price_to_book: info.get(Field::PriceToBook),
                free_cash_flow: info.get(Field::FreeCashflow),
            },
            quality: QualityScore::evaluate(&inputs),
        }
    }

    /// Fetch everything the panels need for `ticker`.
    pub fn gather(provider: &dyn Provider, ticker: &Ticker) -> Result<Self> {
        let info = provider.info(ticker)?;
        let income = provider.income_statement(ticker)?;
        let balance = provider.balance_sheet(ticker)?;
        let cash_flow = provider.cash_flow(ticker)?;
        Ok(Self::from_parts(ticker, &info, &income, &balance, &cash_flow))
    }
}

/// Figures shown on one watchlist row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WatchRow {
    /// Listed ticker.
    pub ticker: Ticker,
    /// Company name, truncated for display; `N/A` when unknown.
    pub name: String,
    /// Current price.
    pub price: f64,
    /// Change against the previous close in percent, two decimals.
    pub change_percent: f64,
}

/// Shorten long company names to [`MAX_NAME_CHARS`] characters plus `...`.
pub fn truncate_name(name: &str) -> String {
    if name.chars().count() > MAX_NAME_CHARS {
        let head: String = name.chars().take(MAX_NAME_CHARS).collect();
        format!("{}...", head)
    } else {
        name.to_string()
    }
}

/// Day change of `price` against `previous_close`, in percent, two decimals.
pub fn change_percent(price: f64, previous_close: f64) -> Result<f64> {
    if previous_close == 0.0 {
        return Err(SigmaError::DivisionByZero("day change (previous close is zero)".to_string()));
    }
    Ok(round2((price - previous_close) / previous_close * 100.0))
}

impl WatchRow {
    /// Row figures from an info snapshot; price and previous close are required.
    pub fn from_snapshot(ticker: &Ticker, info: &InfoSnapshot) -> Result<Self> {
        let price = info.require(ticker, Field::CurrentPrice)?;
        let previous_close = info.require(ticker, Field::PreviousClose)?;
        Ok(WatchRow {
            ticker: ticker.clone(),
            name: truncate_name(info.short_name.as_deref().unwrap_or("N/A")),
            price,
            change_percent: change_percent(price, previous_close)?,
        })
    }
}

/// Rows for every watchlist ticker, in watchlist order.
pub fn watch_rows(fetcher: &Fetcher, watchlist: &Watchlist) -> Result<Vec<WatchRow>> {
    let snapshots = fetcher.snapshots(watchlist.tickers())?;
    watchlist
        .tickers()
        .iter()
        .zip(&snapshots)
        .map(|(ticker, info)| WatchRow::from_snapshot(ticker, info))
        .collect()
}
