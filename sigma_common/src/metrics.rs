//! Chart metrics derived from provider data.
//!
//! Each [`Metric`] corresponds to one chart of the research dashboard. Annual
//! metrics are keyed by the calendar year of the fiscal period end, start at
//! [`FIRST_YEAR`] and drop years with missing inputs. The derivation helpers
//! are pure functions over statements and prices; [`derive`] wires them to a
//! provider.
use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use log::debug;
use serde::Serialize;
use strum_macros::{Display, EnumIter, EnumString};

use crate::Result;
use crate::error::SigmaError;
use crate::model::price::{Dividend, PricePoint, close_on_or_before};
use crate::model::series::{FIRST_YEAR, MetricSeries};
use crate::model::statement::{LineItem, Statement};
use crate::provider::Provider;
use crate::tickers::Ticker;

/// Earliest year shown on the dividend chart.
pub const FIRST_DIVIDEND_YEAR: i32 = 2000;

/// The twelve dashboard charts.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize)]
#[strum(serialize_all = "kebab-case")]
pub enum Metric {
    YtdPrice,
    Revenue,
    Ebitda,
    FreeCashFlow,
    NetIncome,
    Eps,
    CashDebt,
    DividendRate,
    SharesOutstanding,
    MarketCap,
    EnterpriseValue,
    PeRatio,
}

impl Metric {
    /// Chart title.
    pub fn title(self) -> &'static str {
        match self {
            Metric::YtdPrice => "Year-to-Date Price",
            Metric::Revenue => "Revenue",
            Metric::Ebitda => "EBITDA",
            Metric::FreeCashFlow => "Free Cash Flow",
            Metric::NetIncome => "Net Income",
            Metric::Eps => "Earnings Per Share (EPS)",
            Metric::CashDebt => "Cash & Debt",
            Metric::DividendRate => "Dividend Rate ($)",
            Metric::SharesOutstanding => "Shares Outstanding",
            Metric::MarketCap => "Market Capitalization",
            Metric::EnterpriseValue => "Enterprise Value",
            Metric::PeRatio => "Price/Earnings Ratio (P/E)",
        }
    }
}

/// Data behind one chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MetricData {
    /// Daily closes.
    Daily(Vec<PricePoint>),
    /// One value per year.
    Annual(MetricSeries),
    /// Annual revenue with the latest year-over-year change.
    Revenue {
        /// Total revenue per year.
        series: MetricSeries,
        /// Change of the latest year over the previous one, in percent.
        growth_percent: Option<f64>,
    },
    /// Cash and debt side by side.
    CashDebt {
        /// Cash and cash equivalents.
        cash: MetricSeries,
        /// Total debt.
        debt: MetricSeries,
    },
}

/// Line item as an annual series from [`FIRST_YEAR`] on.
pub fn annual(statement: &Statement, item: LineItem) -> MetricSeries {
    statement.series(item).since(FIRST_YEAR)
}

/// Free cash flow; falls back to operating cash flow minus capital
/// expenditure when the table has no free cash flow row.
pub fn free_cash_flow(cash_flow: &Statement) -> Result<MetricSeries> {
    let reported = annual(cash_flow, LineItem::FreeCashFlow);
    if !reported.is_empty() {
        return Ok(reported);
    }
    annual(cash_flow, LineItem::OperatingCashFlow).zip_with(
        &annual(cash_flow, LineItem::CapitalExpenditure),
        |_, ocf, capex| Ok(ocf - capex.abs()),
    )
}

/// Net income per ordinary share.
pub fn eps(income: &Statement, balance: &Statement) -> Result<MetricSeries> {
    annual(income, LineItem::NetIncome).zip_with(
        &annual(balance, LineItem::OrdinarySharesNumber),
        |year, net_income, shares| {
            if shares == 0.0 {
                return Err(SigmaError::DivisionByZero(format!("EPS for {} (zero shares)", year)));
            }
            Ok(net_income / shares)
        },
    )
}

/// Close on (or the last trading day before) each fiscal period end.
fn closes_at_period_ends(closes: &[PricePoint], statement: &Statement) -> MetricSeries {
    let dated = statement
        .period_ends()
        .filter_map(|date| close_on_or_before(closes, *date).map(|close| (*date, close)));
    MetricSeries::from_dated(dated).since(FIRST_YEAR)
}

/// Share count times the close at each balance sheet date.
pub fn market_cap(closes: &[PricePoint], balance: &Statement) -> Result<MetricSeries> {
    closes_at_period_ends(closes, balance).zip_with(
        &annual(balance, LineItem::OrdinarySharesNumber),
        |_, close, shares| Ok(close * shares),
    )
}

/// Market cap plus total debt minus cash.
pub fn enterprise_value(closes: &[PricePoint], balance: &Statement) -> Result<MetricSeries> {
    market_cap(closes, balance)?
        .zip_with(&annual(balance, LineItem::TotalDebt), |_, cap, debt| Ok(cap + debt))?
        .zip_with(
            &annual(balance, LineItem::CashAndCashEquivalents),
            |_, value, cash| Ok(value - cash),
        )
}

/// Close at each fiscal period end over that year's EPS.
pub fn pe_ratio(closes: &[PricePoint], income: &Statement, balance: &Statement) -> Result<MetricSeries> {
    closes_at_period_ends(closes, income).zip_with(&eps(income, balance)?, |year, close, eps| {
        if eps == 0.0 {
            return Err(SigmaError::DivisionByZero(format!("P/E for {} (zero EPS)", year)));
        }
        Ok(close / eps)
    })
}

/// Dividends summed per calendar year from [`FIRST_DIVIDEND_YEAR`].
///
/// Years between the first and last payment without a payment count as zero.
pub fn dividend_rate(dividends: &[Dividend]) -> MetricSeries {
    let mut per_year: BTreeMap<i32, f64> = BTreeMap::new();
    for dividend in dividends.iter().filter(|d| d.amount.is_finite()) {
        *per_year.entry(dividend.date.year()).or_insert(0.0) += dividend.amount;
    }
    let (Some(&first), Some(&last)) = (per_year.keys().next(), per_year.keys().next_back()) else {
        return MetricSeries::default();
    };
    let filled = (first..=last).map(|year| (year, per_year.get(&year).copied().unwrap_or(0.0)));
    MetricSeries::from_years(filled).since(FIRST_DIVIDEND_YEAR)
}

/// First day of the year `today` falls in.
pub fn year_start(today: NaiveDate) -> NaiveDate {
    today.with_ordinal(1).unwrap_or(today)
}

/// Fetch and derive one metric for `ticker` as of `today`.
pub fn derive(provider: &dyn Provider, ticker: &Ticker, metric: Metric, today: NaiveDate) -> Result<MetricData> {
    debug!("Deriving {} for {}", metric, ticker);
    let history_start = NaiveDate::from_ymd_opt(FIRST_YEAR, 1, 1).unwrap_or(today);

    let data = match metric {
        Metric::YtdPrice => MetricData::Daily(provider.daily_closes(ticker, year_start(today), today)?),
        Metric::Revenue => {
            let series = annual(&provider.income_statement(ticker)?, LineItem::TotalRevenue);
            MetricData::Revenue {
                growth_percent: series.percent_change(),
                series,
            }
        }
        Metric::Ebitda => MetricData::Annual(annual(&provider.income_statement(ticker)?, LineItem::Ebitda)),
        Metric::NetIncome => MetricData::Annual(annual(&provider.income_statement(ticker)?, LineItem::NetIncome)),
        Metric::FreeCashFlow => MetricData::Annual(free_cash_flow(&provider.cash_flow(ticker)?)?),
        Metric::SharesOutstanding => {
            MetricData::Annual(annual(&provider.balance_sheet(ticker)?, LineItem::OrdinarySharesNumber))
        }
        Metric::Eps => {
            let income = provider.income_statement(ticker)?;
            let balance = provider.balance_sheet(ticker)?;
            MetricData::Annual(eps(&income, &balance)?)
        }
        Metric::CashDebt => {
            let balance = provider.balance_sheet(ticker)?;
            MetricData::CashDebt {
                cash: annual(&balance, LineItem::CashAndCashEquivalents),
                debt: annual(&balance, LineItem::TotalDebt),
            }
        }
        Metric::DividendRate => MetricData::Annual(dividend_rate(&provider.dividends(ticker)?)),
        Metric::MarketCap => {
            let balance = provider.balance_sheet(ticker)?;
            let closes = provider.daily_closes(ticker, history_start, today)?;
            MetricData::Annual(market_cap(&closes, &balance)?)
        }
        Metric::EnterpriseValue => {
            let balance = provider.balance_sheet(ticker)?;
            let closes = provider.daily_closes(ticker, history_start, today)?;
            MetricData::Annual(enterprise_value(&closes, &balance)?)
        }
        Metric::PeRatio => {
            let income = provider.income_statement(ticker)?;
            let balance = provider.balance_sheet(ticker)?;
            let closes = provider.daily_closes(ticker, history_start, today)?;
            MetricData::Annual(pe_ratio(&closes, &income, &balance)?)
        }
    };
    Ok(data)
}
