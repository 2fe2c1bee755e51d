//! Annual financial statement tables (income statement, balance sheet, cash flow).
use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use crate::model::series::MetricSeries;

/// Line items read from statement tables.
///
/// The display form is the row label used in the statement tables.
#[allow(missing_docs)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter, Serialize, Deserialize,
)]
pub enum LineItem {
    #[strum(serialize = "Total Revenue")]
    TotalRevenue,
    #[strum(serialize = "EBITDA")]
    Ebitda,
    #[strum(serialize = "Gross Profit")]
    GrossProfit,
    #[strum(serialize = "Net Income")]
    NetIncome,
    #[strum(serialize = "Operating Cash Flow")]
    OperatingCashFlow,
    #[strum(serialize = "Capital Expenditure")]
    CapitalExpenditure,
    #[strum(serialize = "Free Cash Flow")]
    FreeCashFlow,
    #[strum(serialize = "Ordinary Shares Number")]
    OrdinarySharesNumber,
    #[strum(serialize = "Cash And Cash Equivalents")]
    CashAndCashEquivalents,
    #[strum(serialize = "Total Debt")]
    TotalDebt,
    #[strum(serialize = "Total Assets")]
    TotalAssets,
    #[strum(serialize = "Total Liabilities Net Minority Interest")]
    TotalLiabilities,
    #[strum(serialize = "Current Assets")]
    CurrentAssets,
    #[strum(serialize = "Current Liabilities")]
    CurrentLiabilities,
}

/// One annual statement table: fiscal period end → line item → value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Statement {
    periods: BTreeMap<NaiveDate, BTreeMap<LineItem, f64>>,
}

impl Statement {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `item` for the period ending on `period_end`.
    pub fn insert(&mut self, period_end: NaiveDate, item: LineItem, value: f64) {
        self.periods.entry(period_end).or_default().insert(item, value);
    }

    /// Builder-style [`Statement::insert`].
    pub fn with(mut self, period_end: NaiveDate, item: LineItem, value: f64) -> Self {
        self.insert(period_end, item, value);
        self
    }

    /// `true` when the provider returned no periods.
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// Non-missing values of `item`, oldest period first.
    pub fn values(&self, item: LineItem) -> Vec<(NaiveDate, f64)> {
        self.periods
            .iter()
            .filter_map(|(date, row)| row.get(&item).filter(|v| v.is_finite()).map(|v| (*date, *v)))
            .collect()
    }

    /// Annual series of `item`, years keyed by fiscal period end.
    pub fn series(&self, item: LineItem) -> MetricSeries {
        MetricSeries::from_dated(self.values(item))
    }

    /// Most recent non-missing value of `item`.
    pub fn latest(&self, item: LineItem) -> Option<f64> {
        self.values(item).last().map(|(_, v)| *v)
    }

    /// Non-missing value of `item` one period before the latest one.
    pub fn previous(&self, item: LineItem) -> Option<f64> {
        self.values(item).iter().rev().nth(1).map(|(_, v)| *v)
    }

    /// Fiscal period end dates, oldest first.
    pub fn period_ends(&self) -> impl Iterator<Item = &NaiveDate> {
        self.periods.keys()
    }
}
