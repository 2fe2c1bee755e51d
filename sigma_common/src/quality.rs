//! Piotroski-style quality score.
//!
//! Nine boolean criteria over the latest two fiscal periods, grouped as
//! profitability (4), leverage (3) and efficiency (2). The score is the number
//! of criteria that pass and maps onto a five-step rating.
//!
//! A criterion whose inputs the provider did not supply is *unknown*: it does
//! not pass, and it is listed in [`QualityScore::unknown`] so callers can tell
//! "failed" from "could not be evaluated".
use serde::Serialize;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::Result;
use crate::model::info::InfoSnapshot;
use crate::model::statement::{LineItem, Statement};
use crate::provider::Provider;
use crate::tickers::Ticker;

/// Group a criterion belongs to.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, Serialize)]
pub enum Category {
    Profitability,
    Leverage,
    Efficiency,
}

/// The nine scoring criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
#[strum(serialize_all = "kebab-case")]
pub enum Criterion {
    /// Net income of the latest period is positive.
    PositiveNetIncome,
    /// Return on assets is positive.
    PositiveReturnOnAssets,
    /// Operating cash flow of the latest period is positive.
    PositiveOperatingCashFlow,
    /// Operating cash flow exceeds net income.
    CashFlowAboveNetIncome,
    /// Total debt fell from the previous period.
    LowerDebt,
    /// Current ratio exceeds the previous period's assets-to-liabilities ratio.
    HigherCurrentRatio,
    /// Shares outstanding did not grow from the previous period.
    NoDilution,
    /// Gross profit grew from the previous period.
    HigherGrossProfit,
    /// Asset turnover (revenue / total assets) grew from the previous period.
    HigherAssetTurnover,
}

impl Criterion {
    /// Category of the criterion.
    pub fn category(self) -> Category {
        match self {
            Criterion::PositiveNetIncome
            | Criterion::PositiveReturnOnAssets
            | Criterion::PositiveOperatingCashFlow
            | Criterion::CashFlowAboveNetIncome => Category::Profitability,
            Criterion::LowerDebt | Criterion::HigherCurrentRatio | Criterion::NoDilution => {
                Category::Leverage
            }
            Criterion::HigherGrossProfit | Criterion::HigherAssetTurnover => Category::Efficiency,
        }
    }
}

/// Ordinal quality rating.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, EnumString, EnumIter, Serialize)]
pub enum QualityRating {
    Low,
    Okay,
    Medium,
    High,
    Superb,
}

impl QualityRating {
    /// Rating for a score: `<2` Low, `<4` Okay, `<6` Medium, `<8` High, else Superb.
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=1 => QualityRating::Low,
            2..=3 => QualityRating::Okay,
            4..=5 => QualityRating::Medium,
            6..=7 => QualityRating::High,
            _ => QualityRating::Superb,
        }
    }
}

/// Scalar inputs for the criteria, latest and previous period.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QualityInputs {
    pub net_income: Option<f64>,
    pub return_on_assets: Option<f64>,
    pub operating_cash_flow: Option<f64>,
    pub total_debt: Option<f64>,
    pub previous_total_debt: Option<f64>,
    pub current_ratio: Option<f64>,
    pub previous_total_assets: Option<f64>,
    pub previous_total_liabilities: Option<f64>,
    pub shares_outstanding: Option<f64>,
    pub previous_shares_outstanding: Option<f64>,
    pub gross_profit: Option<f64>,
    pub previous_gross_profit: Option<f64>,
    pub asset_turnover: Option<f64>,
    pub previous_asset_turnover: Option<f64>,
}

fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    let d = denominator.filter(|d| *d != 0.0)?;
    Some(numerator? / d)
}

impl QualityInputs {
    /// Collect the inputs from an info snapshot and the three statements.
    pub fn from_statements(
        info: &InfoSnapshot,
        income: &Statement,
        balance: &Statement,
        cash_flow: &Statement,
    ) -> Self {
        let net_income = income.latest(LineItem::NetIncome);
        let return_on_assets = info
            .return_on_assets
            .or_else(|| ratio(net_income, balance.latest(LineItem::TotalAssets)));
        let current_ratio = info.current_ratio.or_else(|| {
            ratio(
                balance.latest(LineItem::CurrentAssets),
                balance.latest(LineItem::CurrentLiabilities),
            )
        });

        let turnover = income
            .series(LineItem::TotalRevenue)
            .zip_with(&balance.series(LineItem::TotalAssets), |_, revenue, assets| {
                Ok(revenue / assets)
            })
            .and_then(|t| t.try_map(|_, v| Ok(Some(v).filter(|v| v.is_finite()))))
            .unwrap_or_default();

        QualityInputs {
            net_income,
            return_on_assets,
            operating_cash_flow: cash_flow.latest(LineItem::OperatingCashFlow),
            total_debt: balance.latest(LineItem::TotalDebt),
            previous_total_debt: balance.previous(LineItem::TotalDebt),
            current_ratio,
            previous_total_assets: balance.previous(LineItem::TotalAssets),
            previous_total_liabilities: balance.previous(LineItem::TotalLiabilities),
            shares_outstanding: balance.latest(LineItem::OrdinarySharesNumber),
            previous_shares_outstanding: balance.previous(LineItem::OrdinarySharesNumber),
            gross_profit: income.latest(LineItem::GrossProfit),
            previous_gross_profit: income.previous(LineItem::GrossProfit),
            asset_turnover: turnover.latest(),
            previous_asset_turnover: turnover.previous(),
        }
    }

    /// Fetch everything the criteria need for `ticker`.
    pub fn gather(provider: &dyn Provider, ticker: &Ticker) -> Result<Self> {
        let info = provider.info(ticker)?;
        let income = provider.income_statement(ticker)?;
        let balance = provider.balance_sheet(ticker)?;
        let cash_flow = provider.cash_flow(ticker)?;
        Ok(Self::from_statements(&info, &income, &balance, &cash_flow))
    }

    /// Outcome of one criterion; `None` when an input is missing.
    pub fn evaluate(&self, criterion: Criterion) -> Option<bool> {
        match criterion {
            Criterion::PositiveNetIncome => Some(self.net_income? > 0.0),
            Criterion::PositiveReturnOnAssets => Some(self.return_on_assets? > 0.0),
            Criterion::PositiveOperatingCashFlow => Some(self.operating_cash_flow? > 0.0),
            Criterion::CashFlowAboveNetIncome => {
                Some(self.operating_cash_flow? > self.net_income?)
            }
            Criterion::LowerDebt => Some(self.total_debt? < self.previous_total_debt?),
            Criterion::HigherCurrentRatio => {
                let previous = ratio(self.previous_total_assets, self.previous_total_liabilities)?;
                Some(self.current_ratio? > previous)
            }
            Criterion::NoDilution => {
                Some(self.shares_outstanding? <= self.previous_shares_outstanding?)
            }
            Criterion::HigherGrossProfit => Some(self.gross_profit? > self.previous_gross_profit?),
            Criterion::HigherAssetTurnover => {
                Some(self.asset_turnover? > self.previous_asset_turnover?)
            }
        }
    }
}

/// Result of scoring one company.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityScore {
    /// Number of passing criteria, 0 to 9.
    pub score: u8,
    /// Rating derived from `score`.
    pub rating: QualityRating,
    /// Criteria that passed.
    pub passed: Vec<Criterion>,
    /// Criteria that could not be evaluated.
    pub unknown: Vec<Criterion>,
}

impl QualityScore {
    /// Score a set of criterion outcomes.
    pub fn from_outcomes<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = (Criterion, Option<bool>)>,
    {
        let mut passed = Vec::new();
        let mut unknown = Vec::new();
        for (criterion, outcome) in outcomes {
            match outcome {
                Some(true) => passed.push(criterion),
                Some(false) => {}
                None => unknown.push(criterion),
            }
        }
        let score = passed.len() as u8;
        QualityScore {
            score,
            rating: QualityRating::from_score(score),
            passed,
            unknown,
        }
    }

    /// Evaluate all nine criteria against `inputs`.
    pub fn evaluate(inputs: &QualityInputs) -> Self {
        Self::from_outcomes(Criterion::iter().map(|c| (c, inputs.evaluate(c))))
    }

    /// Passing criteria within one category.
    pub fn passed_in(&self, category: Category) -> usize {
        self.passed.iter().filter(|c| c.category() == category).count()
    }
}

/// Fetch inputs for `ticker` and score them.
pub fn score(provider: &dyn Provider, ticker: &Ticker) -> Result<QualityScore> {
    let inputs = QualityInputs::gather(provider, ticker)?;
    Ok(QualityScore::evaluate(&inputs))
}
