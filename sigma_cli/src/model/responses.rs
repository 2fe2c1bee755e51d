//! Raw Alpha Vantage payloads and their conversion into domain types.
//!
//! Alpha Vantage reports every number as a JSON string and marks absent
//! values with `"None"` or `"-"`. The shapes below keep those strings as-is;
//! the `into_*` conversions decide what counts as a number.
use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Deserialize;
use sigma_common::model::info::InfoSnapshot;
use sigma_common::model::price::{Dividend, PricePoint};
use sigma_common::model::statement::{LineItem, Statement};

/// Loose string map used by the overview and quote endpoints.
pub type Fields = HashMap<String, String>;

/// Income statement keys.
pub const INCOME_ITEMS: &[(&str, LineItem)] = &[
    ("totalRevenue", LineItem::TotalRevenue),
    ("ebitda", LineItem::Ebitda),
    ("grossProfit", LineItem::GrossProfit),
    ("netIncome", LineItem::NetIncome),
];

/// Balance sheet keys.
pub const BALANCE_ITEMS: &[(&str, LineItem)] = &[
    ("totalAssets", LineItem::TotalAssets),
    ("totalLiabilities", LineItem::TotalLiabilities),
    ("totalCurrentAssets", LineItem::CurrentAssets),
    ("totalCurrentLiabilities", LineItem::CurrentLiabilities),
    ("cashAndCashEquivalentsAtCarryingValue", LineItem::CashAndCashEquivalents),
    ("shortLongTermDebtTotal", LineItem::TotalDebt),
    ("commonStockSharesOutstanding", LineItem::OrdinarySharesNumber),
];

/// Cash flow statement keys.
pub const CASH_FLOW_ITEMS: &[(&str, LineItem)] = &[
    ("operatingCashflow", LineItem::OperatingCashFlow),
    ("capitalExpenditures", LineItem::CapitalExpenditure),
    ("netIncome", LineItem::NetIncome),
];

/// `GLOBAL_QUOTE` response.
#[derive(Debug, Deserialize)]
pub struct GlobalQuoteResponse {
    #[serde(rename = "Global Quote", default)]
    pub quote: Fields,
}

/// `INCOME_STATEMENT`, `BALANCE_SHEET` and `CASH_FLOW` responses.
#[derive(Debug, Deserialize)]
pub struct ReportsResponse {
    #[serde(rename = "annualReports", default)]
    pub annual_reports: Vec<Fields>,
}

/// One entry of the `DIVIDENDS` response.
#[derive(Debug, Deserialize)]
pub struct DividendRecord {
    #[serde(default)]
    pub ex_dividend_date: String,
    #[serde(default)]
    pub amount: String,
}

/// `DIVIDENDS` response.
#[derive(Debug, Deserialize)]
pub struct DividendsResponse {
    #[serde(default)]
    pub data: Vec<DividendRecord>,
}

/// One bar of `TIME_SERIES_DAILY`.
#[derive(Debug, Deserialize)]
pub struct DailyBar {
    #[serde(rename = "4. close")]
    pub close: String,
}

/// `TIME_SERIES_DAILY` response.
#[derive(Debug, Deserialize)]
pub struct DailySeriesResponse {
    #[serde(rename = "Time Series (Daily)", default)]
    pub series: HashMap<String, DailyBar>,
}

/// Parse a provider number; `"None"`, `"-"` and garbage are missing.
pub fn number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a `YYYY-MM-DD` date.
pub fn date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

fn field(fields: &Fields, key: &str) -> Option<f64> {
    fields.get(key).and_then(|v| number(v))
}

/// Merge the `OVERVIEW` and `GLOBAL_QUOTE` payloads into a snapshot.
///
/// The payout ratio is dividend per share over EPS.
pub fn into_snapshot(overview: &Fields, quote: &Fields) -> InfoSnapshot {
    let payout_ratio = match (field(overview, "DividendPerShare"), field(overview, "EPS")) {
        (Some(dps), Some(eps)) if eps != 0.0 => Some(dps / eps),
        _ => None,
    };

    InfoSnapshot {
        short_name: overview
            .get("Name")
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty() && n != "None"),
        current_price: field(quote, "05. price"),
        previous_close: field(quote, "08. previous close"),
        fifty_day_average: field(overview, "50DayMovingAverage"),
        two_hundred_day_average: field(overview, "200DayMovingAverage"),
        market_cap: field(overview, "MarketCapitalization"),
        trailing_pe: field(overview, "TrailingPE"),
        price_to_sales: field(overview, "PriceToSalesRatioTTM"),
        enterprise_to_ebitda: field(overview, "EVToEBITDA"),
        price_to_book: field(overview, "PriceToBookRatio"),
        free_cashflow: None,
        dividend_yield: field(overview, "DividendYield"),
        payout_ratio,
        ex_dividend_date: overview.get("ExDividendDate").and_then(|d| date(d)),
        dividend_date: overview.get("DividendDate").and_then(|d| date(d)),
        profit_margins: field(overview, "ProfitMargin"),
        operating_margins: field(overview, "OperatingMarginTTM"),
        return_on_assets: field(overview, "ReturnOnAssetsTTM"),
        current_ratio: None,
        shares_outstanding: field(overview, "SharesOutstanding"),
    }
}

/// Build a statement table from annual reports using a key mapping.
///
/// Reports without a parseable `fiscalDateEnding` are skipped.
pub fn into_statement(reports: &[Fields], items: &[(&str, LineItem)]) -> Statement {
    let mut statement = Statement::new();
    for report in reports {
        let Some(period_end) = report.get("fiscalDateEnding").and_then(|d| date(d)) else {
            continue;
        };
        for (key, item) in items {
            if let Some(value) = field(report, key) {
                statement.insert(period_end, *item, value);
            }
        }
    }
    statement
}

/// Dividend payments, oldest first.
pub fn into_dividends(response: DividendsResponse) -> Vec<Dividend> {
    let mut dividends: Vec<Dividend> = response
        .data
        .iter()
        .filter_map(|r| {
            Some(Dividend {
                date: date(&r.ex_dividend_date)?,
                amount: number(&r.amount)?,
            })
        })
        .collect();
    dividends.sort_by_key(|d| d.date);
    dividends
}

/// Daily closes within `[from, to]`, oldest first.
pub fn into_closes(response: DailySeriesResponse, from: NaiveDate, to: NaiveDate) -> Vec<PricePoint> {
    let mut closes: Vec<PricePoint> = response
        .series
        .iter()
        .filter_map(|(day, bar)| {
            Some(PricePoint {
                date: date(day)?,
                close: number(&bar.close)?,
            })
        })
        .filter(|p| p.date >= from && p.date <= to)
        .collect();
    closes.sort_by_key(|p| p.date);
    closes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> Fields {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn none_and_dash_are_missing_numbers() {
        assert_eq!(number("12.5"), Some(12.5));
        assert_eq!(number("None"), None);
        assert_eq!(number("-"), None);
        assert_eq!(number(""), None);
    }

    #[test]
    fn snapshot_merges_overview_and_quote() {
        let overview = fields(&[
            ("Name", "International Business Machines"),
            ("200DayMovingAverage", "180.54"),
            ("MarketCapitalization", "197991563000"),
            ("DividendPerShare", "6.6"),
            ("EPS", "8.8"),
            ("ExDividendDate", "2024-08-09"),
            ("TrailingPE", "None"),
        ]);
        let quote = fields(&[("05. price", "190.0"), ("08. previous close", "188.5")]);

        let info = into_snapshot(&overview, &quote);
        assert_eq!(info.short_name.as_deref(), Some("International Business Machines"));
        assert_eq!(info.current_price, Some(190.0));
        assert_eq!(info.previous_close, Some(188.5));
        assert_eq!(info.two_hundred_day_average, Some(180.54));
        assert_eq!(info.market_cap, Some(197_991_563_000.0));
        assert_eq!(info.payout_ratio, Some(0.75));
        assert_eq!(info.trailing_pe, None);
        assert_eq!(info.ex_dividend_date, NaiveDate::from_ymd_opt(2024, 8, 9));
    }

    #[test]
    fn empty_payloads_give_an_empty_snapshot() {
        assert!(into_snapshot(&Fields::new(), &Fields::new()).is_empty());
    }

    #[test]
    fn statement_maps_known_keys_and_skips_bad_rows() {
        let reports = vec![
            fields(&[("fiscalDateEnding", "2023-12-31"), ("totalRevenue", "61860000000"), ("ebitda", "None")]),
            fields(&[("fiscalDateEnding", "2022-12-31"), ("totalRevenue", "60530000000")]),
            fields(&[("totalRevenue", "1")]),
        ];
        let statement = into_statement(&reports, INCOME_ITEMS);
        assert_eq!(statement.latest(LineItem::TotalRevenue), Some(61_860_000_000.0));
        assert_eq!(statement.previous(LineItem::TotalRevenue), Some(60_530_000_000.0));
        assert_eq!(statement.latest(LineItem::Ebitda), None);
    }

    #[test]
    fn incomplete_dividend_records_are_skipped() {
        let raw = r#"{"symbol":"KO","data":[
            {"ex_dividend_date":"2024-06-14","amount":"0.485"},
            {"ex_dividend_date":"2024-03-14"},
            {"amount":"0.44"}
        ]}"#;
        let response: DividendsResponse = serde_json::from_str(raw).unwrap();
        let dividends = into_dividends(response);
        assert_eq!(dividends.len(), 1);
        assert_eq!(dividends[0].date, NaiveDate::from_ymd_opt(2024, 6, 14).unwrap());
        assert_eq!(dividends[0].amount, 0.485);
    }

    #[test]
    fn closes_are_sorted_and_clipped() {
        let raw = r#"{
            "Meta Data": {"2. Symbol": "IBM"},
            "Time Series (Daily)": {
                "2024-01-04": {"1. open": "1", "4. close": "162.0"},
                "2024-01-02": {"1. open": "1", "4. close": "160.0"},
                "2023-12-29": {"1. open": "1", "4. close": "163.5"}
            }
        }"#;
        let response: DailySeriesResponse = serde_json::from_str(raw).unwrap();
        let from = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        let closes = into_closes(response, from, to);
        let values: Vec<f64> = closes.iter().map(|p| p.close).collect();
        assert_eq!(values, vec![160.0, 162.0]);
    }
}
