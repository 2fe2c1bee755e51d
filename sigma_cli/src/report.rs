//! Text and JSON rendering of command results.
//!
//! Every function writes to a `Write` so the output can be checked in tests;
//! `main` passes a locked stdout.
use std::collections::BTreeSet;
use std::io::Write;

use serde::Serialize;
use sigma_common::Result;
use sigma_common::Ticker;
use sigma_common::dip::DipEntry;
use sigma_common::format::{self, NOT_AVAILABLE};
use sigma_common::metrics::{Metric, MetricData};
use sigma_common::model::series::MetricSeries;
use sigma_common::quality::{Category, Criterion, QualityScore};
use sigma_common::summary::{Summary, WatchRow};
use strum::IntoEnumIterator;

/// Write `value` as pretty JSON followed by a newline.
pub fn json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn compact_or_na(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), format::compact)
}

/// Watchlist rows: ticker, name, price and day change.
pub fn watchlist<W: Write>(out: &mut W, rows: &[WatchRow]) -> Result<()> {
    if rows.is_empty() {
        writeln!(out, "Watchlist is empty")?;
        return Ok(());
    }
    writeln!(out, "{:<8} {:<18} {:>14} {:>9}", "TICKER", "NAME", "PRICE", "CHANGE")?;
    for row in rows {
        writeln!(
            out,
            "{:<8} {:<18} {:>14} {:>9}",
            row.ticker.as_str(),
            row.name,
            format::money(Some(row.price)),
            format!("{:+.2}%", row.change_percent),
        )?;
    }
    Ok(())
}

/// Dip ranking, biggest dip first.
pub fn dip<W: Write>(out: &mut W, entries: &[DipEntry]) -> Result<()> {
    writeln!(out, "{:>4} {:<8} {:>10}", "#", "TICKER", "VS 200D")?;
    for (rank, entry) in entries.iter().enumerate() {
        writeln!(
            out,
            "{:>4} {:<8} {:>10}",
            rank + 1,
            entry.ticker.as_str(),
            format!("{:+.2}%", entry.percent),
        )?;
    }
    Ok(())
}

fn mark(score: &QualityScore, criterion: Criterion) -> &'static str {
    if score.passed.contains(&criterion) {
        "[x]"
    } else if score.unknown.contains(&criterion) {
        "[?]"
    } else {
        "[ ]"
    }
}

/// Quality score with the outcome of every criterion.
pub fn quality<W: Write>(out: &mut W, ticker: &Ticker, score: &QualityScore) -> Result<()> {
    writeln!(out, "{} quality: {}/9 ({})", ticker, score.score, score.rating)?;
    for category in Category::iter() {
        let criteria: Vec<Criterion> = Criterion::iter().filter(|c| c.category() == category).collect();
        writeln!(out, "  {} {}/{}", category, score.passed_in(category), criteria.len())?;
        for criterion in criteria {
            writeln!(out, "    {} {}", mark(score, criterion), criterion)?;
        }
    }
    if !score.unknown.is_empty() {
        writeln!(out, "  [?] = not enough data")?;
    }
    Ok(())
}

/// Per-share and ratio metrics read better with decimals than with suffixes.
fn metric_value(metric: Metric, value: f64) -> String {
    match metric {
        Metric::Eps | Metric::DividendRate | Metric::PeRatio | Metric::YtdPrice => {
            format::decimal(Some(value))
        }
        _ => format::compact(value),
    }
}

fn annual_rows<W: Write>(out: &mut W, metric: Metric, series: &MetricSeries) -> Result<()> {
    for point in series.points() {
        writeln!(out, "{:<6} {:>12}", point.year, metric_value(metric, point.value))?;
    }
    Ok(())
}

/// Data behind one chart, one row per point.
pub fn chart<W: Write>(out: &mut W, ticker: &Ticker, metric: Metric, data: &MetricData) -> Result<()> {
    writeln!(out, "{} ({})", metric.title(), ticker)?;
    match data {
        MetricData::Daily(closes) if closes.is_empty() => writeln!(out, "No data")?,
        MetricData::Daily(closes) => {
            for point in closes {
                writeln!(out, "{} {:>12}", point.date, metric_value(metric, point.close))?;
            }
        }
        MetricData::Annual(series) if series.is_empty() => writeln!(out, "No data")?,
        MetricData::Annual(series) => annual_rows(out, metric, series)?,
        MetricData::Revenue { series, .. } if series.is_empty() => writeln!(out, "No data")?,
        MetricData::Revenue { series, growth_percent } => {
            annual_rows(out, metric, series)?;
            writeln!(out, "YoY change {:>13}", format::percent(*growth_percent))?;
        }
        MetricData::CashDebt { cash, debt } => {
            let years: BTreeSet<i32> = cash
                .points()
                .iter()
                .chain(debt.points())
                .map(|p| p.year)
                .collect();
            if years.is_empty() {
                writeln!(out, "No data")?;
                return Ok(());
            }
            writeln!(out, "{:<6} {:>12} {:>12}", "YEAR", "CASH", "DEBT")?;
            for year in years {
                writeln!(
                    out,
                    "{:<6} {:>12} {:>12}",
                    year,
                    compact_or_na(cash.value_for(year)),
                    compact_or_na(debt.value_for(year)),
                )?;
            }
        }
    }
    Ok(())
}

fn line<W: Write>(out: &mut W, label: &str, value: String) -> Result<()> {
    writeln!(out, "  {:<18} {:>14}", label, value)?;
    Ok(())
}

/// All side panels for one ticker.
pub fn summary<W: Write>(out: &mut W, summary: &Summary) -> Result<()> {
    writeln!(out, "{}  {}", summary.ticker, format::or_na(summary.name.as_deref()))?;

    writeln!(out, "Dividend")?;
    line(out, "Yield", format::ratio_percent(summary.dividend.dividend_yield))?;
    line(out, "Payout ratio", format::percent(summary.dividend.payout_ratio_percent))?;
    line(out, "Ex-dividend date", format::or_na(summary.dividend.ex_dividend_date))?;
    line(out, "Payment date", format::or_na(summary.dividend.payment_date))?;

    writeln!(out, "Balance")?;
    line(out, "Cash", compact_or_na(summary.balance.cash))?;
    line(out, "Debt", compact_or_na(summary.balance.debt))?;
    line(out, "Net", compact_or_na(summary.balance.net))?;

    writeln!(out, "Margins & growth")?;
    line(out, "Profit margin", format::ratio_percent(summary.margins.profit_margin))?;
    line(out, "Operating margin", format::ratio_percent(summary.margins.operating_margin))?;
    line(out, "Gross profit", compact_or_na(summary.margins.gross_profit))?;
    line(out, "Revenue", compact_or_na(summary.margins.revenue))?;
    line(out, "Revenue growth", format::percent(summary.margins.revenue_growth_percent))?;

    writeln!(out, "Value")?;
    line(out, "Market cap", compact_or_na(summary.value.market_cap))?;
    line(out, "Trailing P/E", format::decimal(summary.value.trailing_pe))?;
    line(out, "Price/sales", format::decimal(summary.value.price_to_sales))?;
    line(out, "EV/EBITDA", format::decimal(summary.value.ev_to_ebitda))?;
    line(out, "Price/book", format::decimal(summary.value.price_to_book))?;
    line(out, "Free cash flow", compact_or_na(summary.value.free_cash_flow))?;

    writeln!(out, "Quality")?;
    line(
        out,
        "Score",
        format!("{}/9 ({})", summary.quality.score, summary.quality.rating),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sigma_common::model::info::InfoSnapshot;
    use sigma_common::model::price::PricePoint;
    use sigma_common::model::statement::Statement;

    fn ticker(s: &str) -> Ticker {
        s.parse().unwrap()
    }

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> Result<()>,
    {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn watchlist_rows_show_signed_change() {
        let rows = vec![WatchRow {
            ticker: ticker("MSFT"),
            name: "Microsoft Corpo...".to_string(),
            price: 1234.5,
            change_percent: -5.0,
        }];
        let text = render(|out| watchlist(out, &rows));
        assert!(text.starts_with("TICKER"));
        assert!(text.contains("Microsoft Corpo..."));
        assert!(text.contains("$1,234.50"));
        assert!(text.contains("-5.00%"));
    }

    #[test]
    fn empty_watchlist_says_so() {
        assert_eq!(render(|out| watchlist(out, &[])), "Watchlist is empty\n");
    }

    #[test]
    fn dip_rows_are_numbered_in_order() {
        let entries = vec![
            DipEntry { ticker: ticker("C"), percent: -10.0 },
            DipEntry { ticker: ticker("A"), percent: 5.0 },
        ];
        let text = render(|out| dip(out, &entries));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains('C') && lines[1].contains("-10.00%"));
        assert!(lines[2].contains('A') && lines[2].contains("+5.00%"));
    }

    #[test]
    fn quality_marks_passed_failed_and_unknown() {
        let score = QualityScore::from_outcomes(Criterion::iter().map(|c| {
            let outcome = match c {
                Criterion::PositiveNetIncome => Some(true),
                Criterion::LowerDebt => None,
                _ => Some(false),
            };
            (c, outcome)
        }));
        let text = render(|out| quality(out, &ticker("KO"), &score));
        assert!(text.starts_with("KO quality: 1/9 (Low)"));
        assert!(text.contains("[x] positive-net-income"));
        assert!(text.contains("[?] lower-debt"));
        assert!(text.contains("[ ] no-dilution"));
        assert!(text.contains("Profitability 1/4"));
        assert!(text.contains("Leverage 0/3"));
    }

    #[test]
    fn cash_debt_chart_aligns_years() {
        let cash = MetricSeries::from_years(vec![(2022, 2.0e9), (2023, 3.0e9)]);
        let debt = MetricSeries::from_years(vec![(2023, 5.0e9)]);
        let data = MetricData::CashDebt { cash, debt };
        let text = render(|out| chart(out, &ticker("AAPL"), Metric::CashDebt, &data));
        assert!(text.starts_with("Cash & Debt (AAPL)"));
        let row_2022 = text.lines().find(|l| l.starts_with("2022")).unwrap();
        assert!(row_2022.contains("2B") && row_2022.contains("N/A"));
        let row_2023 = text.lines().find(|l| l.starts_with("2023")).unwrap();
        assert!(row_2023.contains("3B") && row_2023.contains("5B"));
    }

    #[test]
    fn revenue_chart_ends_with_yoy_change() {
        let data = MetricData::Revenue {
            series: MetricSeries::from_years(vec![(2022, 200.0e9), (2023, 250.0e9)]),
            growth_percent: Some(25.0),
        };
        let text = render(|out| chart(out, &ticker("MSFT"), Metric::Revenue, &data));
        assert!(text.starts_with("Revenue (MSFT)"));
        assert!(text.contains("250B"));
        let last = text.lines().last().unwrap();
        assert!(last.starts_with("YoY change") && last.ends_with("25.00%"));

        let single = MetricData::Revenue {
            series: MetricSeries::from_years(vec![(2023, 250.0e9)]),
            growth_percent: None,
        };
        let text = render(|out| chart(out, &ticker("MSFT"), Metric::Revenue, &single));
        assert!(text.lines().last().unwrap().ends_with("N/A"));
    }

    #[test]
    fn daily_chart_uses_decimals() {
        let closes = vec![PricePoint {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            close: 185.64,
        }];
        let text = render(|out| chart(out, &ticker("AAPL"), Metric::YtdPrice, &MetricData::Daily(closes)));
        assert!(text.contains("2024-01-02"));
        assert!(text.contains("185.64"));
    }

    #[test]
    fn summary_renders_missing_values_as_na() {
        let info = InfoSnapshot {
            short_name: Some("Acme".to_string()),
            market_cap: Some(3.4e12),
            ..Default::default()
        };
        let empty = Statement::new();
        let summary_data = Summary::from_parts(&ticker("ACME"), &info, &empty, &empty, &empty);
        let text = render(|out| summary(out, &summary_data));
        assert!(text.starts_with("ACME  Acme"));
        assert!(text.contains("3T"));
        assert!(text.contains("N/A"));
        assert!(text.contains("0/9 (Low)"));
    }

    #[test]
    fn json_output_is_parseable() {
        let entries = vec![DipEntry { ticker: ticker("KO"), percent: -2.5 }];
        let text = render(|out| json(out, &entries));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value[0]["ticker"], "KO");
        assert_eq!(value[0]["percent"], -2.5);
    }
}
