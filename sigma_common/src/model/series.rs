//! Year-indexed metric series.
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::Result;

/// Earliest fiscal year plotted for annual statement metrics.
pub const FIRST_YEAR: i32 = 2002;

/// One point of an annual series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearValue {
    /// Calendar year of the fiscal period end.
    pub year: i32,
    /// Metric value for that year.
    pub value: f64,
}

/// Ordered `(year, value)` pairs, ascending by year, at most one per year.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MetricSeries {
    points: Vec<YearValue>,
}

impl MetricSeries {
    /// Build a series from dated values.
    ///
    /// Non-finite values are dropped. When two dates fall in the same year the
    /// later one wins.
    pub fn from_dated<I>(values: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        let mut dated: Vec<(NaiveDate, f64)> = values
            .into_iter()
            .filter(|(_, v)| v.is_finite())
            .collect();
        dated.sort_by_key(|(date, _)| *date);

        let mut points: Vec<YearValue> = Vec::with_capacity(dated.len());
        for (date, value) in dated {
            let year = date.year();
            match points.last_mut() {
                Some(last) if last.year == year => last.value = value,
                _ => points.push(YearValue { year, value }),
            }
        }
        MetricSeries { points }
    }

    /// Build a series from already year-keyed values.
    pub fn from_years<I>(values: I) -> Self
    where
        I: IntoIterator<Item = (i32, f64)>,
    {
        let dated = values
            .into_iter()
            .filter_map(|(year, v)| NaiveDate::from_ymd_opt(year, 12, 31).map(|d| (d, v)));
        Self::from_dated(dated)
    }

    /// Keep only years `>= first_year`.
    pub fn since(mut self, first_year: i32) -> Self {
        self.points.retain(|p| p.year >= first_year);
        self
    }

    /// Points in ascending year order.
    pub fn points(&self) -> &[YearValue] {
        &self.points
    }

    /// Number of years in the series.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// `true` when no year survived filtering.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Value for the most recent year.
    pub fn latest(&self) -> Option<f64> {
        self.points.last().map(|p| p.value)
    }

    /// Value for the year before the most recent one in the series.
    pub fn previous(&self) -> Option<f64> {
        self.points.iter().rev().nth(1).map(|p| p.value)
    }

    /// Value for a given year.
    pub fn value_for(&self, year: i32) -> Option<f64> {
        self.points.iter().find(|p| p.year == year).map(|p| p.value)
    }

    /// Percent change of the latest value over the previous one.
    ///
    /// `None` when there is no previous value or it is zero.
    pub fn percent_change(&self) -> Option<f64> {
        let current = self.latest()?;
        let previous = self.previous().filter(|p| *p != 0.0)?;
        Some((current - previous) / previous * 100.0)
    }

    /// Combine with another series year by year; years missing on either
    /// side are skipped.
    pub fn zip_with<F>(&self, other: &MetricSeries, mut f: F) -> Result<MetricSeries>
    where
        F: FnMut(i32, f64, f64) -> Result<f64>,
    {
        let mut points = Vec::new();
        for p in &self.points {
            if let Some(o) = other.value_for(p.year) {
                points.push(YearValue {
                    year: p.year,
                    value: f(p.year, p.value, o)?,
                });
            }
        }
        Ok(MetricSeries { points })
    }

    /// Apply a fallible function to each value.
    pub fn try_map<F>(&self, mut f: F) -> Result<MetricSeries>
    where
        F: FnMut(i32, f64) -> Result<Option<f64>>,
    {
        let mut points = Vec::new();
        for p in &self.points {
            if let Some(value) = f(p.year, p.value)? {
                points.push(YearValue { year: p.year, value });
            }
        }
        Ok(MetricSeries { points })
    }
}
