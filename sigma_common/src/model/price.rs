//! Daily prices and dividend payments.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Closing price for one trading day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Trading day.
    pub date: NaiveDate,
    /// Close of that day.
    pub close: f64,
}

/// One dividend payment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dividend {
    /// Ex-dividend date.
    pub date: NaiveDate,
    /// Cash amount per share.
    pub amount: f64,
}

/// Last close on or before `date`.
///
/// `points` must be sorted by date, as providers return them.
pub fn close_on_or_before(points: &[PricePoint], date: NaiveDate) -> Option<f64> {
    let idx = points.partition_point(|p| p.date <= date);
    idx.checked_sub(1).map(|i| points[i].close)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(d: u32, close: f64) -> PricePoint {
        PricePoint {
            date: NaiveDate::from_ymd_opt(2024, 1, d).unwrap(),
            close,
        }
    }

    #[test]
    fn picks_the_last_trading_day_before_a_holiday() {
        let points = vec![point(2, 10.0), point(3, 11.0), point(5, 12.0)];
        let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
        assert_eq!(close_on_or_before(&points, day(1)), None);
        assert_eq!(close_on_or_before(&points, day(3)), Some(11.0));
        assert_eq!(close_on_or_before(&points, day(4)), Some(11.0));
        assert_eq!(close_on_or_before(&points, day(31)), Some(12.0));
    }
}
