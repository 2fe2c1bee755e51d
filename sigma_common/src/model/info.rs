//! Key/value info snapshot returned by a provider for one ticker.
//!
//! Every field is optional: providers omit what they do not know. The single
//! place that decides whether an absent field is tolerated or an error is
//! [`InfoSnapshot::require`]; display code uses [`InfoSnapshot::get`] and
//! renders `None` as `N/A`.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::error::SigmaError;
use crate::Result;

/// Numeric fields of an info snapshot.
///
/// The string form matches the provider key the value was read from.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "camelCase")]
pub enum Field {
    CurrentPrice,
    PreviousClose,
    FiftyDayAverage,
    TwoHundredDayAverage,
    MarketCap,
    #[strum(serialize = "trailingPE")]
    TrailingPe,
    #[strum(serialize = "priceToSalesTrailing12Months")]
    PriceToSales,
    EnterpriseToEbitda,
    PriceToBook,
    FreeCashflow,
    DividendYield,
    PayoutRatio,
    ProfitMargins,
    OperatingMargins,
    ReturnOnAssets,
    CurrentRatio,
    SharesOutstanding,
}

/// Info snapshot for one ticker.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InfoSnapshot {
    pub short_name: Option<String>,
    pub current_price: Option<f64>,
    pub previous_close: Option<f64>,
    pub fifty_day_average: Option<f64>,
    pub two_hundred_day_average: Option<f64>,
    pub market_cap: Option<f64>,
    #[serde(rename = "trailingPE")]
    pub trailing_pe: Option<f64>,
    #[serde(rename = "priceToSalesTrailing12Months")]
    pub price_to_sales: Option<f64>,
    pub enterprise_to_ebitda: Option<f64>,
    pub price_to_book: Option<f64>,
    pub free_cashflow: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub payout_ratio: Option<f64>,
    pub ex_dividend_date: Option<NaiveDate>,
    pub dividend_date: Option<NaiveDate>,
    pub profit_margins: Option<f64>,
    pub operating_margins: Option<f64>,
    pub return_on_assets: Option<f64>,
    pub current_ratio: Option<f64>,
    pub shares_outstanding: Option<f64>,
}

impl InfoSnapshot {
    /// `true` when the provider returned nothing usable for the ticker.
    pub fn is_empty(&self) -> bool {
        *self == InfoSnapshot::default()
    }

    /// Value of a numeric field, if the provider supplied it.
    pub fn get(&self, field: Field) -> Option<f64> {
        match field {
            Field::CurrentPrice => self.current_price,
            Field::PreviousClose => self.previous_close,
            Field::FiftyDayAverage => self.fifty_day_average,
            Field::TwoHundredDayAverage => self.two_hundred_day_average,
            Field::MarketCap => self.market_cap,
            Field::TrailingPe => self.trailing_pe,
            Field::PriceToSales => self.price_to_sales,
            Field::EnterpriseToEbitda => self.enterprise_to_ebitda,
            Field::PriceToBook => self.price_to_book,
            Field::FreeCashflow => self.free_cashflow,
            Field::DividendYield => self.dividend_yield,
            Field::PayoutRatio => self.payout_ratio,
            Field::ProfitMargins => self.profit_margins,
            Field::OperatingMargins => self.operating_margins,
            Field::ReturnOnAssets => self.return_on_assets,
            Field::CurrentRatio => self.current_ratio,
            Field::SharesOutstanding => self.shares_outstanding,
        }
    }

    /// Value of a field the caller cannot do without.
    ///
    /// Non-finite values count as missing.
    pub fn require(&self, ticker: impl ToString, field: Field) -> Result<f64> {
        self.get(field)
            .filter(|v| v.is_finite())
            .ok_or_else(|| SigmaError::missing(ticker, field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_provider_keys() {
        let raw = r#"{
            "shortName": "Apple Inc.",
            "currentPrice": 227.5,
            "twoHundredDayAverage": 201.25,
            "trailingPE": 34.1,
            "priceToSalesTrailing12Months": 8.9,
            "exDividendDate": "2024-08-12",
            "unknownKey": "ignored"
        }"#;
        let info: InfoSnapshot = serde_json::from_str(raw).unwrap();
        assert_eq!(info.short_name.as_deref(), Some("Apple Inc."));
        assert_eq!(info.get(Field::TrailingPe), Some(34.1));
        assert_eq!(info.get(Field::PriceToSales), Some(8.9));
        assert_eq!(info.ex_dividend_date, NaiveDate::from_ymd_opt(2024, 8, 12));
        assert_eq!(info.get(Field::MarketCap), None);
    }

    #[test]
    fn empty_object_is_empty_snapshot() {
        let info: InfoSnapshot = serde_json::from_str("{}").unwrap();
        assert!(info.is_empty());
    }

    #[test]
    fn require_reports_the_missing_field() {
        let info = InfoSnapshot {
            current_price: Some(10.0),
            two_hundred_day_average: Some(f64::NAN),
            ..Default::default()
        };
        assert_eq!(info.require("AAPL", Field::CurrentPrice).unwrap(), 10.0);
        match info.require("AAPL", Field::TwoHundredDayAverage) {
            Err(SigmaError::MissingField { ticker, field }) => {
                assert_eq!(ticker, "AAPL");
                assert_eq!(field, Field::TwoHundredDayAverage);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn field_names_match_provider_keys() {
        assert_eq!(Field::TwoHundredDayAverage.to_string(), "twoHundredDayAverage");
        assert_eq!(Field::TrailingPe.to_string(), "trailingPE");
        assert_eq!("currentPrice".parse::<Field>().unwrap(), Field::CurrentPrice);
    }
}
