//! Exchange rate entities returned by the rates service.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::CurrencyCode;

/// A point-in-time quote for a currency pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    /// Units of `to` per one unit of `from`.
    pub rate: f64,
    /// Publication instant of the quote (upstream publishes daily).
    pub timestamp: DateTime<Utc>,
}

/// One observation in a historical series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRate {
    pub date: NaiveDate,
    pub rate: f64,
}

/// An ordered series of daily rates for a currency pair, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalData {
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    pub rates: Vec<HistoricalRate>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}
