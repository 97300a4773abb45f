//! Data Transfer Objects (DTOs) for API responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::CurrencyCode;

/// Result of converting an amount between two currencies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionResult {
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    /// Amount in `from` currency, as supplied by the caller.
    pub amount: f64,
    /// Converted amount in `to` currency, rounded to 2 decimal places.
    pub result: f64,
    /// Rate the conversion was computed with.
    pub rate: f64,
    pub timestamp: DateTime<Utc>,
}

/// A supported currency formatted for selection widgets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyOption {
    pub code: CurrencyCode,
    /// Human-readable display name, falls back to the code itself.
    pub name: String,
    pub value: CurrencyCode,
    /// `"CODE - Name"`, ready for dropdown labels.
    pub label: String,
}
