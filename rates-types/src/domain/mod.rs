//! Pure domain types. No IO, no framework dependencies.

mod currency;
mod rate;

pub use currency::CurrencyCode;
pub use rate::{ExchangeRate, HistoricalData, HistoricalRate};
