//! Rate source port.
//!
//! This trait defines the interface for upstream rate-data providers.
//! Implementations can be HTTP clients, mock sources, etc.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::{CurrencyCode, ExchangeRate, HistoricalData};
use crate::error::SourceError;

/// Port trait for upstream exchange-rate data sources.
#[async_trait::async_trait]
pub trait RateSource: Send + Sync {
    /// Fetches the current rate for a currency pair.
    async fn current_rate(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<ExchangeRate, SourceError>;

    /// Fetches the daily rate series for a currency pair over an inclusive
    /// date range, ordered oldest to newest.
    async fn historical_rates(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<HistoricalData, SourceError>;

    /// Fetches the set of currency codes the source supports.
    async fn supported_currencies(&self) -> Result<Vec<CurrencyCode>, SourceError>;
}

#[async_trait::async_trait]
impl<S: RateSource + ?Sized> RateSource for Arc<S> {
    async fn current_rate(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<ExchangeRate, SourceError> {
        (**self).current_rate(from, to).await
    }

    async fn historical_rates(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<HistoricalData, SourceError> {
        (**self).historical_rates(from, to, start, end).await
    }

    async fn supported_currencies(&self) -> Result<Vec<CurrencyCode>, SourceError> {
        (**self).supported_currencies().await
    }
}
