//! Cached Rate Provider
//!
//! Wraps an upstream [`RateSource`] with a stale-while-revalidate cache:
//! fresh cache is served without touching upstream; a cache miss or stale
//! entry triggers a fetch; a failed fetch falls back to whatever cached
//! value exists, stale included. Only when there is no cached value at all
//! does the upstream error reach the caller.
//!
//! Contains NO transport logic - the upstream adapter and the HTTP layer
//! are injected around it.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;

use rates_cache::MemoryCache;
use rates_types::{
    ConversionResult, CurrencyCode, ExchangeRate, HistoricalData, RateSource, SourceError,
};

const CURRENCIES_KEY: &str = "currencies:supported";

/// TTL per data kind.
///
/// Three distinct classes, ordered `rates < history < currencies`: current
/// quotes go stale in minutes, past series rarely change, and the currency
/// set is effectively static. Values are tunable configuration; the
/// ordering is the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlPolicy {
    pub rates: Duration,
    pub history: Duration,
    pub currencies: Duration,
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self {
            rates: Duration::from_secs(5 * 60),
            history: Duration::from_secs(60 * 60),
            currencies: Duration::from_secs(24 * 60 * 60),
        }
    }
}

impl TtlPolicy {
    /// True iff the three classes are distinct and correctly ordered.
    pub fn is_ordered(&self) -> bool {
        self.rates < self.history && self.history < self.currencies
    }
}

/// Where a served value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Cache entry within its TTL; upstream was not contacted.
    FreshCache,
    /// Fetched from upstream on this call (and cached).
    Upstream,
    /// Upstream failed; a stale cache entry was served instead.
    StaleCache,
}

impl Origin {
    /// Short form for response headers and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::FreshCache => "hit",
            Origin::Upstream => "miss",
            Origin::StaleCache => "stale",
        }
    }
}

/// A successfully served value, tagged with how it was obtained, so
/// callers and tests can tell "fresh", "refreshed" and
/// "upstream-failed-but-served-stale" apart without reading logs.
#[derive(Debug, Clone, PartialEq)]
pub struct Served<T> {
    pub value: T,
    pub origin: Origin,
}

impl<T> Served<T> {
    fn from_cache(value: T) -> Self {
        Self {
            value,
            origin: Origin::FreshCache,
        }
    }

    fn from_upstream(value: T) -> Self {
        Self {
            value,
            origin: Origin::Upstream,
        }
    }

    fn stale(value: T) -> Self {
        Self {
            value,
            origin: Origin::StaleCache,
        }
    }
}

/// Upstream rate source behind a process-wide TTL cache.
///
/// Generic over `S: RateSource` - the adapter is injected at compile time.
/// The cache instance is injected too: the composition root owns the single
/// per-process instance, so there is no hidden global state.
pub struct CachedRateProvider<S: RateSource> {
    source: S,
    cache: Arc<MemoryCache>,
    ttl: TtlPolicy,
}

impl<S: RateSource> CachedRateProvider<S> {
    /// Creates a provider with the default TTL policy.
    pub fn new(source: S, cache: Arc<MemoryCache>) -> Self {
        Self::with_ttl(source, cache, TtlPolicy::default())
    }

    pub fn with_ttl(source: S, cache: Arc<MemoryCache>, ttl: TtlPolicy) -> Self {
        Self { source, cache, ttl }
    }

    /// Current rate for a pair, cached under `rate:{FROM}:{TO}`.
    pub async fn current_rate(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<Served<ExchangeRate>, SourceError> {
        let key = format!("rate:{from}:{to}");
        self.serve(key, self.ttl.rates, self.source.current_rate(from, to))
            .await
    }

    /// Daily series for a pair over an inclusive date range, cached under
    /// `history:{FROM}:{TO}:{start}:{end}`.
    pub async fn historical_rates(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Served<HistoricalData>, SourceError> {
        let key = format!("history:{from}:{to}:{start}:{end}");
        self.serve(
            key,
            self.ttl.history,
            self.source.historical_rates(from, to, start, end),
        )
        .await
    }

    /// Supported currency codes, cached under a single well-known key.
    pub async fn supported_currencies(
        &self,
    ) -> Result<Served<Vec<CurrencyCode>>, SourceError> {
        self.serve(
            CURRENCIES_KEY.to_string(),
            self.ttl.currencies,
            self.source.supported_currencies(),
        )
        .await
    }

    /// Converts `amount` of `from` into `to` at the (cached) current rate,
    /// rounding the result to 2 decimal places.
    pub async fn convert(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
        amount: f64,
    ) -> Result<Served<ConversionResult>, SourceError> {
        let served = self.current_rate(from, to).await?;
        let rate = served.value;

        Ok(Served {
            value: ConversionResult {
                from: rate.from,
                to: rate.to,
                amount,
                result: (amount * rate.rate * 100.0).round() / 100.0,
                rate: rate.rate,
                timestamp: rate.timestamp,
            },
            origin: served.origin,
        })
    }

    /// The shared stale-while-revalidate algorithm.
    ///
    /// `fetch` is a not-yet-polled future, so the fresh-cache path returns
    /// without the upstream source ever being contacted. Two concurrent
    /// calls observing the same cold key will both fetch; that duplicate
    /// work is accepted rather than coalesced.
    async fn serve<T, Fut>(
        &self,
        key: String,
        ttl: Duration,
        fetch: Fut,
    ) -> Result<Served<T>, SourceError>
    where
        T: Clone + Send + Sync + 'static,
        Fut: Future<Output = Result<T, SourceError>> + Send,
    {
        if self.cache.is_fresh(&key) {
            if let Some(value) = self.cache.get::<T>(&key) {
                tracing::debug!(key = %key, "serving fresh cache");
                return Ok(Served::from_cache(value));
            }
        }

        match fetch.await {
            Ok(value) => {
                self.cache.set(key, value.clone(), ttl);
                Ok(Served::from_upstream(value))
            }
            Err(err) => {
                // Stale-serving fallback: any cached value beats an error.
                if let Some(stale) = self.cache.get::<T>(&key) {
                    tracing::warn!(key = %key, error = %err, "upstream failed, serving stale cache");
                    Ok(Served::stale(stale))
                } else {
                    Err(err)
                }
            }
        }
    }
}
