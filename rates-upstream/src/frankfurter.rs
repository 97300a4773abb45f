//! Frankfurter API client.
//!
//! Plain HTTP GET with query parameters; responses are JSON mappings of
//! currency code to numeric rate. Transport failures and non-2xx statuses
//! surface as [`SourceError::Unavailable`], undecodable or incomplete
//! payloads as [`SourceError::InvalidResponse`]. No retry, no caching -
//! that is the caller's concern.

use std::collections::{BTreeMap, HashMap};

use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use rates_types::{CurrencyCode, ExchangeRate, HistoricalData, HistoricalRate, SourceError};

const DEFAULT_BASE_URL: &str = "https://api.frankfurter.app";

/// `GET /latest?from=&to=` response body.
#[derive(Debug, Deserialize)]
struct LatestResponse {
    date: NaiveDate,
    rates: HashMap<String, f64>,
}

/// `GET /{start}..{end}?from=&to=` response body.
///
/// BTreeMap keys keep the series ordered oldest to newest.
#[derive(Debug, Deserialize)]
struct RangeResponse {
    start_date: NaiveDate,
    end_date: NaiveDate,
    rates: BTreeMap<NaiveDate, HashMap<String, f64>>,
}

/// HTTP client for the Frankfurter exchange-rate API.
pub struct FrankfurterSource {
    base_url: String,
    http: reqwest::Client,
}

impl FrankfurterSource {
    /// Creates a client against the public Frankfurter endpoint.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a client against a custom endpoint (test servers, mirrors).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, SourceError> {
        tracing::debug!(%url, "fetching from upstream");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| SourceError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Unavailable(format!(
                "upstream returned {status} for {url}"
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| SourceError::InvalidResponse(e.to_string()))
    }
}

impl Default for FrankfurterSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl rates_types::RateSource for FrankfurterSource {
    async fn current_rate(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<ExchangeRate, SourceError> {
        let url = format!("{}/latest?from={}&to={}", self.base_url, from, to);
        let body: LatestResponse = self.get_json(url).await?;
        rate_from_latest(body, from, to)
    }

    async fn historical_rates(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<HistoricalData, SourceError> {
        let url = format!(
            "{}/{}..{}?from={}&to={}",
            self.base_url, start, end, from, to
        );
        let body: RangeResponse = self.get_json(url).await?;
        history_from_range(body, from, to)
    }

    async fn supported_currencies(&self) -> Result<Vec<CurrencyCode>, SourceError> {
        let url = format!("{}/currencies", self.base_url);
        // Keys are the codes, values are display names we do not need here.
        let body: BTreeMap<String, String> = self.get_json(url).await?;
        currencies_from_listing(body)
    }
}

fn rate_from_latest(
    body: LatestResponse,
    from: &CurrencyCode,
    to: &CurrencyCode,
) -> Result<ExchangeRate, SourceError> {
    let rate = body.rates.get(to.as_str()).copied().ok_or_else(|| {
        SourceError::InvalidResponse(format!("rate for {to} missing from latest response"))
    })?;

    Ok(ExchangeRate {
        from: from.clone(),
        to: to.clone(),
        rate,
        timestamp: body.date.and_time(NaiveTime::MIN).and_utc(),
    })
}

fn history_from_range(
    body: RangeResponse,
    from: &CurrencyCode,
    to: &CurrencyCode,
) -> Result<HistoricalData, SourceError> {
    let rates = body
        .rates
        .into_iter()
        .map(|(date, day)| {
            let rate = day.get(to.as_str()).copied().ok_or_else(|| {
                SourceError::InvalidResponse(format!("rate for {to} missing on {date}"))
            })?;
            Ok(HistoricalRate { date, rate })
        })
        .collect::<Result<Vec<_>, SourceError>>()?;

    Ok(HistoricalData {
        from: from.clone(),
        to: to.clone(),
        rates,
        start_date: body.start_date,
        end_date: body.end_date,
    })
}

fn currencies_from_listing(body: BTreeMap<String, String>) -> Result<Vec<CurrencyCode>, SourceError> {
    body.into_keys()
        .map(|code| {
            code.parse::<CurrencyCode>()
                .map_err(|e| SourceError::InvalidResponse(e.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> (CurrencyCode, CurrencyCode) {
        ("USD".parse().unwrap(), "EUR".parse().unwrap())
    }

    #[test]
    fn parses_latest_response() {
        let (from, to) = pair();
        let body: LatestResponse = serde_json::from_str(
            r#"{"amount":1.0,"base":"USD","date":"2024-01-02","rates":{"EUR":0.9123}}"#,
        )
        .unwrap();

        let rate = rate_from_latest(body, &from, &to).unwrap();
        assert_eq!(rate.from.as_str(), "USD");
        assert_eq!(rate.to.as_str(), "EUR");
        assert_eq!(rate.rate, 0.9123);
        assert_eq!(rate.timestamp.to_rfc3339(), "2024-01-02T00:00:00+00:00");
    }

    #[test]
    fn missing_target_currency_is_invalid_response() {
        let (from, to) = pair();
        let body: LatestResponse = serde_json::from_str(
            r#"{"amount":1.0,"base":"USD","date":"2024-01-02","rates":{"GBP":0.79}}"#,
        )
        .unwrap();

        let err = rate_from_latest(body, &from, &to).unwrap_err();
        assert!(matches!(err, SourceError::InvalidResponse(_)));
    }

    #[test]
    fn parses_range_response_oldest_first() {
        let (from, to) = pair();
        // Deliberately out of order in the JSON text; BTreeMap sorts by date.
        let body: RangeResponse = serde_json::from_str(
            r#"{
                "amount": 1.0,
                "base": "USD",
                "start_date": "2024-01-01",
                "end_date": "2024-01-03",
                "rates": {
                    "2024-01-03": {"EUR": 0.93},
                    "2024-01-01": {"EUR": 0.91},
                    "2024-01-02": {"EUR": 0.92}
                }
            }"#,
        )
        .unwrap();

        let history = history_from_range(body, &from, &to).unwrap();
        assert_eq!(history.rates.len(), 3);
        assert_eq!(
            history
                .rates
                .iter()
                .map(|r| r.rate)
                .collect::<Vec<_>>(),
            vec![0.91, 0.92, 0.93]
        );
        assert_eq!(history.start_date.to_string(), "2024-01-01");
        assert_eq!(history.end_date.to_string(), "2024-01-03");
    }

    #[test]
    fn day_missing_target_currency_fails_whole_series() {
        let (from, to) = pair();
        let body: RangeResponse = serde_json::from_str(
            r#"{
                "amount": 1.0,
                "base": "USD",
                "start_date": "2024-01-01",
                "end_date": "2024-01-02",
                "rates": {
                    "2024-01-01": {"EUR": 0.91},
                    "2024-01-02": {"GBP": 0.79}
                }
            }"#,
        )
        .unwrap();

        // No partial series: one bad day fails the whole call.
        let err = history_from_range(body, &from, &to).unwrap_err();
        assert!(matches!(err, SourceError::InvalidResponse(_)));
    }

    #[test]
    fn parses_currency_listing_keys() {
        let body: BTreeMap<String, String> = serde_json::from_str(
            r#"{"EUR":"Euro","USD":"US Dollar","AUD":"Australian Dollar"}"#,
        )
        .unwrap();

        let codes = currencies_from_listing(body).unwrap();
        let codes: Vec<&str> = codes.iter().map(|c| c.as_str()).collect();
        assert_eq!(codes, vec!["AUD", "EUR", "USD"]);
    }
}
