//! HTTP request handlers.
//!
//! Thin pass-throughs: validate and normalize query parameters, call into
//! the cache-backed provider, serialize the result as JSON. The
//! `Cache-Control` headers layer HTTP caching on top of - not instead of -
//! the in-memory cache.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderName, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use rates_types::{AppError, CurrencyCode, CurrencyOption, RateSource, SourceError};

use crate::service::Served;
use crate::CachedRateProvider;

/// Application state shared across handlers.
pub struct AppState<S: RateSource> {
    pub provider: CachedRateProvider<S>,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl From<SourceError> for ApiError {
    fn from(err: SourceError) -> Self {
        ApiError(AppError::Source(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Source(err) => (StatusCode::BAD_GATEWAY, err.to_string()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = serde_json::json!({
            "error": message,
            "code": status.as_u16()
        });

        (status, Json(body)).into_response()
    }
}

/// Builds the shared response shape: payload plus `Cache-Control` and an
/// `x-cache` header surfacing where the value came from.
fn respond<T: Serialize>(served: Served<T>, s_maxage: u64) -> impl IntoResponse {
    let headers = [
        (
            header::CACHE_CONTROL,
            format!(
                "public, s-maxage={s_maxage}, stale-while-revalidate={}",
                s_maxage * 2
            ),
        ),
        (
            HeaderName::from_static("x-cache"),
            served.origin.as_str().to_string(),
        ),
    ];
    (headers, Json(served.value))
}

fn require_pair(
    from: Option<&str>,
    to: Option<&str>,
) -> Result<(CurrencyCode, CurrencyCode), AppError> {
    let (from, to) = match (from, to) {
        (Some(from), Some(to)) => (from, to),
        _ => {
            return Err(AppError::BadRequest(
                "Missing required parameters: from, to".into(),
            ));
        }
    };

    Ok((from.parse()?, to.parse()?))
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

// ─────────────────────────────────────────────────────────────────────────────
// GET /api/rates?from=USD&to=EUR
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PairQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Current exchange rate between two currencies.
#[tracing::instrument(skip(state))]
pub async fn get_rate<S: RateSource>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<PairQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (from, to) = require_pair(query.from.as_deref(), query.to.as_deref())?;

    let served = state.provider.current_rate(&from, &to).await?;
    Ok(respond(served, 300))
}

// ─────────────────────────────────────────────────────────────────────────────
// GET /api/convert?from=USD&to=EUR&amount=100
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ConvertQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub amount: Option<String>,
}

/// Convert an amount from one currency to another.
#[tracing::instrument(skip(state))]
pub async fn convert<S: RateSource>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<ConvertQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let amount_param = query.amount.as_deref().ok_or_else(|| {
        AppError::BadRequest("Missing required parameters: from, to, amount".into())
    })?;
    let (from, to) = require_pair(query.from.as_deref(), query.to.as_deref()).map_err(|err| {
        match err {
            AppError::BadRequest(msg) if msg.starts_with("Missing") => {
                AppError::BadRequest("Missing required parameters: from, to, amount".into())
            }
            other => other,
        }
    })?;

    let amount: f64 = amount_param
        .parse()
        .ok()
        .filter(|a: &f64| a.is_finite() && *a > 0.0)
        .ok_or_else(|| AppError::BadRequest("Invalid amount. Must be a positive number.".into()))?;

    let served = state.provider.convert(&from, &to, amount).await?;
    Ok(respond(served, 300))
}

// ─────────────────────────────────────────────────────────────────────────────
// GET /api/history?from=USD&to=EUR&days=30
// ─────────────────────────────────────────────────────────────────────────────

const DEFAULT_HISTORY_DAYS: i64 = 90;
const MAX_HISTORY_DAYS: i64 = 365;

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub days: Option<String>,
}

/// Historical exchange rates over the last `days` days.
#[tracing::instrument(skip(state))]
pub async fn get_history<S: RateSource>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<HistoryQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (from, to) = require_pair(query.from.as_deref(), query.to.as_deref())?;

    let days: i64 = match query.days.as_deref() {
        None => DEFAULT_HISTORY_DAYS,
        Some(raw) => raw
            .parse()
            .ok()
            .filter(|d| (1..=MAX_HISTORY_DAYS).contains(d))
            .ok_or_else(|| {
                AppError::BadRequest("Invalid days parameter. Must be between 1 and 365.".into())
            })?,
    };

    let end = chrono::Utc::now().date_naive();
    let start = end - chrono::Duration::days(days);

    let served = state.provider.historical_rates(&from, &to, start, end).await?;
    Ok(respond(served, 3600))
}

// ─────────────────────────────────────────────────────────────────────────────
// GET /api/currencies
// ─────────────────────────────────────────────────────────────────────────────

/// List of supported currencies, formatted for selection widgets.
#[tracing::instrument(skip(state))]
pub async fn get_currencies<S: RateSource>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<impl IntoResponse, ApiError> {
    let served = state.provider.supported_currencies().await?;

    let options: Vec<CurrencyOption> = served
        .value
        .iter()
        .map(|code| {
            let name = currency_name(code.as_str())
                .unwrap_or(code.as_str())
                .to_string();
            CurrencyOption {
                code: code.clone(),
                label: format!("{code} - {name}"),
                name,
                value: code.clone(),
            }
        })
        .collect();

    Ok(respond(
        Served {
            value: options,
            origin: served.origin,
        },
        86400,
    ))
}

/// Display names for the currencies the upstream source publishes.
fn currency_name(code: &str) -> Option<&'static str> {
    let name = match code {
        "AUD" => "Australian Dollar",
        "BGN" => "Bulgarian Lev",
        "BRL" => "Brazilian Real",
        "CAD" => "Canadian Dollar",
        "CHF" => "Swiss Franc",
        "CNY" => "Chinese Yuan",
        "CZK" => "Czech Koruna",
        "DKK" => "Danish Krone",
        "EUR" => "Euro",
        "GBP" => "British Pound",
        "HKD" => "Hong Kong Dollar",
        "HUF" => "Hungarian Forint",
        "IDR" => "Indonesian Rupiah",
        "ILS" => "Israeli Shekel",
        "INR" => "Indian Rupee",
        "ISK" => "Icelandic Króna",
        "JPY" => "Japanese Yen",
        "KRW" => "South Korean Won",
        "MXN" => "Mexican Peso",
        "MYR" => "Malaysian Ringgit",
        "NOK" => "Norwegian Krone",
        "NZD" => "New Zealand Dollar",
        "PHP" => "Philippine Peso",
        "PLN" => "Polish Zloty",
        "RON" => "Romanian Leu",
        "SEK" => "Swedish Krona",
        "SGD" => "Singapore Dollar",
        "THB" => "Thai Baht",
        "TRY" => "Turkish Lira",
        "USD" => "US Dollar",
        "ZAR" => "South African Rand",
        _ => return None,
    };
    Some(name)
}
