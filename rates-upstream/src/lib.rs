//! # Rates Upstream
//!
//! Outbound HTTP adapter for the [`rates_types::RateSource`] port, backed by
//! the Frankfurter API (<https://www.frankfurter.app/>): a free, ECB-derived,
//! daily-updated exchange-rate service with no API key.

mod frankfurter;

pub use frankfurter::FrankfurterSource;
