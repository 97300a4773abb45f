//! # Rates Hex
//!
//! Application service layer and HTTP adapter for the rates service.
//!
//! ## Architecture
//!
//! - `service/` - The cached rate provider (stale-while-revalidate over a
//!   [`rates_cache::MemoryCache`])
//! - `inbound/` - HTTP adapter (Axum server)
//!
//! The service is generic over `S: RateSource`, allowing different upstream
//! adapters to be injected.

pub mod inbound;
pub mod service;


pub use service::{CachedRateProvider, Origin, Served, TtlPolicy};
