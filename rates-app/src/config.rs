//! Configuration loading from environment.

use std::env;
use std::time::Duration;

use rates_hex::TtlPolicy;

/// Application configuration.
pub struct Config {
    pub port: u16,
    pub upstream_url: String,
    pub ttl: TtlPolicy,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()?;

        let upstream_url = env::var("UPSTREAM_URL")
            .unwrap_or_else(|_| "https://api.frankfurter.app".to_string());

        let defaults = TtlPolicy::default();
        let ttl = TtlPolicy {
            rates: ttl_from_env("RATES_TTL_SECS", defaults.rates)?,
            history: ttl_from_env("HISTORY_TTL_SECS", defaults.history)?,
            currencies: ttl_from_env("CURRENCIES_TTL_SECS", defaults.currencies)?,
        };

        if !ttl.is_ordered() {
            anyhow::bail!(
                "TTLs must satisfy RATES_TTL_SECS < HISTORY_TTL_SECS < CURRENCIES_TTL_SECS"
            );
        }

        Ok(Self {
            port,
            upstream_url,
            ttl,
        })
    }
}

fn ttl_from_env(var: &str, default: Duration) -> anyhow::Result<Duration> {
    match env::var(var) {
        Ok(raw) => {
            let secs: u64 = raw
                .parse()
                .map_err(|_| anyhow::anyhow!("{var} must be a number of seconds, got {raw:?}"))?;
            Ok(Duration::from_secs(secs))
        }
        Err(_) => Ok(default),
    }
}
