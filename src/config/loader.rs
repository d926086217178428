// config to load api credentials with fallback url and order policy
use std::{env, time::Duration};
use anyhow::{Context, Result};
use crate::types::{Config, TimeInForce, DEFAULT_API_URL, DEFAULT_RECV_WINDOW, DEFAULT_TIMEOUT_MS};

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, `load` uses the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = required(&lookup, "BYBIT_API_KEY")?;
        let api_secret = required(&lookup, "BYBIT_API_SECRET")?;

        let api_url = lookup("BYBIT_API_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let recv_window = match lookup("BYBIT_RECV_WINDOW") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("BYBIT_RECV_WINDOW must be milliseconds, got {:?}", raw))?,
            None => DEFAULT_RECV_WINDOW,
        };

        let timeout_ms = match lookup("EXCHANGE_TIMEOUT_MS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("EXCHANGE_TIMEOUT_MS must be milliseconds, got {:?}", raw))?,
            None => DEFAULT_TIMEOUT_MS,
        };
        if timeout_ms == 0 {
            anyhow::bail!("EXCHANGE_TIMEOUT_MS must be greater than 0");
        }

        let time_in_force = match lookup("ORDER_TIME_IN_FORCE") {
            Some(raw) => raw.parse::<TimeInForce>().map_err(anyhow::Error::msg)?,
            None => TimeInForce::default(),
        };

        Ok(Config {
            api_url,
            api_key,
            api_secret,
            recv_window,
            request_timeout: Duration::from_millis(timeout_ms),
            time_in_force,
        })
    }
}

fn required<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| anyhow::anyhow!("{} must be set", key))
}
