use crate::types::TimeInForce;
use std::{fmt, time::Duration};

pub const DEFAULT_API_URL: &str = "https://api.bybit.com";
pub const DEFAULT_RECV_WINDOW: u64 = 5000;
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

#[derive(Clone)]
pub struct Config {
    pub api_url: String,
    pub api_key: String,
    pub api_secret: String,
    pub recv_window: u64,
    pub request_timeout: Duration,
    pub time_in_force: TimeInForce,
}

// keep the secret out of logs
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("recv_window", &self.recv_window)
            .field("request_timeout", &self.request_timeout)
            .field("time_in_force", &self.time_in_force)
            .finish()
    }
}
