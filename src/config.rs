//! Client configuration
//!
//! One setting really matters: where the backend lives. It comes from
//! `PHOTOAUTH_API_URL` (a `.env` file in the working directory is honoured)
//! and falls back to a local address.

use std::time::Duration;

/// Environment variable naming the backend base URL.
pub const API_URL_ENV: &str = "PHOTOAUTH_API_URL";

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_STATS_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: String,
    pub timeout: Duration,
    pub stats_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            stats_interval: DEFAULT_STATS_INTERVAL,
        }
    }
}

impl Config {
    /// Load `.env` (if any) and read the backend URL from the environment.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        let api_url = std::env::var(API_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty());
        Self::default().with_api_url(api_url)
    }

    /// Override the backend URL; `None` or blank keeps the current one.
    pub fn with_api_url(mut self, api_url: Option<String>) -> Self {
        if let Some(url) = api_url {
            let url = url.trim().trim_end_matches('/');
            if !url.is_empty() {
                self.api_url = url.to_string();
            }
        }
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Absolute URL for a backend path such as `/analyze`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }
}
