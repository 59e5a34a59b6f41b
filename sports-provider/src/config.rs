//! Provider connection settings

use sports_core::SportsError;
use std::time::Duration;
use url::Url;

/// Environment variable overriding the provider base URL
pub const BASE_URL_ENV: &str = "SPORTS_GAME_PROVIDER_BASE_URL";

/// Provider address used when no override is configured
pub const DEFAULT_BASE_URL: &str = "http://100.30.62.142";

/// Per-request timeout (10 seconds)
pub const REQUEST_TIMEOUT_MS: u64 = 10_000;

/// Settings for [`crate::ProviderClient`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Base URL without a trailing slash
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_millis(REQUEST_TIMEOUT_MS),
        }
    }
}

impl ProviderConfig {
    /// Build a config for an explicit base URL
    pub fn new(base_url: impl Into<String>) -> Result<Self, SportsError> {
        let base_url = base_url.into();
        Url::parse(&base_url)
            .map_err(|e| SportsError::config(format!("Invalid provider base URL {}: {}", base_url, e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            ..Self::default()
        })
    }

    /// Load from the process environment
    pub fn from_env() -> Result<Self, SportsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SportsError> {
        match lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            Some(url) => Self::new(url.trim()),
            None => Ok(Self::default()),
        }
    }
}
