//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP fetch behavior (timeouts, retries, backoff)
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Search request limits
    #[serde(default)]
    pub search: SearchConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Override values from environment-style variables.
    ///
    /// Recognized keys: `FETCH_TIMEOUT_SECS`, `FETCH_RETRIES`, `MAX_SOURCES`.
    /// Unparseable values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(secs) = lookup("FETCH_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.fetch.timeout_secs = secs;
        }
        if let Some(retries) = lookup("FETCH_RETRIES").and_then(|v| v.parse().ok()) {
            self.fetch.retries = retries;
        }
        if let Some(max) = lookup("MAX_SOURCES").and_then(|v| v.parse().ok()) {
            self.search.max_sources = max;
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.fetch.user_agent.trim().is_empty() {
            return Err(AppError::config("fetch.user_agent is empty"));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(AppError::config("fetch.timeout_secs must be > 0"));
        }
        if self.fetch.max_retry_wait_ms < self.fetch.retry_backoff_ms {
            return Err(AppError::config(
                "fetch.max_retry_wait_ms must be >= fetch.retry_backoff_ms",
            ));
        }
        if self.search.max_sources == 0 {
            return Err(AppError::config("search.max_sources must be > 0"));
        }
        Ok(())
    }
}

/// HTTP client and retry settings for provider APIs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Per-attempt timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Extra attempts after the first one
    #[serde(default = "defaults::retries")]
    pub retries: u32,

    /// Base delay before retrying a 5xx or transport error
    #[serde(default = "defaults::retry_backoff")]
    pub retry_backoff_ms: u64,

    /// Base delay before retrying a 429 without `Retry-After`
    #[serde(default = "defaults::rate_limit_backoff")]
    pub rate_limit_backoff_ms: u64,

    /// Upper bound on any single rate-limit wait
    #[serde(default = "defaults::max_retry_wait")]
    pub max_retry_wait_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            retries: defaults::retries(),
            retry_backoff_ms: defaults::retry_backoff(),
            rate_limit_backoff_ms: defaults::rate_limit_backoff(),
            max_retry_wait_ms: defaults::max_retry_wait(),
        }
    }
}

/// Limits applied to incoming search requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum number of boards in one query
    #[serde(default = "defaults::max_sources")]
    pub max_sources: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_sources: defaults::max_sources(),
        }
    }
}

mod defaults {
    // Fetch defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; ats-search/0.1)".into()
    }
    pub fn timeout() -> u64 {
        8
    }
    pub fn retries() -> u32 {
        2
    }
    pub fn retry_backoff() -> u64 {
        500
    }
    pub fn rate_limit_backoff() -> u64 {
        800
    }
    pub fn max_retry_wait() -> u64 {
        5_000
    }

    // Search defaults
    pub fn max_sources() -> usize {
        30
    }
}
