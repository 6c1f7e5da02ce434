//! Scan configuration.
//!
//! Settings can be configured via:
//! - CLI arguments: `--github-token`, `--api-url`, `--timeout-secs`, ...
//! - Environment variables: `TOKEN_HEALTH_GITHUB_TOKEN` (or `GITHUB_TOKEN`),
//!   `TOKEN_HEALTH_API_URL`, `TOKEN_HEALTH_TIMEOUT_SECS`,
//!   `TOKEN_HEALTH_MIN_INTERVAL_MS`, `TOKEN_HEALTH_MAX_REPOS`,
//!   `TOKEN_HEALTH_RETRIES`, `TOKEN_HEALTH_CACHE_TTL_SECS`
//!
//! CLI arguments take precedence over environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_MIN_INTERVAL_MS: u64 = 100;
pub const DEFAULT_MAX_REPOS: u32 = 100;
pub const DEFAULT_RETRIES: u32 = 2;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// GitHub's `per_page` ceiling.
const MAX_PER_PAGE: u32 = 100;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {key}")]
    InvalidValue { key: &'static str, value: String },
}

/// Configuration for the GitHub client and resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    pub github_token: Option<String>,
    pub api_url: String,
    pub timeout: Duration,
    /// Minimum spacing between API requests.
    pub min_interval: Duration,
    /// Upper bound on repositories listed per owner.
    pub max_repos: u32,
    /// Extra attempts for transient failures.
    pub retries: u32,
    /// Zero disables the response cache.
    pub cache_ttl: Duration,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            github_token: None,
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            min_interval: Duration::from_millis(DEFAULT_MIN_INTERVAL_MS),
            max_repos: DEFAULT_MAX_REPOS,
            retries: DEFAULT_RETRIES,
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        }
    }
}

/// CLI-provided values; `None` leaves the current setting alone.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub github_token: Option<String>,
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub min_interval_ms: Option<u64>,
    pub max_repos: Option<u32>,
    pub retries: Option<u32>,
    pub cache_ttl_secs: Option<u64>,
}

impl ScanConfig {
    /// Create a new config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        config.github_token = lookup("TOKEN_HEALTH_GITHUB_TOKEN")
            .or_else(|| lookup("GITHUB_TOKEN"))
            .filter(|token| !token.trim().is_empty());

        if let Some(url) = lookup("TOKEN_HEALTH_API_URL") {
            config.api_url = url;
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, "TOKEN_HEALTH_TIMEOUT_SECS")? {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(ms) = parse_var::<u64, _>(&lookup, "TOKEN_HEALTH_MIN_INTERVAL_MS")? {
            config.min_interval = Duration::from_millis(ms);
        }
        if let Some(max) = parse_var::<u32, _>(&lookup, "TOKEN_HEALTH_MAX_REPOS")? {
            config.max_repos = max;
        }
        if let Some(retries) = parse_var::<u32, _>(&lookup, "TOKEN_HEALTH_RETRIES")? {
            config.retries = retries;
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, "TOKEN_HEALTH_CACHE_TTL_SECS")? {
            config.cache_ttl = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Set the API token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.github_token = Some(token.into());
        self
    }

    /// Set the API base URL.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Merge with CLI overrides. CLI values take precedence.
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(token) = overrides.github_token {
            self.github_token = Some(token);
        }
        if let Some(url) = overrides.api_url {
            self.api_url = url;
        }
        if let Some(secs) = overrides.timeout_secs {
            self.timeout = Duration::from_secs(secs);
        }
        if let Some(ms) = overrides.min_interval_ms {
            self.min_interval = Duration::from_millis(ms);
        }
        if let Some(max) = overrides.max_repos {
            self.max_repos = max;
        }
        if let Some(retries) = overrides.retries {
            self.retries = retries;
        }
        if let Some(secs) = overrides.cache_ttl_secs {
            self.cache_ttl = Duration::from_secs(secs);
        }
        self
    }

    /// Page size to request when listing an owner's repositories.
    pub fn listing_page_size(&self) -> u32 {
        self.max_repos.clamp(1, MAX_PER_PAGE)
    }

    /// API base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }
}

fn parse_var<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key, value }),
    }
}
