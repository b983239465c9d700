//! Application configuration
//!
//! Configuration is read from a JSON file where every field is optional,
//! then selected values can be overridden from the environment.

use app_state::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Environment variable overriding [`AppConfig::api_base_url`]
pub const ENV_API_URL: &str = "LIDO_API_URL";

/// Environment variable overriding [`AppConfig::page_origin`]
pub const ENV_PAGE_ORIGIN: &str = "LIDO_PAGE_ORIGIN";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed configuration file
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value failed validation
    #[error("Invalid {field}: {reason}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Profile fetch retry settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileRetryConfig {
    /// Extra attempts after the first fetch
    pub retries: u32,
    /// Delay between attempts in milliseconds
    pub delay_ms: u64,
}

impl Default for ProfileRetryConfig {
    fn default() -> Self {
        Self {
            retries: 2,
            delay_ms: 1000,
        }
    }
}

impl From<ProfileRetryConfig> for RetryPolicy {
    fn from(config: ProfileRetryConfig) -> Self {
        RetryPolicy {
            retries: config.retries,
            delay: Duration::from_millis(config.delay_ms),
        }
    }
}

/// Application configuration
///
/// # Example
///
/// ```
/// use app_core::config::AppConfig;
///
/// let config = AppConfig::from_json(r#"{ "page_origin": "https://lido.education/" }"#).unwrap();
/// assert_eq!(config.page_origin, "https://lido.education");
/// assert_eq!(config.profile_retry.retries, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the backend API
    pub api_base_url: String,
    /// Origin of the page hosting embedded players
    pub page_origin: String,
    /// Profile fetch retry settings
    pub profile_retry: ProfileRetryConfig,
    /// Default tracing filter directive
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.lido.education/v1".to_string(),
            page_origin: "http://localhost:3000".to_string(),
            profile_retry: ProfileRetryConfig::default(),
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Parse and validate a JSON configuration document
    pub fn from_json(json: &str) -> Result<Self> {
        let config: AppConfig = serde_json::from_str(json)?;
        config.validated()
    }

    /// Read a configuration file, apply environment overrides and validate
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = tokio::fs::read_to_string(path).await?;
        let config: AppConfig = serde_json::from_str(&contents)?;

        tracing::debug!(path = %path.display(), "loaded configuration file");
        config
            .with_overrides(|key| std::env::var(key).ok())
            .validated()
    }

    /// Defaults plus environment overrides
    pub fn from_env() -> Result<Self> {
        AppConfig::default()
            .with_overrides(|key| std::env::var(key).ok())
            .validated()
    }

    /// Apply overrides looked up by environment variable name
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL) {
            self.api_base_url = url;
        }
        if let Some(origin) = lookup(ENV_PAGE_ORIGIN) {
            self.page_origin = origin;
        }
        self
    }

    /// Validate and normalize URLs
    pub fn validated(mut self) -> Result<Self> {
        self.api_base_url = normalize_url("api_base_url", &self.api_base_url)?;
        self.page_origin = normalize_url("page_origin", &self.page_origin)?;
        Ok(self)
    }

    /// Retry policy for profile loading
    pub fn retry_policy(&self) -> RetryPolicy {
        self.profile_retry.into()
    }
}

fn normalize_url(field: &'static str, value: &str) -> Result<String> {
    let value = value.trim();
    if !(value.starts_with("http://") || value.starts_with("https://")) {
        return Err(ConfigError::Invalid {
            field,
            reason: format!("expected an http(s) URL, got {:?}", value),
        });
    }
    Ok(value.trim_end_matches('/').to_string())
}
