//! Client configuration: the API base URL and nothing else.

use thiserror::Error;

/// Environment variable consulted by `ClientConfig::from_env`.
pub const BASE_URL_ENV: &str = "ROSTER_API_URL";

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("base URL must start with http:// or https://, got {0:?}")]
    UnsupportedScheme(String),

    #[error("base URL has no host: {0:?}")]
    MissingHost(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let rest = trimmed
            .strip_prefix("http://")
            .or_else(|| trimmed.strip_prefix("https://"))
            .ok_or_else(|| ConfigError::UnsupportedScheme(base_url.to_string()))?;
        if rest.is_empty() || rest.starts_with('/') {
            return Err(ConfigError::MissingHost(base_url.to_string()));
        }
        Ok(Self {
            base_url: trimmed.to_string(),
        })
    }

    /// Read `ROSTER_API_URL`, falling back to the default when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(BASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::new(&url),
            _ => Ok(Self::default()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
