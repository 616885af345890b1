//! Client configuration

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default backend origin
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
/// Default request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for [`crate::HttpApi`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend origin; endpoint paths are absolute (`/api/...`)
    pub base_url: String,
    /// Whole-request timeout in seconds
    pub timeout_secs: u64,
}

impl ClientConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With base URL
    #[inline]
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// With timeout
    #[inline]
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Timeout as a [`Duration`]
    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Parse and check the base URL
    pub fn base(&self) -> Result<reqwest::Url, ApiError> {
        let url = reqwest::Url::parse(self.base_url.trim())
            .map_err(|e| ApiError::Config(format!("invalid base url '{}': {e}", self.base_url)))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ApiError::Config(format!("unsupported scheme '{other}'"))),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ClientConfig::new();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.base().is_ok());
    }

    #[test]
    fn rejects_bad_urls() {
        assert!(ClientConfig::new().with_base_url("not a url").base().is_err());
        assert!(ClientConfig::new().with_base_url("ftp://host").base().is_err());
    }
}
