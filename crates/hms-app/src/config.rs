//! Application configuration
//!
//! Layering, lowest to highest precedence:
//! - built-in defaults
//! - TOML file
//! - environment (`HMS_API_URL`, `HMS_DATA_DIR`)
//! - explicit overrides applied by the caller (CLI flags)

use hms_client::ClientConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the backend URL
pub const ENV_API_URL: &str = "HMS_API_URL";
/// Environment variable overriding the data directory
pub const ENV_DATA_DIR: &str = "HMS_DATA_DIR";
/// Default data directory, relative to the working directory
pub const DEFAULT_DATA_DIR: &str = ".hms";

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Booking wizard settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingConfig {
    /// Send preferred date/time with the booking request
    pub forward_schedule: bool,
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub client: ClientConfig,
    /// Where the session is persisted
    pub data_dir: PathBuf,
    pub booking: BookingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            client: ClientConfig::default(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            booking: BookingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Parse from TOML text; missing keys take defaults
    pub fn from_toml(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Read a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text, path)
    }

    /// Defaults, then `path` if given, then the process environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(config.with_env(|key| std::env::var(key).ok()))
    }

    /// Apply environment overrides read through `lookup`
    #[must_use]
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |v: String| (!v.trim().is_empty()).then_some(v);
        if let Some(url) = lookup(ENV_API_URL).and_then(non_blank) {
            self.client.base_url = url;
        }
        if let Some(dir) = lookup(ENV_DATA_DIR).and_then(non_blank) {
            self.data_dir = PathBuf::from(dir);
        }
        self
    }

    /// With base URL
    #[inline]
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.client.base_url = url.into();
        self
    }

    /// With data directory
    #[inline]
    #[must_use]
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// With schedule forwarding
    #[inline]
    #[must_use]
    pub fn with_forward_schedule(mut self, forward: bool) -> Self {
        self.booking.forward_schedule = forward;
        self
    }
}
