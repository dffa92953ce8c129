#![forbid(unsafe_code)]

//! Query configuration as data.
//!
//! ```toml
//! # inflist.toml
//! batch_size = 20
//! debounce_ms = 250
//! ```
//!
//! ```rust,ignore
//! let config = QueryConfig::from_toml_file("inflist.toml")?;
//! ```
//!
//! Every field defaults to the value the console list hooks use, so
//! `QueryConfig::default()` and an empty file behave identically.

#[cfg(feature = "config")]
use std::path::Path;

use serde::{Deserialize, Serialize};
use web_time::Duration;

#[cfg(feature = "config")]
use crate::error::ConfigError;
use crate::paging::{DEFAULT_BATCH_SIZE, OffsetPaging};

/// Tunables for paginated queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Items requested per page.
    pub batch_size: usize,
    /// Quiet period before search input becomes part of the query key.
    pub debounce_ms: u64,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            debounce_ms: 250,
        }
    }
}

impl QueryConfig {
    /// Debounce period as a duration.
    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Offset paging with this config's batch size.
    #[must_use]
    pub fn offset_paging(&self) -> OffsetPaging {
        OffsetPaging::new(self.batch_size)
    }

    /// Problems with the current values; empty when valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.batch_size == 0 {
            errors.push("batch_size must be > 0".into());
        }
        if self.batch_size > 1_000 {
            errors.push(format!("batch_size must be <= 1000, got {}", self.batch_size));
        }
        errors
    }

    /// Load from a TOML string and validate.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(ConfigError::Toml)?;
        config.checked()
    }

    /// Load from a TOML file and validate.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string and validate.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s).map_err(ConfigError::Json)?;
        config.checked()
    }

    #[cfg(feature = "config")]
    fn checked(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }
}
