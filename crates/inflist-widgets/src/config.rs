#![forbid(unsafe_code)]

//! List renderer configuration as data.
//!
//! ```toml
//! estimate_size = 72
//! overscan = 8
//! auto_fetch = true
//! viewport_height = 600
//! ```
//!
//! Missing fields take the defaults of the console's list component.

#[cfg(feature = "config")]
use std::path::Path;

use inflist_core::{DEFAULT_ESTIMATE, SizeEstimate};
#[cfg(feature = "config")]
use inflist_query::ConfigError;
use serde::{Deserialize, Serialize};

/// Default number of rows rendered beyond each viewport edge.
pub const DEFAULT_OVERSCAN: usize = 5;

/// Default viewport height in pixels.
pub const DEFAULT_VIEWPORT_HEIGHT: u32 = 400;

/// Tunables for [`VirtualizedInfiniteList`](crate::VirtualizedInfiniteList).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    /// Estimated size of an unmeasured row.
    pub estimate_size: u32,
    /// Rows rendered beyond each viewport edge.
    pub overscan: usize,
    /// Append a loading row and fetch the next page when it scrolls into view.
    pub auto_fetch: bool,
    /// Initial viewport height.
    pub viewport_height: u32,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            estimate_size: DEFAULT_ESTIMATE,
            overscan: DEFAULT_OVERSCAN,
            auto_fetch: true,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

impl ListConfig {
    /// Fixed estimator for `estimate_size`.
    #[must_use]
    pub fn size_estimate(&self) -> SizeEstimate {
        SizeEstimate::fixed(self.estimate_size)
    }

    #[must_use]
    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    #[must_use]
    pub fn with_auto_fetch(mut self, auto_fetch: bool) -> Self {
        self.auto_fetch = auto_fetch;
        self
    }

    #[must_use]
    pub fn with_viewport_height(mut self, height: u32) -> Self {
        self.viewport_height = height;
        self
    }

    #[must_use]
    pub fn with_estimate_size(mut self, size: u32) -> Self {
        self.estimate_size = size;
        self
    }

    /// Problems with the current values; empty when valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.estimate_size == 0 {
            errors.push("estimate_size must be > 0".into());
        }
        if self.overscan > 1_000 {
            errors.push(format!("overscan must be <= 1000, got {}", self.overscan));
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ListConfig::default();
        assert_eq!(config.estimate_size, 50);
        assert_eq!(config.overscan, 5);
        assert!(config.auto_fetch);
        assert_eq!(config.viewport_height, 400);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn zero_estimate_is_invalid() {
        let config = ListConfig::default().with_estimate_size(0);
        assert_eq!(config.validate(), vec!["estimate_size must be > 0".to_string()]);
    }

    #[cfg(feature = "config")]
    #[test]
    fn toml_overrides_some_fields() {
        let config = ListConfig::from_toml_str("overscan = 2\nauto_fetch = false").unwrap();
        assert_eq!(config.overscan, 2);
        assert!(!config.auto_fetch);
        assert_eq!(config.estimate_size, 50);
    }

    #[cfg(feature = "config")]
    #[test]
    fn json_type_error_is_reported() {
        let err = ListConfig::from_json_str(r#"{"overscan": "lots"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }
}
