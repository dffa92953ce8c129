#![forbid(unsafe_code)]

//! Subscriber setup for hosts that do not bring their own.
//!
//! All inflist events use dotted targets under `inflist` (`inflist.list`,
//! `inflist.query`, `inflist.store`, `inflist.optimistic`, `inflist.console`).
//! When `RUST_LOG` is set it wins; otherwise each configured target is
//! enabled at the configured level.

use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{Error, Result};

/// Target prefix shared by every inflist event.
pub const DEFAULT_LOG_TARGET: &str = "inflist";

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: Level,
    /// Emit one JSON object per line instead of human-readable text.
    pub json: bool,
    pub targets: Vec<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            json: false,
            targets: vec![DEFAULT_LOG_TARGET.to_string()],
        }
    }
}

impl LoggingConfig {
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// `target=level` directives, comma separated.
    #[must_use]
    pub fn directives(&self) -> String {
        let level = level_str(self.level);
        self.targets
            .iter()
            .map(|target| format!("{target}={level}"))
            .collect::<Vec<_>>()
            .join(",")
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.directives()))
    }
}

const fn level_str(level: Level) -> &'static str {
    match level {
        Level::TRACE => "trace",
        Level::DEBUG => "debug",
        Level::INFO => "info",
        Level::WARN => "warn",
        Level::ERROR => "error",
    }
}

/// Install a global fmt subscriber for `config`.
///
/// Fails with [`Error::Logging`] when a global subscriber is already set.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let registry = tracing_subscriber::registry().with(config.filter());
    let installed = if config.json {
        registry.with(fmt::layer().json().with_target(true)).try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };
    installed.map_err(|e| Error::Logging(e.to_string()))
}
