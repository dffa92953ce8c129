#![forbid(unsafe_code)]

//! inflist error model.
//!
//! Each layer keeps its own typed error ([`FetchError`], [`MutationError`],
//! [`ConfigError`]); [`Error`] wraps them for applications that want one
//! type to propagate with `?`. Every variant maps to a [`Recovery`] so the
//! host can decide what to do without matching on the details.

use std::fmt;

use inflist_query::{ConfigError, FetchError, MutationError};

/// Top-level error type for inflist hosts.
#[derive(Debug)]
pub enum Error {
    /// A page fetch failed.
    Fetch(FetchError),
    /// An optimistic mutation transition was invalid.
    Mutation(MutationError),
    /// Configuration could not be loaded.
    Config(ConfigError),
    /// The tracing subscriber could not be installed.
    Logging(String),
}

/// Standard result type for inflist APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// What the host should do about an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// Leave state as is; the next render pass tries again.
    RetryNextPass,
    /// Nothing to redo; drop the error after reporting it.
    Drop,
    /// Continue with built-in defaults.
    UseDefaults,
    /// Stop: the host cannot continue with this input.
    Abort,
}

impl Error {
    /// Suggested recovery for this error.
    #[must_use]
    pub fn recovery(&self) -> Recovery {
        match self {
            Self::Fetch(FetchError::Transport(_)) => Recovery::RetryNextPass,
            Self::Fetch(FetchError::Status { code, .. }) if *code >= 500 || *code == 429 => {
                Recovery::RetryNextPass
            }
            Self::Fetch(FetchError::Status { .. }) => Recovery::Drop,
            Self::Fetch(FetchError::Decode(_)) => Recovery::Drop,
            Self::Fetch(FetchError::Cancelled) => Recovery::Drop,

            Self::Mutation(_) => Recovery::Drop,

            Self::Config(ConfigError::Io(_)) => Recovery::UseDefaults,
            Self::Config(_) => Recovery::Abort,

            Self::Logging(_) => Recovery::Drop,
        }
    }

    /// Error type label for log fields.
    #[must_use]
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Fetch(_) => "fetch",
            Self::Mutation(_) => "mutation",
            Self::Config(_) => "config",
            Self::Logging(_) => "logging",
        }
    }

    /// Whether the host can keep running.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        self.recovery() != Recovery::Abort
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch(err) => write!(f, "{err}"),
            Self::Mutation(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "{err}"),
            Self::Logging(msg) => write!(f, "logging setup: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Fetch(err) => Some(err),
            Self::Mutation(err) => Some(err),
            Self::Config(err) => Some(err),
            Self::Logging(_) => None,
        }
    }
}

impl From<FetchError> for Error {
    fn from(err: FetchError) -> Self {
        Self::Fetch(err)
    }
}

impl From<MutationError> for Error {
    fn from(err: MutationError) -> Self {
        Self::Mutation(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl fmt::Display for Recovery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RetryNextPass => write!(f, "retry_next_pass"),
            Self::Drop => write!(f, "drop"),
            Self::UseDefaults => write!(f, "use_defaults"),
            Self::Abort => write!(f, "abort"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_fetch_failures_retry() {
        let err = Error::from(FetchError::Transport("timeout".into()));
        assert_eq!(err.recovery(), Recovery::RetryNextPass);
        let busy = Error::from(FetchError::Status {
            code: 503,
            message: "busy".into(),
        });
        assert_eq!(busy.recovery(), Recovery::RetryNextPass);
        assert_eq!(busy.error_type(), "fetch");
    }

    #[test]
    fn client_errors_are_dropped() {
        let err = Error::from(FetchError::Status {
            code: 404,
            message: "gone".into(),
        });
        assert_eq!(err.recovery(), Recovery::Drop);
        assert!(err.is_recoverable());
    }

    #[test]
    fn invalid_config_aborts() {
        let err = Error::from(ConfigError::Invalid(vec!["batch_size must be > 0".into()]));
        assert_eq!(err.recovery(), Recovery::Abort);
        assert!(!err.is_recoverable());
        assert_eq!(err.to_string(), "invalid config: batch_size must be > 0");
    }

    #[test]
    fn missing_config_file_uses_defaults() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no file");
        let err = Error::from(ConfigError::Io(io));
        assert_eq!(err.recovery(), Recovery::UseDefaults);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn recovery_labels() {
        assert_eq!(Recovery::RetryNextPass.to_string(), "retry_next_pass");
        assert_eq!(Recovery::Abort.to_string(), "abort");
    }
}
