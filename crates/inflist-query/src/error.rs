#![forbid(unsafe_code)]

//! Query-layer errors.

use std::fmt;

use crate::optimistic::{MutationId, MutationPhase};

/// Why a page fetch did not produce items.
///
/// Reported by the I/O layer through
/// [`InfiniteQuery::resolve`](crate::InfiniteQuery::resolve). The query keeps
/// the error for display and leaves `has_next_page` untouched, so the next
/// render pass can try again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request never produced a response (connection, DNS, timeout).
    Transport(String),
    /// The server answered with a non-success status.
    Status { code: u16, message: String },
    /// The response body could not be decoded into items.
    Decode(String),
    /// The request was abandoned before completion.
    Cancelled,
}

impl FetchError {
    /// Short label for log fields.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Status { .. } => "status",
            Self::Decode(_) => "decode",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(msg) => write!(f, "transport error: {msg}"),
            Self::Status { code, message } => write!(f, "server returned {code}: {message}"),
            Self::Decode(msg) => write!(f, "failed to decode page: {msg}"),
            Self::Cancelled => f.write_str("fetch cancelled"),
        }
    }
}

impl std::error::Error for FetchError {}

/// Invalid optimistic-mutation transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationError {
    /// No mutation with this id was ever applied.
    Unknown(MutationId),
    /// The mutation already settled.
    NotPending {
        id: MutationId,
        phase: MutationPhase,
    },
}

impl fmt::Display for MutationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(id) => write!(f, "unknown mutation {}", id.raw()),
            Self::NotPending { id, phase } => {
                write!(f, "mutation {} already {phase:?}", id.raw())
            }
        }
    }
}

impl std::error::Error for MutationError {}

/// Failure loading a configuration file.
#[derive(Debug)]
pub enum ConfigError {
    /// Reading the file failed.
    Io(std::io::Error),
    /// TOML parse or schema error.
    #[cfg(feature = "config")]
    Toml(toml::de::Error),
    /// JSON parse or schema error.
    #[cfg(feature = "config")]
    Json(serde_json::Error),
    /// Parsed values failed validation.
    Invalid(Vec<String>),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "config I/O error: {e}"),
            #[cfg(feature = "config")]
            Self::Toml(e) => write!(f, "config TOML error: {e}"),
            #[cfg(feature = "config")]
            Self::Json(e) => write!(f, "config JSON error: {e}"),
            Self::Invalid(errors) => write!(f, "invalid config: {}", errors.join("; ")),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Json(e) => Some(e),
            Self::Invalid(_) => None,
        }
    }
}
