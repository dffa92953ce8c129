#![forbid(unsafe_code)]

//! Query identity.
//!
//! A [`QueryKey`] is the ordered set of parameters that decides which
//! paginated collection is being viewed: a scope segment (`"shared-workflows"`)
//! followed by filter values (search text, limit, owner). Two keys name the
//! same collection iff every segment matches; changing any segment means a
//! different collection, never a partial update of the old one.

use std::fmt;
use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};

/// Stable identity of a paginated query.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryKey {
    segments: Vec<String>,
}

impl QueryKey {
    /// Create a key with only its scope segment.
    #[must_use]
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            segments: vec![scope.into()],
        }
    }

    /// Append a parameter segment.
    #[must_use]
    pub fn with(mut self, segment: impl fmt::Display) -> Self {
        self.segments.push(segment.to_string());
        self
    }

    /// The scope (first) segment.
    #[must_use]
    pub fn scope(&self) -> &str {
        self.segments.first().map_or("", String::as_str)
    }

    /// All segments in order.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Whether this key begins with every segment of `prefix`.
    #[must_use]
    pub fn starts_with(&self, prefix: &[&str]) -> bool {
        prefix.len() <= self.segments.len()
            && prefix
                .iter()
                .zip(&self.segments)
                .all(|(want, have)| *want == have)
    }

    /// 64-bit fingerprint for log fields and cheap change detection.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = FxHasher::default();
        self.segments.hash(&mut hasher);
        hasher.finish()
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}
