#![forbid(unsafe_code)]

//! Row size estimation.
//!
//! Before a row has been measured its size comes from a [`SizeEstimate`]:
//! either one fixed size for every row, or a per-index function for lists
//! whose rows are known to differ (headers, dividers, expanded cards).

use std::fmt;
use std::sync::Arc;

/// Default estimated row size in pixels.
pub const DEFAULT_ESTIMATE: u32 = 50;

/// Estimated size of a row that has not been measured yet.
#[derive(Clone)]
pub enum SizeEstimate {
    /// Every row is estimated at the same size.
    Fixed(u32),
    /// Size depends on the row index.
    PerIndex(Arc<dyn Fn(usize) -> u32 + Send + Sync>),
}

impl SizeEstimate {
    /// Estimate every row at `size`.
    #[must_use]
    pub const fn fixed(size: u32) -> Self {
        Self::Fixed(size)
    }

    /// Estimate each row with `f(index)`.
    #[must_use]
    pub fn per_index(f: impl Fn(usize) -> u32 + Send + Sync + 'static) -> Self {
        Self::PerIndex(Arc::new(f))
    }

    /// Estimated size for `index`.
    #[inline]
    #[must_use]
    pub fn estimate(&self, index: usize) -> u32 {
        match self {
            Self::Fixed(size) => *size,
            Self::PerIndex(f) => f(index),
        }
    }
}

impl Default for SizeEstimate {
    fn default() -> Self {
        Self::Fixed(DEFAULT_ESTIMATE)
    }
}

impl fmt::Debug for SizeEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(size) => f.debug_tuple("Fixed").field(size).finish(),
            Self::PerIndex(_) => f.write_str("PerIndex(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_ignores_index() {
        let est = SizeEstimate::fixed(100);
        assert_eq!(est.estimate(0), 100);
        assert_eq!(est.estimate(9_999), 100);
    }

    #[test]
    fn per_index_is_consulted() {
        let est = SizeEstimate::per_index(|i| if i % 10 == 0 { 32 } else { 64 });
        assert_eq!(est.estimate(0), 32);
        assert_eq!(est.estimate(3), 64);
        assert_eq!(format!("{est:?}"), "PerIndex(..)");
    }

    #[test]
    fn default_is_fifty() {
        assert_eq!(SizeEstimate::default().estimate(7), DEFAULT_ESTIMATE);
    }
}
