#![forbid(unsafe_code)]

//! Row size cache and visible-range computation.
//!
//! Every renderable row has a size: the measured size once the row has been
//! laid out, the [`SizeEstimate`] before that. Sizes live in a Fenwick tree
//! so the start offset of any row, and the row under any scroll offset, are
//! O(log n) queries.
//!
//! # Operations
//!
//! | Operation | Time |
//! |-----------|------|
//! | [`SizeCache::start`] | O(log n) |
//! | [`SizeCache::remeasure`] | O(log n) |
//! | [`SizeCache::visible_range`] | O(log n) |
//! | [`SizeCache::sync_len`] (append k rows) | O(k log n) |
//! | [`compute_visible_range`] (plain slice) | O(n) |
//!
//! # Invariants
//!
//! 1. `start(i)` is the sum of sizes `[0..i)`; `start(0) == 0`.
//! 2. Growing the cache never changes `start(i)` for an existing row.
//! 3. `remeasure(i, s)` shifts `start(j)` by `s - size(i)` for every `j > i`
//!    and leaves `start(j)` for `j <= i` untouched.
//! 4. A visible range always lies inside `[0, len)`.
//!
//! Offsets are reported as `u32` and saturate at `u32::MAX`: `start(i)` is
//! `min(sum, u32::MAX)`, so it never decreases with `i`, and
//! [`SizeCache::visible_range`] agrees with [`compute_visible_range`] over
//! the same sizes. Invariant 3 holds for every `j` whose offset stays below
//! the cap.

use std::ops::Range;

use inflist_core::{FenwickTree, SizeEstimate};

/// Rows intersecting `[scroll_offset, scroll_offset + viewport_height)`,
/// padded by `overscan` rows on each side and clamped to `[0, sizes.len())`.
///
/// Linear scan over a plain slice of row sizes. Returns an empty range for an
/// empty slice or a zero-height viewport.
///
/// ```
/// use inflist_widgets::virtualized::compute_visible_range;
///
/// let sizes = [50; 100];
/// assert_eq!(compute_visible_range(0, 400, &sizes, 5), 0..13);
/// assert_eq!(compute_visible_range(1_000, 400, &sizes, 5), 15..33);
/// ```
#[must_use]
pub fn compute_visible_range(
    scroll_offset: u32,
    viewport_height: u32,
    sizes: &[u32],
    overscan: usize,
) -> Range<usize> {
    let n = sizes.len();
    if n == 0 || viewport_height == 0 {
        return 0..0;
    }
    let bottom = scroll_offset.saturating_add(viewport_height);

    let mut first = n;
    let mut last = n;
    let mut start = 0u32;
    for (i, &size) in sizes.iter().enumerate() {
        if start >= bottom {
            last = i;
            break;
        }
        let end = start.saturating_add(size);
        if first == n && end > scroll_offset {
            first = i;
        }
        start = end;
    }
    let first = first.min(last);

    pad(first..last, overscan, n)
}

fn pad(strict: Range<usize>, overscan: usize, n: usize) -> Range<usize> {
    let start = strict.start.saturating_sub(overscan).min(n);
    let end = strict.end.saturating_add(overscan).min(n);
    start..end.max(start)
}

/// Per-row sizes for a windowed list.
#[derive(Debug, Clone, Default)]
pub struct SizeCache {
    estimate: SizeEstimate,
    tree: FenwickTree,
    measured: Vec<bool>,
}

impl SizeCache {
    /// Empty cache whose new rows start at `estimate`.
    #[must_use]
    pub fn new(estimate: SizeEstimate) -> Self {
        Self {
            estimate,
            tree: FenwickTree::new(0),
            measured: Vec::new(),
        }
    }

    /// Number of rows tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.measured.len()
    }

    /// Whether no rows are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.measured.is_empty()
    }

    /// The estimator used for unmeasured rows.
    #[must_use]
    pub fn estimate(&self) -> &SizeEstimate {
        &self.estimate
    }

    /// Grow or shrink to `len` rows. New rows take their estimated size;
    /// existing rows keep theirs.
    pub fn sync_len(&mut self, len: usize) {
        let current = self.len();
        if len > current {
            self.measured.reserve(len - current);
            for index in current..len {
                self.tree.push(self.estimate.estimate(index));
                self.measured.push(false);
            }
        } else if len < current {
            self.tree.resize(len);
            self.measured.truncate(len);
        }
    }

    /// Current size of row `index`; zero when out of range.
    #[must_use]
    pub fn size(&self, index: usize) -> u32 {
        saturate(self.tree.get(index))
    }

    /// Whether row `index` has a real measurement.
    #[must_use]
    pub fn is_measured(&self, index: usize) -> bool {
        self.measured.get(index).copied().unwrap_or(false)
    }

    /// Offset of the top edge of row `index`. For `index >= len` this is the
    /// total size.
    #[must_use]
    pub fn start(&self, index: usize) -> u32 {
        if index == 0 {
            0
        } else {
            saturate(self.tree.prefix(index - 1))
        }
    }

    /// Offset just past the bottom edge of row `index`.
    #[must_use]
    pub fn end(&self, index: usize) -> u32 {
        saturate(self.tree.prefix(index))
    }

    /// Sum of every row's size.
    #[must_use]
    pub fn total_size(&self) -> u32 {
        saturate(self.tree.total())
    }

    /// Record the observed size of row `index`.
    ///
    /// Returns the change applied to every later row's start offset, or
    /// `None` when `index` is not tracked.
    pub fn remeasure(&mut self, index: usize, size: u32) -> Option<i64> {
        let flag = self.measured.get_mut(index)?;
        *flag = true;
        let old = self.size(index);
        self.tree.set(index, size);
        Some(i64::from(size) - i64::from(old))
    }

    /// Drop the measurement of row `index` and return it to its estimate.
    pub fn forget(&mut self, index: usize) {
        if let Some(flag) = self.measured.get_mut(index) {
            *flag = false;
            self.tree.set(index, self.estimate.estimate(index));
        }
    }

    /// Drop every row.
    pub fn clear(&mut self) {
        self.tree.clear();
        self.measured.clear();
    }

    /// Replace the estimator. Unmeasured rows are re-estimated.
    pub fn set_estimate(&mut self, estimate: SizeEstimate) {
        self.estimate = estimate;
        let sizes: Vec<u32> = (0..self.len())
            .map(|i| {
                if self.measured[i] {
                    self.size(i)
                } else {
                    self.estimate.estimate(i)
                }
            })
            .collect();
        self.tree.rebuild(&sizes);
    }

    /// Row occupying `offset`, or `len` when `offset` is past the end.
    #[must_use]
    pub fn index_at(&self, offset: u32) -> usize {
        // No row ends past the cap, so nothing occupies it.
        if offset == u32::MAX {
            return self.len();
        }
        // Rows ending at or before `offset` lie above it.
        self.tree
            .find_prefix(u64::from(offset))
            .map_or(0, |i| i + 1)
            .min(self.len())
    }

    /// Rows intersecting the viewport, padded by `overscan` and clamped to
    /// `[0, len)`.
    #[must_use]
    pub fn visible_range(
        &self,
        scroll_offset: u32,
        viewport_height: u32,
        overscan: usize,
    ) -> Range<usize> {
        let n = self.len();
        if n == 0 || viewport_height == 0 {
            return 0..0;
        }
        let bottom = scroll_offset.saturating_add(viewport_height);
        let first = self.index_at(scroll_offset);
        // Row 0 always starts above `bottom`; row i > 0 does iff
        // prefix(i - 1) <= bottom - 1.
        let last = self
            .tree
            .find_prefix(u64::from(bottom - 1))
            .map_or(1, |j| j + 2)
            .min(n);
        pad(first.min(last)..last, overscan, n)
    }

    /// Sizes of every row, in order.
    #[must_use]
    pub fn sizes(&self) -> Vec<u32> {
        (0..self.len()).map(|i| self.size(i)).collect()
    }
}

/// Offsets past `u32::MAX` pin to the cap.
#[inline]
fn saturate(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
