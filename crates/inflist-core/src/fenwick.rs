#![forbid(unsafe_code)]

//! Fenwick tree (binary indexed tree) over row sizes.
//!
//! Row `i` of a virtualized list starts at `prefix(i - 1)` and ends at
//! `prefix(i)`. Keeping sizes in a Fenwick tree makes both a single
//! remeasure and an offset lookup `O(log n)`, and turns "which row contains
//! pixel `y`" into a binary-lifting descent ([`FenwickTree::find_prefix`]).
//!
//! Values are `u32` row sizes; sums are `u64`, so prefixes stay exact and
//! non-decreasing for any list shorter than `2^32` rows.
//!
//! # Invariants
//!
//! - `prefix(len - 1) == total()`.
//! - `prefix(i) <= prefix(i + 1)` while every stored value is non-negative.
//! - `get(i)` returns exactly what was last stored at `i` by `from_values`,
//!   `push`, `set`, or the net effect of `update` deltas.
//! - Growing via [`FenwickTree::push`] never changes `prefix(j)` for any
//!   pre-existing `j`.

/// Prefix-sum tree over `u32` values with `u64` sums.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenwickTree {
    /// 1-based tree; `tree[0]` is unused.
    tree: Vec<u64>,
}

impl Default for FenwickTree {
    fn default() -> Self {
        Self::new(0)
    }
}

#[inline]
fn lowbit(i: usize) -> usize {
    i & i.wrapping_neg()
}

impl FenwickTree {
    /// Create a tree of `n` zeros.
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self {
            tree: vec![0; n + 1],
        }
    }

    /// Build a tree from values in `O(n)`.
    #[must_use]
    pub fn from_values(values: &[u32]) -> Self {
        let mut ft = Self::new(0);
        ft.rebuild(values);
        ft
    }

    /// Number of stored values.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.len() - 1
    }

    /// Whether the tree holds no values.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replace the whole contents with `values` in `O(n)`.
    pub fn rebuild(&mut self, values: &[u32]) {
        self.fill(values.iter().map(|&v| u64::from(v)));
    }

    fn fill(&mut self, values: impl ExactSizeIterator<Item = u64>) {
        let n = values.len();
        self.tree.clear();
        self.tree.reserve(n + 1);
        self.tree.push(0);
        self.tree.extend(values);
        for i in 1..=n {
            let parent = i + lowbit(i);
            if parent <= n {
                let carry = self.tree[i];
                self.tree[parent] = self.tree[parent].wrapping_add(carry);
            }
        }
    }

    /// Add `delta` to the value at `index`. Out-of-range indices are ignored.
    pub fn update(&mut self, index: usize, delta: i64) {
        let n = self.len();
        if index >= n {
            return;
        }
        // Two's complement: adding the reinterpreted delta subtracts.
        let delta = delta as u64;
        let mut i = index + 1;
        while i <= n {
            self.tree[i] = self.tree[i].wrapping_add(delta);
            i += lowbit(i);
        }
    }

    /// Apply several `(index, delta)` pairs.
    pub fn batch_update(&mut self, deltas: &[(usize, i64)]) {
        for &(index, delta) in deltas {
            self.update(index, delta);
        }
    }

    /// Overwrite the value at `index`. Out-of-range indices are ignored.
    pub fn set(&mut self, index: usize, value: u32) {
        if index >= self.len() {
            return;
        }
        let old = self.get(index);
        self.update(index, (u64::from(value).wrapping_sub(old)) as i64);
    }

    /// Value stored at `index` (0 when out of range).
    #[must_use]
    pub fn get(&self, index: usize) -> u64 {
        if index >= self.len() {
            return 0;
        }
        if index == 0 {
            return self.prefix(0);
        }
        self.prefix(index).wrapping_sub(self.prefix(index - 1))
    }

    /// Inclusive prefix sum `values[0..=index]`. Indices past the end are
    /// clamped to the last value.
    #[must_use]
    pub fn prefix(&self, index: usize) -> u64 {
        self.sum_to(index.saturating_add(1).min(self.len()))
    }

    /// Inclusive range sum `values[left..=right]`.
    #[must_use]
    pub fn range(&self, left: usize, right: usize) -> u64 {
        if left > right || left >= self.len() {
            return 0;
        }
        let upper = self.prefix(right);
        if left == 0 {
            upper
        } else {
            upper.wrapping_sub(self.prefix(left - 1))
        }
    }

    /// Sum of every value.
    #[inline]
    #[must_use]
    pub fn total(&self) -> u64 {
        self.sum_to(self.len())
    }

    /// Largest index `i` with `prefix(i) <= target`, or `None` when even the
    /// first value exceeds `target` (or the tree is empty).
    #[must_use]
    pub fn find_prefix(&self, target: u64) -> Option<usize> {
        let n = self.len();
        let mut pos = 0usize;
        let mut remaining = target;
        let mut step = if n == 0 {
            0
        } else {
            1usize << (usize::BITS - 1 - n.leading_zeros())
        };
        while step > 0 {
            let next = pos + step;
            if next <= n && self.tree[next] <= remaining {
                pos = next;
                remaining -= self.tree[next];
            }
            step >>= 1;
        }
        pos.checked_sub(1)
    }

    /// Append one value in `O(log n)`.
    pub fn push(&mut self, value: u32) {
        let i = self.tree.len();
        // tree[i] covers values (i - lowbit(i), i]; everything but the new
        // value is already summed by the existing prefix.
        let covered_from = i - lowbit(i);
        let existing = self.sum_to(i - 1).wrapping_sub(self.sum_to(covered_from));
        self.tree.push(u64::from(value).wrapping_add(existing));
    }

    /// Grow (with zeros) or shrink to `n` values, preserving the prefix that
    /// survives.
    pub fn resize(&mut self, n: usize) {
        let len = self.len();
        if n >= len {
            for _ in len..n {
                self.push(0);
            }
        } else {
            let kept: Vec<u64> = (0..n).map(|i| self.get(i)).collect();
            self.fill(kept.into_iter());
        }
    }

    /// Drop every value.
    pub fn clear(&mut self) {
        self.tree.truncate(1);
    }

    /// Sum of 1-based positions `(0, i]`.
    fn sum_to(&self, mut i: usize) -> u64 {
        let mut sum = 0u64;
        while i > 0 {
            sum = sum.wrapping_add(self.tree[i]);
            i -= lowbit(i);
        }
        sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tree() {
        let ft = FenwickTree::new(0);
        assert!(ft.is_empty());
        assert_eq!(ft.total(), 0);
        assert_eq!(ft.find_prefix(100), None);
        assert_eq!(ft.get(3), 0);
    }

    #[test]
    fn prefix_and_get() {
        let ft = FenwickTree::from_values(&[50, 50, 80, 20]);
        assert_eq!(ft.prefix(0), 50);
        assert_eq!(ft.prefix(2), 180);
        assert_eq!(ft.total(), 200);
        assert_eq!(ft.get(2), 80);
        assert_eq!(ft.range(1, 2), 130);
    }

    #[test]
    fn push_matches_from_values() {
        let values = [3, 1, 4, 1, 5, 9, 2, 6, 5, 3, 5];
        let mut pushed = FenwickTree::new(0);
        for &v in &values {
            pushed.push(v);
        }
        assert_eq!(pushed, FenwickTree::from_values(&values));
    }

    #[test]
    fn set_shifts_later_prefixes_only() {
        let mut ft = FenwickTree::from_values(&[50; 6]);
        ft.set(2, 120);
        assert_eq!(ft.prefix(1), 100);
        assert_eq!(ft.prefix(2), 220);
        assert_eq!(ft.prefix(5), 370);
    }

    #[test]
    fn find_prefix_skips_zero_sized_rows() {
        let ft = FenwickTree::from_values(&[10, 0, 0, 10]);
        // prefix: 10, 10, 10, 20
        assert_eq!(ft.find_prefix(9), None);
        assert_eq!(ft.find_prefix(10), Some(2));
        assert_eq!(ft.find_prefix(19), Some(2));
        assert_eq!(ft.find_prefix(20), Some(3));
        assert_eq!(ft.find_prefix(u64::MAX), Some(3));
    }

    #[test]
    fn sums_past_u32_stay_monotonic() {
        let mut ft = FenwickTree::from_values(&[u32::MAX, 10, 10]);
        let max = u64::from(u32::MAX);
        assert_eq!(ft.prefix(0), max);
        assert_eq!(ft.prefix(1), max + 10);
        assert_eq!(ft.total(), max + 20);
        assert_eq!(ft.find_prefix(max + 9), Some(0));
        assert_eq!(ft.find_prefix(max + 10), Some(1));
        ft.set(1, u32::MAX);
        assert_eq!(ft.get(1), max);
        assert_eq!(ft.total(), 2 * max + 10);
        ft.update(1, -i64::from(u32::MAX));
        assert_eq!(ft.get(1), 0);
        assert_eq!(ft.total(), max + 10);
    }

    #[test]
    fn resize_shrink_and_clear() {
        let mut ft = FenwickTree::from_values(&[1, 2, 3, 4]);
        ft.resize(2);
        assert_eq!(ft.len(), 2);
        assert_eq!(ft.total(), 3);
        ft.clear();
        assert!(ft.is_empty());
        ft.push(7);
        assert_eq!(ft.total(), 7);
    }

    #[test]
    fn out_of_range_writes_are_ignored() {
        let mut ft = FenwickTree::from_values(&[5, 5]);
        ft.update(9, 10);
        ft.set(2, 10);
        assert_eq!(ft.total(), 10);
    }
}
