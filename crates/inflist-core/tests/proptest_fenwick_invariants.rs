//! Property tests for the row-size Fenwick tree.
//!
//! 1. prefix(i) agrees with a naive running sum.
//! 2. push-built trees equal bulk-built trees.
//! 3. Appending never moves an existing prefix.
//! 4. set(i) shifts prefix(j) for j >= i by exactly new - old.
//! 5. find_prefix returns the largest index whose prefix fits the target.
//! 6. resize keeps the surviving values.
//! 7. Sums past `u32::MAX` stay exact and non-decreasing.

use inflist_core::FenwickTree;
use proptest::prelude::*;

fn sizes(max_len: usize) -> impl Strategy<Value = Vec<u32>> {
    proptest::collection::vec(0u32..=400, 1..=max_len)
}

fn naive_prefix(values: &[u32], i: usize) -> u64 {
    values[..=i].iter().map(|&v| u64::from(v)).sum()
}

proptest! {
    #[test]
    fn prefix_matches_naive(values in sizes(120)) {
        let ft = FenwickTree::from_values(&values);
        for i in 0..values.len() {
            prop_assert_eq!(ft.prefix(i), naive_prefix(&values, i));
            prop_assert_eq!(ft.get(i), u64::from(values[i]));
        }
        prop_assert_eq!(ft.total(), naive_prefix(&values, values.len() - 1));
    }

    #[test]
    fn push_equals_bulk_build(values in sizes(120)) {
        let mut ft = FenwickTree::new(0);
        for &v in &values {
            ft.push(v);
        }
        prop_assert_eq!(ft, FenwickTree::from_values(&values));
    }

    #[test]
    fn append_keeps_existing_prefixes(
        values in sizes(60),
        appended in sizes(60),
    ) {
        let mut ft = FenwickTree::from_values(&values);
        let before: Vec<u64> = (0..values.len()).map(|i| ft.prefix(i)).collect();
        for &v in &appended {
            ft.push(v);
        }
        for (i, &p) in before.iter().enumerate() {
            prop_assert_eq!(ft.prefix(i), p, "prefix({}) moved after append", i);
        }
    }

    #[test]
    fn set_shifts_only_later_prefixes(
        values in sizes(80),
        idx_frac in 0.0f64..1.0,
        new_size in 0u32..=400,
    ) {
        let n = values.len();
        let i = ((idx_frac * n as f64) as usize).min(n - 1);
        let mut ft = FenwickTree::from_values(&values);
        let before: Vec<i64> = (0..n).map(|j| ft.prefix(j) as i64).collect();
        let delta = i64::from(new_size) - i64::from(values[i]);

        ft.set(i, new_size);

        for j in 0..n {
            let expected = if j >= i { before[j] + delta } else { before[j] };
            prop_assert_eq!(ft.prefix(j) as i64, expected);
        }
    }

    #[test]
    fn find_prefix_is_tight(values in sizes(80), target in 0u64..=40_000) {
        let ft = FenwickTree::from_values(&values);
        match ft.find_prefix(target) {
            Some(i) => {
                prop_assert!(ft.prefix(i) <= target);
                if i + 1 < values.len() {
                    prop_assert!(ft.prefix(i + 1) > target);
                }
            }
            None => prop_assert!(u64::from(values[0]) > target),
        }
    }

    #[test]
    fn resize_preserves_prefix(values in sizes(40), new_len in 0usize..=80) {
        let mut ft = FenwickTree::from_values(&values);
        ft.resize(new_len);
        prop_assert_eq!(ft.len(), new_len);
        for i in 0..new_len {
            let expected = values.get(i).copied().map_or(0, u64::from);
            prop_assert_eq!(ft.get(i), expected);
        }
    }

    #[test]
    fn batch_update_matches_sequential(
        values in sizes(40),
        deltas in proptest::collection::vec((0.0f64..1.0, 0i64..=50), 0..=20),
    ) {
        let n = values.len();
        let mapped: Vec<(usize, i64)> = deltas
            .iter()
            .map(|&(f, d)| (((f * n as f64) as usize).min(n - 1), d))
            .collect();
        let mut seq = FenwickTree::from_values(&values);
        for &(i, d) in &mapped {
            seq.update(i, d);
        }
        let mut batch = FenwickTree::from_values(&values);
        batch.batch_update(&mapped);
        prop_assert_eq!(seq, batch);
    }

    #[test]
    fn huge_sizes_keep_prefixes_monotonic(
        values in proptest::collection::vec(
            prop_oneof![0u32..=400, (u32::MAX - 1_000)..=u32::MAX],
            1..=40,
        ),
    ) {
        let ft = FenwickTree::from_values(&values);
        let mut previous = 0u64;
        for i in 0..values.len() {
            let p = ft.prefix(i);
            prop_assert_eq!(p, naive_prefix(&values, i));
            prop_assert!(p >= previous, "prefix({}) went backwards", i);
            previous = p;
        }
        if let Some(i) = ft.find_prefix(previous / 2) {
            prop_assert!(ft.prefix(i) <= previous / 2);
        }
    }
}
