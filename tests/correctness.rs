//! Property and scenario tests for `quadsort`/`crumsort`, swept across
//! sizes and input patterns and checked against `[T]::sort`/`[T]::sort_by`
//! as the oracle.

mod common;

use common::{all_patterns, MoveOnly, Traps, TEST_SIZES};
use quadsort::{crumsort, crumsort_by_with_scratch_limit, sort, sort_by, SortError};

#[test]
fn quadsort_matches_oracle_across_sizes_and_patterns() {
    for &len in TEST_SIZES {
        for (name, input) in all_patterns(len, len as u64) {
            let mut v = input.clone();
            let mut expected = input;
            expected.sort();

            sort(&mut v).unwrap();
            assert_eq!(v, expected, "quadsort mismatch: pattern={name} len={len}");
        }
    }
}

#[test]
fn crumsort_matches_oracle_across_sizes_and_patterns() {
    for &len in TEST_SIZES {
        for (name, input) in all_patterns(len, len as u64 + 1) {
            let mut v = input.clone();
            let mut expected = input;
            expected.sort();

            crumsort(&mut v).unwrap();
            assert_eq!(v, expected, "crumsort mismatch: pattern={name} len={len}");
        }
    }
}

#[test]
fn quadsort_is_stable_on_heavily_duplicated_keys() {
    for &len in TEST_SIZES {
        if len == 0 {
            continue;
        }
        let keyed: Vec<(u8, usize)> = (0..len).map(|i| ((i % 5) as u8, i)).collect();
        let mut v = keyed.clone();
        sort_by(&mut v, |a, b| a.0 < b.0).unwrap();

        let mut expected = keyed;
        expected.sort();
        assert_eq!(v, expected, "quadsort must keep equal-key elements in input order, len={len}");
    }
}

#[test]
fn quadsort_sorts_move_only_elements() {
    for &len in [0usize, 1, 31, 32, 33, 200, 2000].iter() {
        let mut v: Vec<MoveOnly> = (0..len as i32).rev().map(MoveOnly::new).collect();
        sort(&mut v).unwrap();
        let expected: Vec<MoveOnly> = (0..len as i32).map(MoveOnly::new).collect();
        assert_eq!(v, expected);
    }
}

#[test]
fn crumsort_sorts_move_only_elements() {
    for &len in [0usize, 1, 300, 3000].iter() {
        let mut v: Vec<MoveOnly> = (0..len as i32).rev().map(MoveOnly::new).collect();
        crumsort(&mut v).unwrap();
        let expected: Vec<MoveOnly> = (0..len as i32).map(MoveOnly::new).collect();
        assert_eq!(v, expected);
    }
}

#[test]
fn never_default_constructs_an_element() {
    // `Traps::default()` panics; if either sort ever fabricates a `T` via
    // `Default` instead of moving it in from a real slot, this aborts the
    // test instead of quietly passing.
    for &len in [0usize, 1, 33, 500, 4000].iter() {
        let mut v: Vec<Traps> = (0..len as i32).rev().map(Traps).collect();
        sort(&mut v).unwrap();

        let mut v2: Vec<Traps> = (0..len as i32).rev().map(Traps).collect();
        crumsort(&mut v2).unwrap();
    }
}

#[test]
fn sort_is_idempotent() {
    for &len in TEST_SIZES {
        let mut v = common::random(len, len as u64);
        sort(&mut v).unwrap();
        let once = v.clone();
        sort(&mut v).unwrap();
        assert_eq!(v, once, "sorting an already-sorted array must be a no-op, len={len}");
    }
}

#[test]
fn empty_and_singleton_slices() {
    let mut empty: Vec<i32> = vec![];
    sort(&mut empty).unwrap();
    crumsort(&mut empty).unwrap();
    assert!(empty.is_empty());

    let mut one = vec![7];
    sort(&mut one).unwrap();
    assert_eq!(one, vec![7]);
    crumsort(&mut one).unwrap();
    assert_eq!(one, vec![7]);
}

#[test]
fn fully_reversed_large_input_short_circuits_correctly() {
    // Exercises quad_swap's whole-array-reversed fast path for quadsort,
    // and crum_analyze's equivalent quad_reversal short-circuit for
    // crumsort — both should still produce a fully sorted array, not just
    // an internally-consistent-looking partial one.
    let mut v: Vec<i64> = (0..50_000).rev().collect();
    let expected: Vec<i64> = (0..50_000).collect();

    let mut vq = v.clone();
    sort(&mut vq).unwrap();
    assert_eq!(vq, expected);

    crumsort(&mut v).unwrap();
    assert_eq!(v, expected);
}

#[test]
fn crumsort_sorts_lopsided_duplicate_partitions() {
    // A thin scatter of distinct values against a large majority value
    // biases crum_median_of_cbrt's pivot sample without tripping its
    // `generic` bailout the way a handful of evenly-spread keys would,
    // so fulcrum_partition actually reaches fulcrum_default_partition and
    // (via the lopsided a_size/s_size imbalance check, and the
    // `max`-bounded fast path once `max` is set) fulcrum_reverse_partition,
    // at sizes comfortably past the 2048-element median-of-cbrt cutoff.
    for &len in &[2049usize, 4096, 10_000, 20_000] {
        for seed in 0..4u64 {
            let input = common::skewed_duplicates(len, seed);
            let mut v = input.clone();
            let mut expected = input;
            expected.sort();

            crumsort(&mut v).unwrap();
            assert_eq!(v, expected, "len={len} seed={seed}");
        }
    }
}

#[test]
fn crumsort_with_a_minimal_scratch_limit_still_sorts_correctly() {
    // max_swap_size = 1 forces every partition step down to the smallest
    // scratch fulcrum_partition can structurally work with.
    for &len in &[300usize, 1000, 10_000] {
        let mut v = common::random(len, len as u64 * 7);
        let mut expected = v.clone();
        expected.sort();

        crumsort_by_with_scratch_limit(&mut v, |a, b| a < b, 1).unwrap();
        assert_eq!(v, expected, "len={len}");
    }
}

#[test]
fn crumsort_rejects_zero_scratch_limit_without_touching_input() {
    let mut v = vec![5, 3, 4, 1, 2];
    let original = v.clone();

    let err = crumsort_by_with_scratch_limit(&mut v, |a, b| a < b, 0).unwrap_err();
    assert!(matches!(err, SortError::InvalidScratchLimit));
    assert_eq!(v, original);
}

#[test]
fn custom_comparator_sorts_descending() {
    let mut v: Vec<i32> = common::random(2000, 99);
    sort_by(&mut v, |a, b| b < a).unwrap();

    let mut expected = v.clone();
    expected.sort_by(|a, b| b.cmp(a));
    assert_eq!(v, expected);
}
