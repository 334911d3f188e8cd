//! The unstable, partition-based sort: below a fixed element count it
//! defers to [`crate::quadsort`] outright, above it scans the array in
//! quadrants ([`analyze::crum_analyze`]) before choosing, per quadrant,
//! between a plain quadsort and a branchless pivot partition
//! ([`fulcrum::fulcrum_partition`]).

mod analyze;
mod fulcrum;
mod pivot;

use crate::error::SortError;
use crate::quadsort::quadsort_with_scratch;
use crate::scratch::Scratch;
use analyze::crum_analyze;

/// Above this many elements in a quadrant, [`analyze::crum_analyze`] skips
/// its usual order-streak accounting for that quadrant and routes it
/// straight to [`fulcrum::fulcrum_partition`] — avoids scanning a span
/// larger than a typical L3 cache purely to decide how to sort it.
pub(crate) const QUAD_CACHE: usize = 262_144;

/// Default scratch-buffer element count for [`crumsort`]/[`crumsort_by`].
pub(crate) const CRUM_AUX: usize = 512;

/// At or below this many elements, `crumsort` is just `quadsort` — too
/// small a range for partitioning to pay for itself.
const CRUMSORT_QUADSORT_CUTOFF: usize = 256;

/// Sorts `array[0..nmemb)` in place using `scratch` (sized by the caller,
/// at least `max_swap_size.min(nmemb)` elements): quadsort outright at or
/// below [`CRUMSORT_QUADSORT_CUTOFF`] elements, otherwise
/// [`analyze::crum_analyze`]'s quadrant scan.
///
/// # Safety
/// `array[0..nmemb)` must be valid for reads and writes.
pub(crate) unsafe fn crumsort_with_scratch<T, F>(
    array: *mut T,
    scratch: &mut Scratch<T>,
    nmemb: usize,
    is_less: &mut F,
) where
    F: FnMut(&T, &T) -> bool,
{
    unsafe {
        if nmemb <= CRUMSORT_QUADSORT_CUTOFF {
            quadsort_with_scratch(array, scratch, nmemb, is_less);
        } else {
            crum_analyze(array, scratch, nmemb, is_less);
        }
    }
}

fn scratch_len_for(nmemb: usize, max_swap_size: usize) -> usize {
    if nmemb <= CRUMSORT_QUADSORT_CUTOFF {
        return nmemb;
    }
    max_swap_size.min(nmemb).max(64)
}

/// Sorts `v` in place, unstably, using `T`'s natural [`Ord`] as the
/// comparator.
///
/// Defaults the scratch cap to [`CRUM_AUX`] (512) elements; use
/// [`crumsort_by_with_scratch_limit`] to change it.
///
/// # Errors
/// Returns [`SortError::ScratchAllocation`] if the scratch buffer cannot
/// be allocated. On that path `v` is left completely untouched.
pub fn crumsort<T>(v: &mut [T]) -> Result<(), SortError>
where
    T: Ord,
{
    crumsort_by(v, |a, b| a < b)
}

/// Sorts `v` in place, unstably, using `is_less` as the strict weak
/// ordering.
///
/// Defaults the scratch cap to [`CRUM_AUX`] (512) elements; use
/// [`crumsort_by_with_scratch_limit`] to change it.
///
/// `is_less` must be side-effect-free and define a strict weak ordering.
/// A comparator that violates this leaves `v` an unsorted but valid
/// permutation of its input — this sort does not detect the violation.
/// Unlike [`crate::quadsort::sort_by`], equal elements may be reordered.
///
/// # Errors
/// Returns [`SortError::ScratchAllocation`] if the scratch buffer cannot
/// be allocated. On that path `v` is left completely untouched.
pub fn crumsort_by<T, F>(v: &mut [T], is_less: F) -> Result<(), SortError>
where
    F: FnMut(&T, &T) -> bool,
{
    crumsort_by_with_scratch_limit(v, is_less, CRUM_AUX)
}

/// Sorts `v` in place, unstably, using `is_less`, capping the scratch
/// buffer crumsort ever allocates at `max_swap_size` elements (the
/// partition step falls back to its branchless in-place scan regardless
/// of this cap; this only bounds the bulk-copy write buffer and the
/// pivot-sample working area).
///
/// A smaller cap trades some partition throughput for lower peak memory;
/// `max_swap_size` as low as `1` is valid (see the scratch-starved
/// partition scenario in the crate's test suite) but will be raised
/// internally to whatever minimum a single partition step structurally
/// needs.
///
/// # Errors
/// Returns [`SortError::InvalidScratchLimit`] if `max_swap_size == 0`,
/// or [`SortError::ScratchAllocation`] if the scratch buffer cannot be
/// allocated. On either path `v` is left completely untouched.
pub fn crumsort_by_with_scratch_limit<T, F>(
    v: &mut [T],
    mut is_less: F,
    max_swap_size: usize,
) -> Result<(), SortError>
where
    F: FnMut(&T, &T) -> bool,
{
    if max_swap_size == 0 {
        return Err(SortError::InvalidScratchLimit);
    }

    let nmemb = v.len();
    let array = v.as_mut_ptr();
    let mut scratch = Scratch::new(scratch_len_for(nmemb, max_swap_size))?;

    unsafe {
        crumsort_with_scratch(array, &mut scratch, nmemb, &mut is_less);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_the_concrete_spec_example() {
        let mut v = vec![3, 1, 4, 1, 5, 9, 2, 6, 5, 3, 5];
        crumsort(&mut v).unwrap();
        assert_eq!(v, vec![1, 1, 2, 3, 3, 4, 5, 5, 5, 6, 9]);
    }

    #[test]
    fn empty_and_singleton() {
        let mut empty: Vec<i32> = vec![];
        crumsort(&mut empty).unwrap();
        assert!(empty.is_empty());

        let mut one = vec![42];
        crumsort(&mut one).unwrap();
        assert_eq!(one, vec![42]);
    }

    #[test]
    fn large_random_matches_ord() {
        let mut v: Vec<i64> = (0..20_000)
            .map(|i| (i * 2654435761u64) as i64 % 9973)
            .collect();
        let mut expected = v.clone();
        expected.sort();
        crumsort(&mut v).unwrap();
        assert_eq!(v, expected);
    }

    #[test]
    fn large_reverse_sorted() {
        let mut v: Vec<i64> = (0..20_000).rev().collect();
        crumsort(&mut v).unwrap();
        assert_eq!(v, (0..20_000).collect::<Vec<_>>());
    }

    #[test]
    fn mostly_ordered_with_tail_disorder() {
        let mut v: Vec<i32> = (0..5000).collect();
        v[4900..].reverse();
        let mut expected = v.clone();
        expected.sort();
        crumsort(&mut v).unwrap();
        assert_eq!(v, expected);
    }

    #[test]
    fn heavy_duplicates() {
        let mut v: Vec<u8> = (0..10_000).map(|i| (i % 5) as u8).collect();
        let mut expected = v.clone();
        expected.sort();
        crumsort(&mut v).unwrap();
        assert_eq!(v, expected);
    }

    #[test]
    fn lopsided_duplicate_partition() {
        // `heavy_duplicates` above is duplicate-heavy enough that
        // crum_median_of_cbrt's `generic` bailout usually fires, sending
        // the range straight to quadsort without ever reaching
        // fulcrum_default_partition/fulcrum_reverse_partition. A thin
        // scatter of distinct values against one majority value instead
        // keeps pivot samples non-generic while still forcing the
        // small-side/large-side imbalance that routes into
        // fulcrum_reverse_partition, at a size past the 2048-element
        // median-of-cbrt cutoff.
        use rand::seq::SliceRandom;
        use rand::{rngs::StdRng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(7);
        let mut v: Vec<i32> = (0..6000).map(|i| if i % 10 == 0 { i / 10 } else { 0 }).collect();
        v.shuffle(&mut rng);

        let mut expected = v.clone();
        expected.sort();
        crumsort(&mut v).unwrap();
        assert_eq!(v, expected);
    }

    #[test]
    fn zero_scratch_limit_is_rejected() {
        let mut v = vec![3, 1, 2];
        let err = crumsort_by_with_scratch_limit(&mut v, |a, b| a < b, 0).unwrap_err();
        assert!(matches!(err, SortError::InvalidScratchLimit));
        assert_eq!(v, vec![3, 1, 2]);
    }

    #[test]
    fn tiny_scratch_limit_still_sorts() {
        let mut v: Vec<i32> = (0..5000).map(|i| (i * 7919) % 1000).collect();
        let mut expected = v.clone();
        expected.sort();
        crumsort_by_with_scratch_limit(&mut v, |a, b| a < b, 1).unwrap();
        assert_eq!(v, expected);
    }

    #[test]
    fn idempotent() {
        let mut v: Vec<i32> = (0..4000).map(|i| (i * 37) % 701).collect();
        crumsort(&mut v).unwrap();
        let once = v.clone();
        crumsort(&mut v).unwrap();
        assert_eq!(v, once);
    }
}
