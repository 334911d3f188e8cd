//! The stable, branchless four-way merge sort.
//!
//! [`sort`]/[`sort_by`] are the public entry points. Everything else in
//! this module is the glue that strings together quad-swap
//! ([`crate::quad_swap`]), the quad-merge ladder ([`crate::quad_merge`])
//! and rotate-merge ([`crate::rotate`]) into one call, and is reused
//! as-is by `crumsort` wherever it needs to fully sort a region (the
//! small-side cutoff, per-quadrant sorts, the cube-root pivot sample).

use crate::error::SortError;
use crate::quad_merge::quad_merge;
use crate::quad_swap::quad_swap;
use crate::rotate::rotate_merge;
use crate::scratch::Scratch;
use crate::tiny::tail_swap;

/// Above this many elements, quadsort's own scratch buffer is capped at
/// 4,194,304 elements and grown in powers of four from there rather than
/// scaling linearly with `n`. This is independent of, and not reconciled
/// with, crumsort's caller-chosen `max_swap_size` — see DESIGN.md for why
/// both are kept as-is.
const QUADSORT_SCRATCH_BASE: usize = 4_194_304;

/// Chooses quadsort's own scratch capacity for an `nmemb`-element sort:
/// `nmemb` itself below the base threshold, otherwise the smallest
/// `k = QUADSORT_SCRATCH_BASE * 4^i` with `k * 8 > nmemb`.
pub(crate) fn scratch_capacity(nmemb: usize) -> usize {
    if nmemb <= QUADSORT_SCRATCH_BASE {
        return nmemb;
    }
    let mut swap_size = QUADSORT_SCRATCH_BASE;
    while swap_size.saturating_mul(8) <= nmemb {
        swap_size *= 4;
    }
    swap_size
}

/// Sorts `array[0..nmemb)` in place using `scratch`, which the caller has
/// already sized appropriately for its own purposes (the full quadsort
/// scratch cap at the top level, or crumsort's much smaller
/// `max_swap_size` everywhere else). This is the routine both `quadsort`
/// itself and `crumsort`'s small-side/per-quadrant sorts delegate to.
///
/// # Safety
/// `array[0..nmemb)` must be valid for reads and writes.
pub(crate) unsafe fn quadsort_with_scratch<T, F>(
    array: *mut T,
    scratch: &mut Scratch<T>,
    nmemb: usize,
    is_less: &mut F,
) where
    F: FnMut(&T, &T) -> bool,
{
    unsafe {
        if nmemb < 32 {
            tail_swap(array, scratch, nmemb, is_less);
            return;
        }
        if quad_swap(array, scratch, nmemb, is_less) {
            return;
        }
        let block = quad_merge(array, scratch, nmemb, 32, is_less);
        rotate_merge(array, scratch, nmemb, block, is_less);
    }
}

/// Sorts `v` in place using `T`'s natural [`Ord`] as the comparator.
///
/// Stable: elements that compare equal keep their relative order.
///
/// # Errors
/// Returns [`SortError::ScratchAllocation`] if the scratch buffer this
/// sort needs cannot be allocated. On that path `v` is left completely
/// untouched.
pub fn sort<T>(v: &mut [T]) -> Result<(), SortError>
where
    T: Ord,
{
    sort_by(v, |a, b| a < b)
}

/// Sorts `v` in place using `is_less` as the strict weak ordering.
///
/// `is_less` must be side-effect-free and define a strict weak ordering
/// (irreflexive, transitive, with a transitive "incomparability"
/// relation). A comparator that violates this leaves `v` an unsorted but
/// valid permutation of its input — this sort does not detect the
/// violation.
///
/// # Errors
/// Returns [`SortError::ScratchAllocation`] if the scratch buffer this
/// sort needs cannot be allocated. On that path `v` is left completely
/// untouched.
pub fn sort_by<T, F>(v: &mut [T], mut is_less: F) -> Result<(), SortError>
where
    F: FnMut(&T, &T) -> bool,
{
    let nmemb = v.len();
    let array = v.as_mut_ptr();

    if nmemb < 32 {
        let mut scratch = Scratch::new(nmemb)?;
        unsafe { tail_swap(array, &mut scratch, nmemb, &mut is_less) };
        return Ok(());
    }

    let mut scratch = Scratch::new(scratch_capacity(nmemb).max(32))?;

    unsafe {
        if quad_swap(array, &mut scratch, nmemb, &mut is_less) {
            return Ok(());
        }
        let block = quad_merge(array, &mut scratch, nmemb, 32, &mut is_less);
        rotate_merge(array, &mut scratch, nmemb, block, &mut is_less);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_the_concrete_spec_example() {
        let mut v = vec![3, 1, 4, 1, 5, 9, 2, 6, 5, 3, 5];
        sort(&mut v).unwrap();
        assert_eq!(v, vec![1, 1, 2, 3, 3, 4, 5, 5, 5, 6, 9]);
    }

    #[test]
    fn empty_and_singleton() {
        let mut empty: Vec<i32> = vec![];
        sort(&mut empty).unwrap();
        assert!(empty.is_empty());

        let mut one = vec![42];
        sort(&mut one).unwrap();
        assert_eq!(one, vec![42]);
    }

    #[test]
    fn reverse_sorted() {
        let mut v: Vec<i64> = (0..1000).rev().collect();
        sort(&mut v).unwrap();
        assert_eq!(v, (0..1000).collect::<Vec<_>>());
    }

    #[test]
    fn sawtooth() {
        let mut v: Vec<i32> = (0..1000).map(|i| i % 200).collect();
        let mut expected = v.clone();
        expected.sort();
        sort(&mut v).unwrap();
        assert_eq!(v, expected);
    }

    #[test]
    fn stable_on_equal_keys() {
        let mut v: Vec<(u8, usize)> = (0..300)
            .map(|i| ((i * 2654435761u32 % 7) as u8, i))
            .collect();
        sort_by(&mut v, |a, b| a.0 < b.0).unwrap();
        for w in v.windows(2) {
            if w[0].0 == w[1].0 {
                assert!(w[0].1 < w[1].1, "equal keys must keep input order");
            } else {
                assert!(w[0].0 < w[1].0);
            }
        }
    }

    #[test]
    fn idempotent() {
        let mut v: Vec<i32> = (0..513).map(|i| (i * 37) % 101).collect();
        sort(&mut v).unwrap();
        let once = v.clone();
        sort(&mut v).unwrap();
        assert_eq!(v, once);
    }
}
