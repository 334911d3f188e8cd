//! Branchless four-way merge sort (`quadsort`) and its unstable
//! partitioning sibling (`crumsort`), for any `&mut [T]` given a strict
//! weak ordering.
//!
//! - [`sort`]/[`sort_by`] — stable, `O(n log n)` worst case, the default
//!   choice when element moves are expensive or ties must keep their
//!   input order.
//! - [`crumsort`]/[`crumsort_by`]/[`crumsort_by_with_scratch_limit`] —
//!   unstable, typically faster on large random or adversarial inputs;
//!   falls back to quadsort itself below 256 elements and for whatever
//!   part of the array it finds already close to sorted.
//!
//! Both sorts require only `is_less: FnMut(&T, &T) -> bool` — no `Ord`
//! bound is forced on the `_by` entry points, and neither sort requires
//! `Default`, `Clone`, or `Copy`. Internally every element is moved
//! exactly once between a source slot and a destination slot; nothing is
//! fabricated or dropped in place.
//!
//! Both families share the same building blocks: tiny sorting networks
//! and a parity-merge recombine for runs under 32 elements
//! ([`tiny`]/[`parity_merge`]), a cache-friendly bulk-copy merge
//! ([`cross_merge`]), the 32-element quad-swap pass that seeds quadsort's
//! merge ladder and opportunistically detects already-ordered or
//! -reversed runs ([`quad_swap`]), the power-of-four merge ladder itself
//! ([`quad_merge`]) with its unequal-run partial merges
//! ([`partial_merge`]), and in-place rotation for when a merge doesn't
//! fit scratch ([`rotate`]).
//!
//! # Errors
//!
//! Every entry point returns [`SortError`] rather than panicking or
//! aborting. Scratch-buffer allocation is fallible
//! ([`SortError::ScratchAllocation`]) and checked *before* any element of
//! the input is touched — on that path the input is left exactly as
//! given. `crumsort_by_with_scratch_limit` additionally rejects a
//! `max_swap_size` of zero ([`SortError::InvalidScratchLimit`]).
//!
//! A comparator that does not implement a strict weak ordering is not
//! detected: the result is an unsorted but still-valid permutation of the
//! input, never a panic, out-of-bounds access, or leaked/duplicated
//! element.

mod cross_merge;
mod error;
mod parity_merge;
mod partial_merge;
mod quad_merge;
mod quad_swap;
mod rotate;
mod scratch;
mod tiny;

pub mod crumsort;
pub mod quadsort;

pub use crumsort::{crumsort, crumsort_by, crumsort_by_with_scratch_limit};
pub use error::SortError;
pub use quadsort::{sort, sort_by};
