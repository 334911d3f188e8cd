use std::collections::TryReserveError;
use std::fmt;

/// Failure modes exposed across the public `sort`/`crumsort` surface.
///
/// This is a closed set (see the crate-level docs): a strict-weak-ordering
/// violation in the caller's comparator is *not* a member — that outcome is
/// an unsorted-but-valid-multiset array, not a reported error.
#[derive(Debug)]
pub enum SortError {
    /// The scratch buffer could not be allocated. `v` is left completely
    /// untouched — no element has moved.
    ScratchAllocation(TryReserveError),
    /// `crumsort_by_with_scratch_limit` was called with `max_swap_size == 0`.
    /// `v` is left completely untouched.
    InvalidScratchLimit,
}

impl fmt::Display for SortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortError::ScratchAllocation(err) => {
                write!(f, "failed to allocate sort scratch buffer: {err}")
            }
            SortError::InvalidScratchLimit => {
                write!(f, "max_swap_size must be greater than zero")
            }
        }
    }
}

impl std::error::Error for SortError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SortError::ScratchAllocation(err) => Some(err),
            SortError::InvalidScratchLimit => None,
        }
    }
}

impl From<TryReserveError> for SortError {
    fn from(err: TryReserveError) -> Self {
        SortError::ScratchAllocation(err)
    }
}
