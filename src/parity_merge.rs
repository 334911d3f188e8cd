//! Component C — the branchless parity-merge primitive, plus the small
//! head/tail merge steps it (and cross-merge, and the partial merges) are
//! built from.
//!
//! The head/tail steps below write *both* candidates to adjacent
//! destination slots, but only the side that was actually consumed gets
//! its source cursor advanced, so the "wrong" write is transparently
//! overwritten by the next step. That lets the compiler emit a
//! conditional move instead of a branch.
//!
//! # Safety contract shared by every `unsafe fn` in this module
//!
//! None of these routines are panic-safe: they assume `is_less` never
//! unwinds. The algorithms in this crate never leave a duplicated or
//! destroyed `T` behind as long as that assumption holds, matching the
//! guarantees of the original C++ source, which offers the same assumption
//! (see crate root docs / DESIGN.md).

use core::ptr;

/// `lhs <= rhs` under the caller's strict weak order, derived with a
/// single comparator call (valid because `is_less` is antisymmetric).
#[inline(always)]
pub(crate) fn not_greater<T, F>(is_less: &mut F, lhs: &T, rhs: &T) -> bool
where
    F: FnMut(&T, &T) -> bool,
{
    !is_less(rhs, lhs)
}

/// `lhs > rhs` under the caller's strict weak order.
#[inline(always)]
pub(crate) fn greater<T, F>(is_less: &mut F, lhs: &T, rhs: &T) -> bool
where
    F: FnMut(&T, &T) -> bool,
{
    is_less(rhs, lhs)
}

/// Branchless forward merge step: consumes exactly one element from
/// `*left` or `*right` (whichever is smaller, preferring `left` on a tie
/// for stability) and writes it to `*dest`, advancing `dest` by one.
///
/// # Safety
/// `*left` and `*right` must be valid for reads, `*dest` valid for one
/// write, and `dest` must not alias either source.
#[inline(always)]
pub(crate) unsafe fn head_branchless_merge<T, F>(
    dest: &mut *mut T,
    left: &mut *const T,
    right: &mut *const T,
    is_less: &mut F,
) where
    F: FnMut(&T, &T) -> bool,
{
    unsafe {
        let take_left = not_greater(is_less, &**left, &**right) as usize;
        let take_right = 1 - take_left;
        ptr::copy_nonoverlapping(*right, dest.add(take_left), 1);
        ptr::copy_nonoverlapping(*left, dest.add(take_right), 1);
        *left = left.add(take_left);
        *right = right.add(take_right);
        *dest = dest.add(1);
    }
}

/// Branchless backward merge step: the mirror image of
/// [`head_branchless_merge`], consuming from the *tail* of each run and
/// writing backwards from `*dest`, preferring `right` on a tie so the
/// merge as a whole stays stable.
///
/// # Safety
/// Same as [`head_branchless_merge`], with all pointers valid one element
/// *before* `left`/`right`/`dest` as well (they are decremented first).
#[inline(always)]
pub(crate) unsafe fn tail_branchless_merge<T, F>(
    dest: &mut *mut T,
    left: &mut *const T,
    right: &mut *const T,
    is_less: &mut F,
) where
    F: FnMut(&T, &T) -> bool,
{
    unsafe {
        // x = 1 when `left <= right`, i.e. `right` is the (weakly) larger
        // side and is the one the backward merge must consume here.
        let x = not_greater(is_less, &**left, &**right) as usize;
        let y = 1 - x;
        *dest = dest.sub(1);
        ptr::copy_nonoverlapping(*right, dest.add(x), 1);
        ptr::copy_nonoverlapping(*left, dest.add(y), 1);
        *right = right.sub(x);
        *left = left.sub(y);
    }
}

/// Single scalar forward merge step (branch allowed): used only for the
/// odd leftover element when `left != right` in [`parity_merge`].
#[inline(always)]
unsafe fn copy_forward_min<T, F>(
    dest: &mut *mut T,
    left: &mut *const T,
    right: &mut *const T,
    is_less: &mut F,
) where
    F: FnMut(&T, &T) -> bool,
{
    unsafe {
        if not_greater(is_less, &**left, &**right) {
            ptr::copy_nonoverlapping(*left, *dest, 1);
            *left = left.add(1);
        } else {
            ptr::copy_nonoverlapping(*right, *dest, 1);
            *right = right.add(1);
        }
        *dest = dest.add(1);
    }
}

/// Writes the greater of `*left`/`*right` to `*dest`, without advancing
/// either cursor — used for the final element of [`parity_merge`].
#[inline(always)]
unsafe fn copy_backward_max<T, F>(
    dest: *mut T,
    left: *const T,
    right: *const T,
    is_less: &mut F,
) where
    F: FnMut(&T, &T) -> bool,
{
    unsafe {
        let src = if greater(is_less, &*left, &*right) {
            left
        } else {
            right
        };
        ptr::copy_nonoverlapping(src, dest, 1);
    }
}

/// Stable merge of two adjacent runs at `src[0..left)` and
/// `src[left..left+right)` into `dest[0..left+right)`, where
/// `left <= right <= left + 1`.
///
/// Symmetric head+tail merge: two cursors walk in from the heads, two
/// from the tails, and each inner step performs one branchless
/// compare-and-select.
///
/// # Safety
/// `src[0..left+right)` must be valid for reads, `dest[0..left+right)`
/// valid for writes, and the two ranges must not overlap. `1 <= left`,
/// `left <= right`, `right <= left + 1`.
pub(crate) unsafe fn parity_merge<T, F>(
    dest: *mut T,
    src: *const T,
    left: usize,
    right: usize,
    is_less: &mut F,
) where
    F: FnMut(&T, &T) -> bool,
{
    debug_assert!(left >= 1 && left <= right && right <= left + 1);

    unsafe {
        let mut ptl: *const T = src;
        let mut ptr: *const T = src.add(left);
        let mut ptd: *mut T = dest;

        let mut tpl: *const T = ptr.sub(1);
        let mut tpr: *const T = tpl.add(right);
        let mut tpd: *mut T = dest.add(left + right - 1);

        if left < right {
            copy_forward_min(&mut ptd, &mut ptl, &mut ptr, is_less);
        }
        copy_forward_min(&mut ptd, &mut ptl, &mut ptr, is_less);

        let mut remaining = left;
        while remaining > 1 {
            head_branchless_merge(&mut ptd, &mut ptl, &mut ptr, is_less);
            tail_branchless_merge(&mut tpd, &mut tpl, &mut tpr, is_less);
            remaining -= 1;
        }

        copy_backward_max(tpd, tpl, tpr, is_less);
    }
}

/// Merges two runs of exactly two elements each (`src[0..2]`, `src[2..4]`)
/// into `dest[0..4]` with the minimum possible number of branchless steps.
///
/// # Safety
/// Same as [`parity_merge`] with `left = right = 2`.
pub(crate) unsafe fn parity_merge_two<T, F>(dest: *mut T, src: *const T, is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    unsafe {
        let mut ptl: *const T = src;
        let mut ptr: *const T = src.add(2);
        let mut ptd: *mut T = dest;
        head_branchless_merge(&mut ptd, &mut ptl, &mut ptr, is_less);
        copy_forward_min(&mut ptd, &mut ptl, &mut ptr, is_less);

        let mut tpl: *const T = src.add(1);
        let mut tpr: *const T = src.add(3);
        let mut tpd: *mut T = dest.add(3);
        tail_branchless_merge(&mut tpd, &mut tpl, &mut tpr, is_less);
        copy_backward_max(tpd, tpl, tpr, is_less);
    }
}

/// Merges two runs of exactly four elements each (`src[0..4]`, `src[4..8]`)
/// into `dest[0..8]`.
///
/// # Safety
/// Same as [`parity_merge`] with `left = right = 4`.
pub(crate) unsafe fn parity_merge_four<T, F>(dest: *mut T, src: *const T, is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    unsafe {
        let mut ptl: *const T = src;
        let mut ptr: *const T = src.add(4);
        let mut ptd: *mut T = dest;
        head_branchless_merge(&mut ptd, &mut ptl, &mut ptr, is_less);
        head_branchless_merge(&mut ptd, &mut ptl, &mut ptr, is_less);
        head_branchless_merge(&mut ptd, &mut ptl, &mut ptr, is_less);
        copy_forward_min(&mut ptd, &mut ptl, &mut ptr, is_less);

        let mut tpl: *const T = src.add(3);
        let mut tpr: *const T = src.add(7);
        let mut tpd: *mut T = dest.add(7);
        tail_branchless_merge(&mut tpd, &mut tpl, &mut tpr, is_less);
        tail_branchless_merge(&mut tpd, &mut tpl, &mut tpr, is_less);
        tail_branchless_merge(&mut tpd, &mut tpl, &mut tpr, is_less);
        copy_backward_max(tpd, tpl, tpr, is_less);
    }
}
