//! Component H — in-place rotation and the rotate-merge driver used once a
//! run pair is too large (or scratch too small) for [`crate::cross_merge`]
//! or the partial merges to handle directly.
//!
//! [`trinity_rotation`] exchanges two adjacent, possibly-unequal halves of
//! an array in place, picking among three strategies by priority: copy the
//! smaller side out to scratch, bridge-rotate through the *difference* of
//! the two sides when that fits scratch instead, or fall back to a
//! three-cursor juggle that uses no auxiliary space at all.
//!
//! [`rotate_merge_block`]/[`rotate_merge`] are the doubling merge driver
//! for runs scratch can't hold wholesale, mirroring
//! [`crate::partial_merge::tail_merge`]'s shape but for unequal-sized runs,
//! locating the split point with a monotone-bound binary search
//! ([`monobound_binary_first`]) before rotating.

use core::ptr;

use crate::cross_merge::cross_merge;
use crate::parity_merge::not_greater;
use crate::partial_merge::{partial_backward_merge, partial_forward_merge};
use crate::scratch::Scratch;

/// Rotate-merge never works on more than this many elements at a time
/// regardless of how much scratch the caller's sort call has, bounding the
/// `memmove`-shaped copies below to a fixed worst case.
pub(crate) const ROTATE_SWAP_CAP: usize = 65_536;

/// Exchanges `array[0..left)` with `array[left..nmemb)` in place.
///
/// # Safety
/// `array[0..nmemb)` must be valid for reads and writes, and `left <=
/// nmemb`.
pub(crate) unsafe fn trinity_rotation<T>(array: *mut T, scratch: &mut Scratch<T>, nmemb: usize, left: usize) {
    unsafe {
        let right = nmemb - left;
        let swap_size = scratch.len().min(ROTATE_SWAP_CAP);

        if left < right {
            if left <= swap_size {
                let swap = scratch.as_mut_ptr();
                ptr::copy_nonoverlapping(array, swap, left);
                ptr::copy(array.add(left), array, right);
                ptr::copy_nonoverlapping(swap, array.add(right), left);
                return;
            }

            let mut pta = array;
            let mut ptb = array.add(left);
            let bridge = right - left;

            if bridge <= swap_size && bridge > 3 {
                let mut ptc = array.add(right);
                let mut ptd = ptc.add(left);
                let swap = scratch.as_mut_ptr();
                ptr::copy_nonoverlapping(ptb, swap, bridge);

                let mut n = left;
                while n > 0 {
                    n -= 1;
                    ptc = ptc.sub(1);
                    ptd = ptd.sub(1);
                    ptr::write(ptc, ptr::read(ptd));
                    ptb = ptb.sub(1);
                    ptr::write(ptd, ptr::read(ptb));
                }
                ptr::copy_nonoverlapping(swap, pta, bridge);
            } else {
                let mut ptc = ptb;
                let mut ptd = ptc.add(right);

                let mut n = left / 2;
                while n > 0 {
                    n -= 1;
                    ptb = ptb.sub(1);
                    let temp = ptr::read(ptb);
                    ptr::write(ptb, ptr::read(pta));
                    ptr::write(pta, ptr::read(ptc));
                    pta = pta.add(1);
                    ptd = ptd.sub(1);
                    ptr::write(ptc, ptr::read(ptd));
                    ptc = ptc.add(1);
                    ptr::write(ptd, temp);
                }

                let mut n = ptd.offset_from(ptc) as usize / 2;
                while n > 0 {
                    n -= 1;
                    let temp = ptr::read(ptc);
                    ptd = ptd.sub(1);
                    ptr::write(ptc, ptr::read(ptd));
                    ptc = ptc.add(1);
                    ptr::write(ptd, ptr::read(pta));
                    ptr::write(pta, temp);
                    pta = pta.add(1);
                }

                let mut n = ptd.offset_from(pta) as usize / 2;
                while n > 0 {
                    n -= 1;
                    let temp = ptr::read(pta);
                    ptd = ptd.sub(1);
                    ptr::write(pta, ptr::read(ptd));
                    pta = pta.add(1);
                    ptr::write(ptd, temp);
                }
            }
        } else if right < left {
            if right <= swap_size {
                let swap = scratch.as_mut_ptr();
                ptr::copy_nonoverlapping(array.add(left), swap, right);
                ptr::copy(array, array.add(right), left);
                ptr::copy_nonoverlapping(swap, array, right);
                return;
            }

            let mut pta = array;
            let mut ptb = array.add(left);
            let bridge = left - right;

            if bridge <= swap_size && bridge > 3 {
                let ptc_start = array.add(right);
                let ptd = ptc_start.add(left);
                let mut ptc = ptc_start;
                let swap = scratch.as_mut_ptr();
                ptr::copy_nonoverlapping(ptc, swap, bridge);

                let mut n = right;
                while n > 0 {
                    n -= 1;
                    ptr::write(ptc, ptr::read(pta));
                    ptc = ptc.add(1);
                    ptr::write(pta, ptr::read(ptb));
                    pta = pta.add(1);
                    ptb = ptb.add(1);
                }
                ptr::copy_nonoverlapping(swap, ptd.sub(bridge), bridge);
            } else {
                let mut ptc = ptb;
                let mut ptd = ptc.add(right);

                let mut n = right / 2;
                while n > 0 {
                    n -= 1;
                    ptb = ptb.sub(1);
                    let temp = ptr::read(ptb);
                    ptr::write(ptb, ptr::read(pta));
                    ptr::write(pta, ptr::read(ptc));
                    pta = pta.add(1);
                    ptd = ptd.sub(1);
                    ptr::write(ptc, ptr::read(ptd));
                    ptc = ptc.add(1);
                    ptr::write(ptd, temp);
                }

                let mut n = ptb.offset_from(pta) as usize / 2;
                while n > 0 {
                    n -= 1;
                    ptb = ptb.sub(1);
                    let temp = ptr::read(ptb);
                    ptr::write(ptb, ptr::read(pta));
                    ptd = ptd.sub(1);
                    ptr::write(pta, ptr::read(ptd));
                    pta = pta.add(1);
                    ptr::write(ptd, temp);
                }

                let mut n = ptd.offset_from(pta) as usize / 2;
                while n > 0 {
                    n -= 1;
                    let temp = ptr::read(pta);
                    ptd = ptd.sub(1);
                    ptr::write(pta, ptr::read(ptd));
                    pta = pta.add(1);
                    ptr::write(ptd, temp);
                }
            }
        } else {
            let mut pta = array;
            let mut ptb = array.add(left);
            let mut n = left;
            while n > 0 {
                n -= 1;
                let temp = ptr::read(pta);
                ptr::write(pta, ptr::read(ptb));
                pta = pta.add(1);
                ptr::write(ptb, temp);
                ptb = ptb.add(1);
            }
        }
    }
}

/// Finds the index in `array[0..top)` before which `*value` belongs,
/// assuming `array[0..top)` is sorted — a binary search biased to match
/// the stability tie-break the merges above use (`<=` rather than `<`).
///
/// # Safety
/// `array[0..top)` and `*value` must be valid for reads, `top >= 1`.
unsafe fn monobound_binary_first<T, F>(array: *const T, value: *const T, top: usize, is_less: &mut F) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    unsafe {
        let mut top = top;
        let mut end = array.add(top);

        while top > 1 {
            let mid = top / 2;
            if not_greater(is_less, &*value, &*end.sub(mid)) {
                end = end.sub(mid);
            }
            top -= mid;
        }
        if not_greater(is_less, &*value, &*end.sub(1)) {
            end = end.sub(1);
        }
        end.offset_from(array) as usize
    }
}

/// Merges the sorted `array[0..lblock)` against the sorted
/// `array[lblock..lblock+right)`, splitting the left block in two,
/// locating where the right run crosses the midpoint with a binary
/// search, rotating the crossing elements into place, and recursing (or
/// delegating to a partial merge) on each side of the split.
///
/// # Safety
/// `array[0..lblock+right)` must be valid for reads and writes, both
/// sub-runs individually sorted.
pub(crate) unsafe fn rotate_merge_block<T, F>(
    array: *mut T,
    scratch: &mut Scratch<T>,
    lblock: usize,
    right: usize,
    is_less: &mut F,
) where
    F: FnMut(&T, &T) -> bool,
{
    unsafe {
        if not_greater(is_less, &*array.add(lblock - 1), &*array.add(lblock)) {
            return;
        }

        let rblock = lblock / 2;
        let lblock = lblock - rblock;

        let left = monobound_binary_first(array.add(lblock + rblock), array.add(lblock), right, is_less);
        let right = right - left;

        // layout: [ lblock ][ rblock ][ left ][ right ]

        if left != 0 {
            if lblock + left <= scratch.len() {
                let swap = scratch.as_mut_ptr();
                ptr::copy_nonoverlapping(array, swap, lblock);
                ptr::copy_nonoverlapping(array.add(lblock + rblock), swap.add(lblock), left);
                ptr::copy(array.add(lblock), array.add(lblock + left), rblock);
                cross_merge(array, swap, lblock, left, is_less);
            } else {
                trinity_rotation(array.add(lblock), scratch, rblock + left, rblock);

                let unbalanced = left * 2 < lblock || lblock * 2 < left;

                if unbalanced && left <= scratch.len() {
                    partial_backward_merge(array, scratch, lblock + left, lblock, is_less);
                } else if unbalanced && lblock <= scratch.len() {
                    partial_forward_merge(array, scratch, lblock + left, lblock, is_less);
                } else {
                    rotate_merge_block(array, scratch, lblock, left, is_less);
                }
            }
        }

        if right != 0 {
            let unbalanced = right * 2 < rblock || rblock * 2 < right;

            if (unbalanced && right <= scratch.len()) || right + rblock <= scratch.len() {
                partial_backward_merge(array.add(lblock + left), scratch, rblock + right, rblock, is_less);
            } else if unbalanced && rblock <= scratch.len() {
                partial_forward_merge(array.add(lblock + left), scratch, rblock + right, rblock, is_less);
            } else {
                rotate_merge_block(array.add(lblock + left), scratch, rblock, right, is_less);
            }
        }
    }
}

/// Doubling merge driver for unequal-sized runs: merges adjacent
/// `block`-sized spans with [`rotate_merge_block`], then doubles `block`
/// and repeats until it reaches `nmemb`.
///
/// # Safety
/// `array[0..nmemb)` must be valid for reads and writes.
pub(crate) unsafe fn rotate_merge<T, F>(
    array: *mut T,
    scratch: &mut Scratch<T>,
    nmemb: usize,
    block: usize,
    is_less: &mut F,
) where
    F: FnMut(&T, &T) -> bool,
{
    unsafe {
        let pte = array.add(nmemb);

        if nmemb <= block * 2 && nmemb - block <= scratch.len() {
            partial_backward_merge(array, scratch, nmemb, block, is_less);
            return;
        }

        let mut block = block;
        while block < nmemb {
            let mut pta = array;
            while pta.add(block) < pte {
                if pta.add(block * 2) < pte {
                    rotate_merge_block(pta, scratch, block, block, is_less);
                    pta = pta.add(block * 2);
                    continue;
                }
                rotate_merge_block(pta, scratch, block, pte.offset_from(pta) as usize - block, is_less);
                break;
            }
            block *= 2;
        }
    }
}
