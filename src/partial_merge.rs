//! Component G — merges used once a block has grown past the point where
//! [`crate::cross_merge::cross_merge`]'s own scratch requirement
//! (`left + right` worth of space) is worth avoiding: these two only copy
//! the *smaller* side into `scratch`, merging the rest back in place
//! element by element (or in bulk when one side is running far enough
//! ahead to skip comparisons for a stretch).

use core::ptr;

use crate::cross_merge::cross_merge;
use crate::parity_merge::{greater, head_branchless_merge, not_greater, tail_branchless_merge};
use crate::scratch::Scratch;

enum ForwardProbe {
    FromRight,
    FromLeft,
}

/// Merges `array[0..block)` against `array[block..nmemb)` in place,
/// copying the *left* block out to `scratch` first and writing the
/// result back into `array` from the front.
///
/// # Safety
/// `array[0..nmemb)` must be valid for reads and writes, both sub-runs
/// individually sorted, `scratch` must have room for at least `block`
/// elements, and `block <= nmemb`.
pub(crate) unsafe fn partial_forward_merge<T, F>(
    array: *mut T,
    scratch: &mut Scratch<T>,
    nmemb: usize,
    block: usize,
    is_less: &mut F,
) where
    F: FnMut(&T, &T) -> bool,
{
    if nmemb == block {
        return;
    }

    unsafe {
        let mut ptr_: *const T = array.add(block);
        let tpr: *const T = array.add(nmemb - 1);

        if not_greater(is_less, &*ptr_.sub(1), &*ptr_) {
            return;
        }

        let swap = scratch.as_mut_ptr();
        ptr::copy_nonoverlapping(array, swap, block);

        let mut ptl: *const T = swap;
        let tpl: *const T = swap.add(block - 1);
        let mut out: *mut T = array;

        'outer: while ptl < tpl.sub(1) && ptr_ < tpr.sub(1) {
            let mut probe = ForwardProbe::FromRight;
            loop {
                match probe {
                    ForwardProbe::FromRight => {
                        if greater(is_less, &*ptl, &*ptr_.add(1)) {
                            ptr::copy(ptr_, out, 2);
                            out = out.add(2);
                            ptr_ = ptr_.add(2);
                            if ptr_ < tpr.sub(1) {
                                continue;
                            }
                            break 'outer;
                        }
                        if not_greater(is_less, &*ptl.add(1), &*ptr_) {
                            ptr::copy_nonoverlapping(ptl, out, 2);
                            out = out.add(2);
                            ptl = ptl.add(2);
                            if ptl < tpl.sub(1) {
                                probe = ForwardProbe::FromLeft;
                                continue;
                            }
                            break 'outer;
                        }
                        break;
                    }
                    ForwardProbe::FromLeft => {
                        if not_greater(is_less, &*ptl.add(1), &*ptr_) {
                            ptr::copy_nonoverlapping(ptl, out, 2);
                            out = out.add(2);
                            ptl = ptl.add(2);
                            if ptl < tpl.sub(1) {
                                continue;
                            }
                            break 'outer;
                        }
                        if greater(is_less, &*ptl, &*ptr_.add(1)) {
                            ptr::copy(ptr_, out, 2);
                            out = out.add(2);
                            ptr_ = ptr_.add(2);
                            if ptr_ < tpr.sub(1) {
                                probe = ForwardProbe::FromRight;
                                continue;
                            }
                            break 'outer;
                        }
                        break;
                    }
                }
            }

            let x = not_greater(is_less, &*ptl, &*ptr_) as usize;
            ptr::copy(ptr_, out.add(x), 1);
            ptr_ = ptr_.add(1);
            ptr::copy_nonoverlapping(ptl, out.add(1 - x), 1);
            ptl = ptl.add(1);
            out = out.add(2);
            head_branchless_merge(&mut out, &mut ptl, &mut ptr_, is_less);
        }

        while ptl <= tpl && ptr_ <= tpr {
            if not_greater(is_less, &*ptl, &*ptr_) {
                ptr::copy_nonoverlapping(ptl, out, 1);
                ptl = ptl.add(1);
            } else {
                ptr::copy(ptr_, out, 1);
                ptr_ = ptr_.add(1);
            }
            out = out.add(1);
        }
        while ptl <= tpl {
            ptr::copy_nonoverlapping(ptl, out, 1);
            ptl = ptl.add(1);
            out = out.add(1);
        }
    }
}

enum BackwardProbe {
    FromRight,
    FromLeft,
}

/// Merges `array[0..block)` against `array[block..nmemb)` in place,
/// copying the *right* side out to `scratch` and writing the result back
/// into `array` from the back.
///
/// Falls back to [`cross_merge`] plus a bulk copy-back when the right
/// side is large and fits entirely in `scratch` — cheaper than the
/// in-place dance below once the right side is wide enough.
///
/// # Safety
/// `array[0..nmemb)` must be valid for reads and writes, both sub-runs
/// individually sorted, `scratch` must have room for at least
/// `nmemb - block` elements (and for `nmemb` elements on the
/// `cross_merge` fast path), and `block <= nmemb`.
pub(crate) unsafe fn partial_backward_merge<T, F>(
    array: *mut T,
    scratch: &mut Scratch<T>,
    nmemb: usize,
    block: usize,
    is_less: &mut F,
) where
    F: FnMut(&T, &T) -> bool,
{
    if nmemb == block {
        return;
    }

    unsafe {
        let mut tpl: *mut T = array.add(block - 1);
        let tpa_start: *mut T = array.add(nmemb - 1);

        if not_greater(is_less, &*tpl, &*tpl.add(1)) {
            return;
        }

        let right = nmemb - block;

        if nmemb <= scratch.len() && right >= 64 {
            let swap = scratch.as_mut_ptr();
            cross_merge(swap, array, block, right, is_less);
            ptr::copy_nonoverlapping(swap, array, nmemb);
            return;
        }

        let swap = scratch.as_mut_ptr();
        ptr::copy_nonoverlapping(array.add(block), swap, right);

        let mut tpr: *const T = swap.add(right - 1);
        let mut tpa: *mut T = tpa_start;

        'bulk16: while tpl > array.add(16) && tpr > swap.add(16) {
            loop {
                if not_greater(is_less, &*tpl, &*tpr.sub(15)) {
                    tpa = tpa.sub(15);
                    tpr = tpr.sub(15);
                    ptr::copy_nonoverlapping(tpr, tpa, 16);
                    tpa = tpa.sub(1);
                    tpr = tpr.sub(1);
                    if tpr > swap.add(16) {
                        continue;
                    }
                    break 'bulk16;
                }
                break;
            }
            loop {
                if greater(is_less, &*tpl.sub(15), &*tpr) {
                    tpa = tpa.sub(15);
                    tpl = tpl.sub(15);
                    ptr::copy(tpl, tpa, 16);
                    tpa = tpa.sub(1);
                    tpl = tpl.sub(1);
                    if tpl > array.add(16) {
                        continue;
                    }
                    break 'bulk16;
                }
                break;
            }

            for _ in 0..8 {
                if not_greater(is_less, &*tpl, &*tpr.sub(1)) {
                    ptr::copy_nonoverlapping(tpr.sub(1), tpa.sub(1), 2);
                    tpa = tpa.sub(2);
                    tpr = tpr.sub(2);
                } else if greater(is_less, &*tpl.sub(1), &*tpr) {
                    ptr::copy(tpl.sub(1), tpa.sub(1), 2);
                    tpa = tpa.sub(2);
                    tpl = tpl.sub(2);
                } else {
                    let x = not_greater(is_less, &*tpl, &*tpr) as usize;
                    tpa = tpa.sub(1);
                    ptr::copy_nonoverlapping(tpr, tpa.add(x), 1);
                    tpr = tpr.sub(1);
                    ptr::copy(tpl, tpa.add(1 - x), 1);
                    tpl = tpl.sub(1);
                    tpa = tpa.sub(1);
                    let mut tpl_const = tpl as *const T;
                    tail_branchless_merge(&mut tpa, &mut tpl_const, &mut tpr, is_less);
                    tpl = tpl_const as *mut T;
                }
            }
        }

        'outer: while tpr > swap.add(1) && tpl > array.add(1) {
            let mut probe = BackwardProbe::FromRight;
            loop {
                match probe {
                    BackwardProbe::FromRight => {
                        if not_greater(is_less, &*tpl, &*tpr.sub(1)) {
                            ptr::copy_nonoverlapping(tpr.sub(1), tpa.sub(1), 2);
                            tpa = tpa.sub(2);
                            tpr = tpr.sub(2);
                            if tpr > swap.add(1) {
                                continue;
                            }
                            break 'outer;
                        }
                        if greater(is_less, &*tpl.sub(1), &*tpr) {
                            ptr::copy(tpl.sub(1), tpa.sub(1), 2);
                            tpa = tpa.sub(2);
                            tpl = tpl.sub(2);
                            if tpl > array.add(1) {
                                probe = BackwardProbe::FromLeft;
                                continue;
                            }
                            break 'outer;
                        }
                        break;
                    }
                    BackwardProbe::FromLeft => {
                        if greater(is_less, &*tpl.sub(1), &*tpr) {
                            ptr::copy(tpl.sub(1), tpa.sub(1), 2);
                            tpa = tpa.sub(2);
                            tpl = tpl.sub(2);
                            if tpl > array.add(1) {
                                continue;
                            }
                            break 'outer;
                        }
                        if not_greater(is_less, &*tpl, &*tpr.sub(1)) {
                            ptr::copy_nonoverlapping(tpr.sub(1), tpa.sub(1), 2);
                            tpa = tpa.sub(2);
                            tpr = tpr.sub(2);
                            if tpr > swap.add(1) {
                                probe = BackwardProbe::FromRight;
                                continue;
                            }
                            break 'outer;
                        }
                        break;
                    }
                }
            }

            let x = not_greater(is_less, &*tpl, &*tpr) as usize;
            tpa = tpa.sub(1);
            ptr::copy_nonoverlapping(tpr, tpa.add(x), 1);
            tpr = tpr.sub(1);
            ptr::copy(tpl, tpa.add(1 - x), 1);
            tpl = tpl.sub(1);
            tpa = tpa.sub(1);
            let mut tpl_const = tpl as *const T;
            tail_branchless_merge(&mut tpa, &mut tpl_const, &mut tpr, is_less);
            tpl = tpl_const as *mut T;
        }

        while tpr >= swap && tpl >= array {
            if greater(is_less, &*tpl, &*tpr) {
                ptr::copy(tpl, tpa, 1);
                tpl = tpl.sub(1);
            } else {
                ptr::copy_nonoverlapping(tpr, tpa, 1);
                tpr = tpr.sub(1);
            }
            tpa = tpa.sub(1);
        }
        while tpr >= swap {
            ptr::copy_nonoverlapping(tpr, tpa, 1);
            tpr = tpr.sub(1);
            tpa = tpa.sub(1);
        }
    }
}

/// Repeatedly widens the merged-block size (`block`, `2*block`, ...),
/// calling [`partial_backward_merge`] across the array until the next
/// doubling would exceed either `nmemb` or the scratch buffer.
///
/// # Safety
/// `array[0..nmemb)` must be valid for reads and writes, and `scratch`
/// must have room for at least `block` elements at every doubling this
/// call reaches.
pub(crate) unsafe fn tail_merge<T, F>(
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
        let mut block = block;

        while block < nmemb && block <= scratch.len() {
            let mut pta = array;
            while pta.add(block) < pte {
                if pta.add(block * 2) < pte {
                    partial_backward_merge(pta, scratch, block * 2, block, is_less);
                    pta = pta.add(block * 2);
                    continue;
                }
                partial_backward_merge(pta, scratch, pte.offset_from(pta) as usize, block, is_less);
                break;
            }
            block *= 2;
        }
    }
}
