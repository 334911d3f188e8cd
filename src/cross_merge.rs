//! Component D — the adaptive merge quad-merge and quad-swap build on top
//! of. Falls back to [`parity_merge`] when both runs are the same length
//! and interleave tightly (the common case for the first merge pass), and
//! otherwise gallops: whenever the next 8-element chunk of one run is
//! entirely on one side of the other run's current cursor, it is bulk
//! [`ptr::copy_nonoverlapping`]'d across in one shot instead of merged
//! element by element.

use core::ptr;

use crate::parity_merge::{
    greater, head_branchless_merge, not_greater, parity_merge, tail_branchless_merge,
};

#[inline(always)]
unsafe fn gap<T>(hi: *const T, lo: *const T) -> isize {
    unsafe { hi.offset_from(lo) }
}

/// Merges the sorted runs `src[0..left)` and `src[left..left+right)` into
/// `dest[0..left+right)`.
///
/// # Safety
/// `src[0..left+right)` must be valid for reads, `dest[0..left+right)`
/// valid for writes and disjoint from `src`, both runs individually
/// sorted, and `left >= 1`, `right >= 1`.
pub(crate) unsafe fn cross_merge<T, F>(
    dest: *mut T,
    src: *const T,
    left: usize,
    right: usize,
    is_less: &mut F,
) where
    F: FnMut(&T, &T) -> bool,
{
    unsafe {
        let mut ptl: *const T = src;
        let mut ptr_: *const T = src.add(left);
        let mut tpl: *const T = ptr_.sub(1);
        let mut tpr: *const T = tpl.add(right);

        if left + 1 >= right
            && right >= left
            && left >= 32
            && greater(is_less, &*ptl.add(15), &*ptr_)
            && not_greater(is_less, &*ptl, &*ptr_.add(15))
            && greater(is_less, &*tpl, &*tpr.sub(15))
            && not_greater(is_less, &*tpl.sub(15), &*tpr)
        {
            parity_merge(dest, src, left, right, is_less);
            return;
        }

        let mut ptd: *mut T = dest;
        let mut tpd: *mut T = dest.add(left + right - 1);

        'bulk: loop {
            if gap(tpl, ptl) > 8 {
                while not_greater(is_less, &*ptl.add(7), &*ptr_) {
                    ptr::copy_nonoverlapping(ptl, ptd, 8);
                    ptd = ptd.add(8);
                    ptl = ptl.add(8);
                    if gap(tpl, ptl) <= 8 {
                        continue 'bulk;
                    }
                }
                while greater(is_less, &*tpl.sub(7), &*tpr) {
                    tpd = tpd.sub(7);
                    tpl = tpl.sub(7);
                    ptr::copy_nonoverlapping(tpl, tpd, 8);
                    tpd = tpd.sub(1);
                    tpl = tpl.sub(1);
                    if gap(tpl, ptl) <= 8 {
                        continue 'bulk;
                    }
                }
            }

            if gap(tpr, ptr_) > 8 {
                while greater(is_less, &*ptl, &*ptr_.add(7)) {
                    ptr::copy_nonoverlapping(ptr_, ptd, 8);
                    ptd = ptd.add(8);
                    ptr_ = ptr_.add(8);
                    if gap(tpr, ptr_) <= 8 {
                        continue 'bulk;
                    }
                }
                while not_greater(is_less, &*tpl, &*tpr.sub(7)) {
                    tpd = tpd.sub(7);
                    tpr = tpr.sub(7);
                    ptr::copy_nonoverlapping(tpr, tpd, 8);
                    tpd = tpd.sub(1);
                    tpr = tpr.sub(1);
                    if gap(tpr, ptr_) <= 8 {
                        continue 'bulk;
                    }
                }
            }

            if gap(tpd, ptd) < 16 {
                break;
            }

            for _ in 0..8 {
                head_branchless_merge(&mut ptd, &mut ptl, &mut ptr_, is_less);
                tail_branchless_merge(&mut tpd, &mut tpl, &mut tpr, is_less);
            }
        }

        while ptl <= tpl && ptr_ <= tpr {
            if not_greater(is_less, &*ptl, &*ptr_) {
                ptr::copy_nonoverlapping(ptl, ptd, 1);
                ptl = ptl.add(1);
            } else {
                ptr::copy_nonoverlapping(ptr_, ptd, 1);
                ptr_ = ptr_.add(1);
            }
            ptd = ptd.add(1);
        }
        while ptl <= tpl {
            ptr::copy_nonoverlapping(ptl, ptd, 1);
            ptl = ptl.add(1);
            ptd = ptd.add(1);
        }
        while ptr_ <= tpr {
            ptr::copy_nonoverlapping(ptr_, ptd, 1);
            ptr_ = ptr_.add(1);
            ptd = ptd.add(1);
        }
    }
}
