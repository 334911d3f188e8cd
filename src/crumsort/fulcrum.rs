//! Component J — the branchless, two-sided quicksort-style partition that
//! drives crumsort's recursive descent, plus the pivot-relative partition
//! kernels it's built from.

use core::ptr;

use crate::crumsort::pivot::{crum_median_of_cbrt, crum_median_of_nine};
use crate::quadsort::quadsort_with_scratch;
use crate::scratch::Scratch;

/// Cutoff below which a partition's remaining span is handed to quadsort
/// outright instead of being partitioned further.
pub(crate) const CRUM_OUT: usize = 96;

/// Branchless two-ended partition of `array[0..nmemb)` around `*piv`,
/// using a 64-element write buffer in `scratch` (copies of the first/last
/// 32 elements) so the in-place scan never overwrites an element before
/// it's been read. Every scanned element is copied to *both* the
/// low-partition head (`ptl[m]`) and the high-partition tail
/// (`ptr[m]`), keyed by the same comparison bit `val` that decides which
/// side it belongs to — the "losing" write is simply overwritten once the
/// other cursor's advance reaches that slot later. Returns `m`, the size
/// of the low (`!is_less(piv, x)`) partition.
///
/// # Safety
/// `array[0..nmemb)` must be valid for reads and writes, `scratch` must
/// have room for at least 64 elements, `*piv` must be valid for reads and
/// must not alias any element in `array[0..nmemb)` that the scan could
/// overwrite before it's done being read, and `nmemb >= 64`.
unsafe fn fulcrum_default_partition<T, F>(
    array: *mut T,
    scratch: &mut Scratch<T>,
    piv: *const T,
    nmemb: usize,
    is_less: &mut F,
) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    unsafe {
        let swap = scratch.as_mut_ptr();
        ptr::copy_nonoverlapping(array, swap, 32);
        ptr::copy_nonoverlapping(array.add(nmemb - 32), swap.add(32), 32);

        let ptl = array;
        let mut ptr_ = array.add(nmemb - 1);

        let mut pta = array.add(32);
        let mut tpa = array.add(nmemb - 33);

        let mut m = 0usize;
        let mut cnt = nmemb / 16 - 4;

        // Both gates below are re-checked every pass and, unlike a simple
        // if/else-if dispatch, both can and do fire in the same pass (the
        // two ranges `<= 48` and `>= 16` overlap) — that's what keeps the
        // front and back cursors consuming in balance instead of letting
        // one run away from the other on lopsided data.
        'drive: loop {
            if (pta.offset_from(ptl) as usize) - m <= 48 {
                if cnt == 0 {
                    break 'drive;
                }
                cnt -= 1;
                for _ in 0..16 {
                    let val = !is_less(&*piv, &*pta) as usize;
                    ptr::copy(pta, ptl.add(m), 1);
                    ptr::copy(pta, ptr_.add(m), 1);
                    pta = pta.add(1);
                    m += val;
                    ptr_ = ptr_.sub(1);
                }
            }
            if (pta.offset_from(ptl) as usize) - m >= 16 {
                if cnt == 0 {
                    break 'drive;
                }
                cnt -= 1;
                for _ in 0..16 {
                    let val = !is_less(&*piv, &*tpa) as usize;
                    ptr::copy(tpa, ptl.add(m), 1);
                    ptr::copy(tpa, ptr_.add(m), 1);
                    tpa = tpa.sub(1);
                    m += val;
                    ptr_ = ptr_.sub(1);
                }
            }
        }

        if (pta.offset_from(ptl) as usize) - m <= 48 {
            for _ in 0..(nmemb % 16) {
                let val = !is_less(&*piv, &*pta) as usize;
                ptr::copy(pta, ptl.add(m), 1);
                ptr::copy(pta, ptr_.add(m), 1);
                pta = pta.add(1);
                m += val;
                ptr_ = ptr_.sub(1);
            }
        } else {
            for _ in 0..(nmemb % 16) {
                let val = !is_less(&*piv, &*tpa) as usize;
                ptr::copy(tpa, ptl.add(m), 1);
                ptr::copy(tpa, ptr_.add(m), 1);
                tpa = tpa.sub(1);
                m += val;
                ptr_ = ptr_.sub(1);
            }
        }

        let mut pta = swap;
        for _ in 0..16 {
            for _ in 0..4 {
                let val = !is_less(&*piv, &*pta) as usize;
                ptr::copy_nonoverlapping(pta, ptl.add(m), 1);
                ptr::copy_nonoverlapping(pta, ptr_.add(m), 1);
                pta = pta.add(1);
                m += val;
                ptr_ = ptr_.sub(1);
            }
        }
        m
    }
}

/// Mirror image of [`fulcrum_default_partition`] that partitions by
/// `is_less(x, piv)` instead of `!is_less(piv, x)` — used when the
/// inherited upper bound on this range is known to be no greater than the
/// pivot, mimicking dual-pivot quicksort's handling of duplicate-heavy
/// data (per Marshall Lochbaum's suggestion, credited in the original
/// source).
///
/// # Safety
/// Same as [`fulcrum_default_partition`].
unsafe fn fulcrum_reverse_partition<T, F>(
    array: *mut T,
    scratch: &mut Scratch<T>,
    piv: *const T,
    nmemb: usize,
    is_less: &mut F,
) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    unsafe {
        let swap = scratch.as_mut_ptr();
        ptr::copy_nonoverlapping(array, swap, 32);
        ptr::copy_nonoverlapping(array.add(nmemb - 32), swap.add(32), 32);

        let ptl = array;
        let mut ptr_ = array.add(nmemb - 1);

        let mut pta = array.add(32);
        let mut tpa = array.add(nmemb - 33);

        let mut m = 0usize;
        let mut cnt = nmemb / 16 - 4;

        // See the matching comment in `fulcrum_default_partition`: both
        // gates are re-checked (and can both fire) every pass, which is
        // what keeps the front and back cursors consuming in balance.
        'drive: loop {
            if (pta.offset_from(ptl) as usize) - m <= 48 {
                if cnt == 0 {
                    break 'drive;
                }
                cnt -= 1;
                for _ in 0..16 {
                    let val = is_less(&*pta, &*piv) as usize;
                    ptr::copy(pta, ptl.add(m), 1);
                    ptr::copy(pta, ptr_.add(m), 1);
                    pta = pta.add(1);
                    m += val;
                    ptr_ = ptr_.sub(1);
                }
            }
            if (pta.offset_from(ptl) as usize) - m >= 16 {
                if cnt == 0 {
                    break 'drive;
                }
                cnt -= 1;
                for _ in 0..16 {
                    let val = is_less(&*tpa, &*piv) as usize;
                    ptr::copy(tpa, ptl.add(m), 1);
                    ptr::copy(tpa, ptr_.add(m), 1);
                    tpa = tpa.sub(1);
                    m += val;
                    ptr_ = ptr_.sub(1);
                }
            }
        }

        if (pta.offset_from(ptl) as usize) - m <= 48 {
            for _ in 0..(nmemb % 16) {
                let val = is_less(&*pta, &*piv) as usize;
                ptr::copy(pta, ptl.add(m), 1);
                ptr::copy(pta, ptr_.add(m), 1);
                pta = pta.add(1);
                m += val;
                ptr_ = ptr_.sub(1);
            }
        } else {
            for _ in 0..(nmemb % 16) {
                let val = is_less(&*tpa, &*piv) as usize;
                ptr::copy(tpa, ptl.add(m), 1);
                ptr::copy(tpa, ptr_.add(m), 1);
                tpa = tpa.sub(1);
                m += val;
                ptr_ = ptr_.sub(1);
            }
        }

        let mut pta = swap;
        for _ in 0..16 {
            for _ in 0..4 {
                let val = is_less(&*pta, &*piv) as usize;
                ptr::copy_nonoverlapping(pta, ptl.add(m), 1);
                ptr::copy_nonoverlapping(pta, ptr_.add(m), 1);
                pta = pta.add(1);
                m += val;
                ptr_ = ptr_.sub(1);
            }
        }
        m
    }
}

/// Tail-recursive quicksort-shaped partition driver. Picks a pivot (a
/// cheap median-of-nine under `nmemb <= 2048`, otherwise a median-of-cbrt
/// sample that can short-circuit straight to a full quadsort when the
/// sample looks heavy-duplicate), partitions around it, then recurses
/// into the smaller side and loops on the larger — the "small-side
/// recurse / large-side iterate" pattern that keeps the recursion depth
/// `O(log n)` without an explicit frame counter.
///
/// `max` is an outer pivot inherited from the caller (null if none): when
/// this range is entirely known to be `<= *max`, the reverse partition is
/// used instead, mimicking dual-pivot quicksort's duplicate handling.
///
/// The pivot sampled at the top of each loop iteration is moved out of
/// the array into a local (detached from whatever the in-place partition
/// scan does to its old slot) for the duration of that iteration's
/// comparisons, then moved back into the array at the partition boundary
/// once the scan is done — the same "one value, temporarily homeless"
/// shape [`crate::scratch::Scratch`] uses, just living on the Rust stack
/// instead of in the scratch buffer.
///
/// # Safety
/// `array[0..nmemb)` must be valid for reads and writes.
pub(crate) unsafe fn fulcrum_partition<T, F>(
    array: *mut T,
    scratch: &mut Scratch<T>,
    mut max: *const T,
    mut nmemb: usize,
    is_less: &mut F,
) where
    F: FnMut(&T, &T) -> bool,
{
    unsafe {
        let mut generic = false;

        loop {
            let ptp: *mut T = if nmemb <= 2048 {
                crum_median_of_nine(array, nmemb, is_less) as *mut T
            } else {
                let p = crum_median_of_cbrt(array, scratch, nmemb, &mut generic, is_less);
                if generic {
                    break;
                }
                p
            };

            let piv = ptr::read(ptp);

            if !max.is_null() && !is_less(&piv, &*max) {
                let a_size = fulcrum_reverse_partition(array, scratch, &piv, nmemb, is_less);
                let s_size = nmemb - a_size;
                nmemb = a_size;
                core::mem::forget(piv);

                if s_size <= a_size / 32 || a_size <= CRUM_OUT {
                    break;
                }
                max = ptr::null();
                continue;
            }

            ptr::write(ptp, ptr::read(array.add(nmemb - 1)));
            nmemb -= 1;

            let a_size = fulcrum_default_partition(array, scratch, &piv, nmemb, is_less);
            let s_size = nmemb - a_size;

            let ptp = array.add(a_size);
            ptr::write(array.add(nmemb), ptr::read(ptp));
            ptr::write(ptp, piv);

            if a_size <= s_size / 32 || s_size <= CRUM_OUT {
                quadsort_with_scratch(ptp.add(1), scratch, s_size, is_less);
            } else {
                fulcrum_partition(ptp.add(1), scratch, max, s_size, is_less);
            }
            nmemb = a_size;

            if s_size <= a_size / 32 || a_size <= CRUM_OUT {
                if a_size <= CRUM_OUT {
                    break;
                }

                let a_size = fulcrum_reverse_partition(array, scratch, ptp as *const T, nmemb, is_less);
                let s_size = nmemb - a_size;
                nmemb = a_size;

                if s_size <= a_size / 32 || a_size <= CRUM_OUT {
                    break;
                }
                max = ptr::null();
                continue;
            }
            max = ptp;
        }
        quadsort_with_scratch(array, scratch, nmemb, is_less);
    }
}
