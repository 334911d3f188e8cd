//! Pivot selection for [`crate::crumsort::fulcrum`]'s partition step:
//! median-of-nine for small ranges, median-of-cube-root (with a
//! generic/heavy-duplicate detector) for large ones.

use core::ptr;

use crate::quadsort::quadsort_with_scratch;
use crate::scratch::Scratch;

/// Binary-searches for the median of two sorted, equal-length runs
/// `pta[0..len)`/`ptb[0..len)` in `O(log len)` comparisons, returning a
/// pointer to whichever element is the true median.
///
/// # Safety
/// `pta[0..len)` and `ptb[0..len)` must be valid for reads, both sorted.
unsafe fn crum_binary_median<T, F>(pta: *const T, ptb: *const T, len: usize, is_less: &mut F) -> *const T
where
    F: FnMut(&T, &T) -> bool,
{
    unsafe {
        let mut pta = pta;
        let mut ptb = ptb;
        let mut len = len;

        while len / 2 != 0 {
            len /= 2;
            if !is_less(&*ptb.add(len), &*pta.add(len)) {
                pta = pta.add(len);
            } else {
                ptb = ptb.add(len);
            }
        }
        if is_less(&*ptb, &*pta) {
            pta
        } else {
            ptb
        }
    }
}

/// Picks a pivot for `array[0..nmemb)` by sampling `c` strided elements
/// (`c` the smallest power of two with `c^3 > nmemb` and `c <= scratch
/// capacity`), sorting the two halves of the sample, and taking their
/// binary median. Sets `*generic` when the tops of both halves are no
/// greater than the sample's first element — a heavy-duplicate
/// distribution this pivot choice handles badly, signalling the caller to
/// fall back to a plain quadsort of the whole range instead of
/// partitioning around this pivot.
///
/// The starting stride offset is derived from a stack address
/// (`(size_t)&div / 64 % div`), giving a cheap per-call jitter without an
/// RNG dependency. Deliberately left as address-derived jitter rather
/// than seeded with a proper RNG — see DESIGN.md.
///
/// # Safety
/// `array[0..nmemb)` must be valid for reads and writes, `scratch` must
/// have room for at least `c` elements (guaranteed by the `c <=
/// scratch.len()` stopping condition below).
pub(crate) unsafe fn crum_median_of_cbrt<T, F>(
    array: *mut T,
    scratch: &mut Scratch<T>,
    nmemb: usize,
    generic: &mut bool,
    is_less: &mut F,
) -> *mut T
where
    F: FnMut(&T, &T) -> bool,
{
    unsafe {
        let mut cbrt = 32usize;
        while nmemb > cbrt * cbrt * cbrt && cbrt < scratch.len() {
            cbrt *= 2;
        }

        let div = nmemb / cbrt;
        let div_addr = &div as *const usize as usize;
        let offset = (div_addr / 64) % div;

        let mut pta = array.add(nmemb - 1 - offset);
        let piv = array.add(cbrt);
        let mut piv_cursor = piv;

        let mut cnt = cbrt;
        while cnt > 0 {
            cnt -= 1;
            piv_cursor = piv_cursor.sub(1);
            ptr::swap(piv_cursor, pta);
            pta = pta.sub(div);
        }

        let cbrt = cbrt / 2;

        quadsort_with_scratch(piv, scratch, cbrt, is_less);
        quadsort_with_scratch(piv.add(cbrt), scratch, cbrt, is_less);

        *generic = !is_less(&*piv, &*piv.add(cbrt * 2 - 1)) && !is_less(&*piv, &*piv.add(cbrt - 1));

        crum_binary_median(piv, piv.add(cbrt), cbrt, is_less) as *mut T
    }
}

/// Index (`v0`, `v1`, or `v2`) of the median of `array[v0]`, `array[v1]`,
/// `array[v2]` under `is_less`.
///
/// # Safety
/// `array.add(v0)`, `array.add(v1)`, `array.add(v2)` must be valid for
/// reads.
unsafe fn crum_median_of_three<T, F>(array: *const T, v0: usize, v1: usize, v2: usize, is_less: &mut F) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    unsafe {
        let x = is_less(&*array.add(v1), &*array.add(v0));
        let y = is_less(&*array.add(v2), &*array.add(v0));
        let z = is_less(&*array.add(v2), &*array.add(v1));

        let values = [v0, v1, v2];
        values[(x == y) as usize + (y ^ z) as usize]
    }
}

/// Median of nine samples drawn from `array[0..nmemb)` at fixed
/// fractional offsets, combined via three median-of-threes and a final
/// median-of-three over their results.
///
/// # Safety
/// `array[0..nmemb)` must be valid for reads, `nmemb >= 16`.
pub(crate) unsafe fn crum_median_of_nine<T, F>(array: *const T, nmemb: usize, is_less: &mut F) -> *const T
where
    F: FnMut(&T, &T) -> bool,
{
    unsafe {
        let div = nmemb / 16;

        let x = crum_median_of_three(array, div * 2, div * 1, div * 4, is_less);
        let y = crum_median_of_three(array, div * 8, div * 6, div * 10, is_less);
        let z = crum_median_of_three(array, div * 14, div * 12, div * 15, is_less);

        array.add(crum_median_of_three(array, x, y, z, is_less))
    }
}
