//! Component E — turns raw input into fully sorted 32-element blocks.
//!
//! [`quad_swap`] walks the array 8 elements at a time, sorting each block
//! of 4 pairs and quad-merging it into a sorted run of 8, while also
//! watching for two special cases worth skipping the general merge for:
//! a block that's already ascending (an "ordered" run, extended for as
//! long as it keeps holding), and a block that's fully descending (a
//! "reversed" run, extended the same way and then flipped once in place
//! with [`quad_reversal`] instead of merged). The three modes form a
//! small state machine ([`Mode`]) in place of the original's goto-driven
//! dispatch between three code labels.

use core::ptr;

use crate::parity_merge::{greater, not_greater, parity_merge, parity_merge_four, parity_merge_two};
use crate::partial_merge::tail_merge;
use crate::scratch::Scratch;

enum Mode<T> {
    Scan,
    Ordered,
    Reversed(*mut T),
}

/// Reverses `array[pta..=ptz]` in place (note: `ptz` is the *last* valid
/// index, not one-past-the-end) with a 4-pointer trinity-style walk from
/// both ends simultaneously.
///
/// # Safety
/// `pta..=ptz` must be valid for reads and writes, `ptz >= pta`.
pub(crate) unsafe fn quad_reversal<T>(pta: *mut T, ptz: *mut T) {
    unsafe {
        let mut pta = pta;
        let mut ptz = ptz;

        let mut loop_ = (ptz.offset_from(pta) as usize) / 2;

        let mut ptb = pta.add(loop_);
        let mut pty = ptz.sub(loop_);

        if loop_ % 2 == 0 {
            let tmp2 = ptr::read(ptb);
            ptr::write(ptb, ptr::read(pty));
            ptb = ptb.sub(1);
            ptr::write(pty, tmp2);
            pty = pty.add(1);
            loop_ -= 1;
        }

        loop_ /= 2;

        loop {
            let tmp1 = ptr::read(pta);
            ptr::write(pta, ptr::read(ptz));
            pta = pta.add(1);
            ptr::write(ptz, tmp1);
            ptz = ptz.sub(1);

            let tmp2 = ptr::read(ptb);
            ptr::write(ptb, ptr::read(pty));
            ptb = ptb.sub(1);
            ptr::write(pty, tmp2);
            pty = pty.add(1);

            if loop_ == 0 {
                break;
            }
            loop_ -= 1;
        }
    }
}

/// Folds two already pairwise-swapped runs of 4 (`array[0..4)`,
/// `array[4..8)`) into a single sorted run of 8, using `scratch[0..8)` as
/// working space.
///
/// # Safety
/// `array[0..8)` must be valid for reads and writes, `scratch` must have
/// room for at least 8 elements.
unsafe fn quad_swap_merge<T, F>(array: *mut T, scratch: &mut Scratch<T>, is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    unsafe {
        let swap = scratch.as_mut_ptr();
        parity_merge_two(swap, array, is_less);
        parity_merge_two(swap.add(4), array.add(4), is_less);
        parity_merge_four(array, swap, is_less);
    }
}

/// Applies a pairwise swap whose outcome `v` (`1` if the pair was
/// descending) is already known, skipping the extra comparator call
/// `branchless_swap` would otherwise make.
#[inline(always)]
unsafe fn apply_known_swap<T>(pta: *mut T, v: usize) {
    unsafe {
        let x = 1 - v;
        let tmp = ptr::read(pta.add(x));
        ptr::write(pta, ptr::read(pta.add(v)));
        ptr::write(pta.add(1), tmp);
    }
}

/// Mirror image of [`apply_known_swap`] used when unwinding out of a
/// reversed run, where the source/destination roles of `v` and `1 - v`
/// are swapped relative to the forward case.
#[inline(always)]
unsafe fn apply_known_swap_rev<T>(pta: *mut T, v: usize) {
    unsafe {
        let x = 1 - v;
        let tmp = ptr::read(pta.add(v));
        ptr::write(pta, ptr::read(pta.add(x)));
        ptr::write(pta.add(1), tmp);
    }
}

#[inline(always)]
unsafe fn fix_four_pairs<T>(pta: *mut T, v1: usize, v2: usize, v3: usize, v4: usize) {
    unsafe {
        apply_known_swap(pta, v1);
        apply_known_swap(pta.add(2), v2);
        apply_known_swap(pta.add(4), v3);
        apply_known_swap(pta.add(6), v4);
    }
}

#[inline(always)]
unsafe fn fix_four_pairs_rev<T>(pta: *mut T, v1: usize, v2: usize, v3: usize, v4: usize) {
    unsafe {
        apply_known_swap_rev(pta, v1);
        apply_known_swap_rev(pta.add(2), v2);
        apply_known_swap_rev(pta.add(4), v3);
        apply_known_swap_rev(pta.add(6), v4);
    }
}

/// Builds sorted 32-element blocks out of `array[0..nmemb)`.
///
/// Returns `true` when the whole array turned out to be one descending
/// run and has already been fully reversed into sorted order — the
/// caller can skip the merge phases entirely in that case.
///
/// # Safety
/// `array[0..nmemb)` must be valid for reads and writes, `scratch` must
/// have room for at least `nmemb` elements and at least 32, and
/// `nmemb >= 32`.
pub(crate) unsafe fn quad_swap<T, F>(
    array: *mut T,
    scratch: &mut Scratch<T>,
    nmemb: usize,
    is_less: &mut F,
) -> bool
where
    F: FnMut(&T, &T) -> bool,
{
    unsafe {
        let mut pta = array;
        let mut count = nmemb / 8;
        let mut mode = Mode::Scan;

        let reversed_tail: Option<*mut T> = 'drive: loop {
            match mode {
                Mode::Scan => {
                    if count == 0 {
                        break 'drive None;
                    }
                    count -= 1;

                    let v1 = greater(is_less, &*pta, &*pta.add(1)) as usize;
                    let v2 = greater(is_less, &*pta.add(2), &*pta.add(3)) as usize;
                    let v3 = greater(is_less, &*pta.add(4), &*pta.add(5)) as usize;
                    let v4 = greater(is_less, &*pta.add(6), &*pta.add(7)) as usize;

                    match v1 + v2 * 2 + v3 * 4 + v4 * 8 {
                        0 => {
                            if not_greater(is_less, &*pta.add(1), &*pta.add(2))
                                && not_greater(is_less, &*pta.add(3), &*pta.add(4))
                                && not_greater(is_less, &*pta.add(5), &*pta.add(6))
                            {
                                mode = Mode::Ordered;
                                continue 'drive;
                            }
                            quad_swap_merge(pta, scratch, is_less);
                            pta = pta.add(8);
                        }
                        15 => {
                            if greater(is_less, &*pta.add(1), &*pta.add(2))
                                && greater(is_less, &*pta.add(3), &*pta.add(4))
                                && greater(is_less, &*pta.add(5), &*pta.add(6))
                            {
                                mode = Mode::Reversed(pta);
                                continue 'drive;
                            }
                            fix_four_pairs(pta, v1, v2, v3, v4);
                            quad_swap_merge(pta, scratch, is_less);
                            pta = pta.add(8);
                        }
                        _ => {
                            fix_four_pairs(pta, v1, v2, v3, v4);
                            quad_swap_merge(pta, scratch, is_less);
                            pta = pta.add(8);
                        }
                    }
                }
                Mode::Ordered => {
                    pta = pta.add(8);
                    if count == 0 {
                        break 'drive None;
                    }
                    count -= 1;

                    let v1 = greater(is_less, &*pta, &*pta.add(1)) as usize;
                    let v2 = greater(is_less, &*pta.add(2), &*pta.add(3)) as usize;
                    let v3 = greater(is_less, &*pta.add(4), &*pta.add(5)) as usize;
                    let v4 = greater(is_less, &*pta.add(6), &*pta.add(7)) as usize;

                    if v1 | v2 | v3 | v4 != 0 {
                        if v1 + v2 + v3 + v4 == 4
                            && greater(is_less, &*pta.add(1), &*pta.add(2))
                            && greater(is_less, &*pta.add(3), &*pta.add(4))
                            && greater(is_less, &*pta.add(5), &*pta.add(6))
                        {
                            mode = Mode::Reversed(pta);
                            continue 'drive;
                        }
                        fix_four_pairs(pta, v1, v2, v3, v4);
                        quad_swap_merge(pta, scratch, is_less);
                        pta = pta.add(8);
                        mode = Mode::Scan;
                        continue 'drive;
                    }
                    if not_greater(is_less, &*pta.add(1), &*pta.add(2))
                        && not_greater(is_less, &*pta.add(3), &*pta.add(4))
                        && not_greater(is_less, &*pta.add(5), &*pta.add(6))
                    {
                        continue 'drive;
                    }
                    quad_swap_merge(pta, scratch, is_less);
                    pta = pta.add(8);
                    mode = Mode::Scan;
                }
                Mode::Reversed(pts) => {
                    pta = pta.add(8);
                    if count == 0 {
                        break 'drive Some(pts);
                    }
                    count -= 1;

                    let v1 = not_greater(is_less, &*pta, &*pta.add(1)) as usize;
                    let v2 = not_greater(is_less, &*pta.add(2), &*pta.add(3)) as usize;
                    let v3 = not_greater(is_less, &*pta.add(4), &*pta.add(5)) as usize;
                    let v4 = not_greater(is_less, &*pta.add(6), &*pta.add(7)) as usize;

                    if v1 | v2 | v3 | v4 == 0
                        && greater(is_less, &*pta.sub(1), &*pta)
                        && greater(is_less, &*pta.add(1), &*pta.add(2))
                        && greater(is_less, &*pta.add(3), &*pta.add(4))
                        && greater(is_less, &*pta.add(5), &*pta.add(6))
                    {
                        continue 'drive;
                    }

                    quad_reversal(pts, pta.sub(1));

                    if v1 + v2 + v3 + v4 == 4
                        && not_greater(is_less, &*pta.add(1), &*pta.add(2))
                        && not_greater(is_less, &*pta.add(3), &*pta.add(4))
                        && not_greater(is_less, &*pta.add(5), &*pta.add(6))
                    {
                        mode = Mode::Ordered;
                        continue 'drive;
                    }
                    if v1 + v2 + v3 + v4 == 0
                        && greater(is_less, &*pta.add(1), &*pta.add(2))
                        && greater(is_less, &*pta.add(3), &*pta.add(4))
                        && greater(is_less, &*pta.add(5), &*pta.add(6))
                    {
                        mode = Mode::Reversed(pta);
                        continue 'drive;
                    }

                    fix_four_pairs_rev(pta, v1, v2, v3, v4);

                    if greater(is_less, &*pta.add(1), &*pta.add(2))
                        || greater(is_less, &*pta.add(3), &*pta.add(4))
                        || greater(is_less, &*pta.add(5), &*pta.add(6))
                    {
                        quad_swap_merge(pta, scratch, is_less);
                    }
                    pta = pta.add(8);
                    mode = Mode::Scan;
                }
            }
        };

        let remainder = nmemb % 8;

        match reversed_tail {
            Some(pts) => {
                let mut k = remainder as isize;
                let mut broke = false;
                while k >= 1 {
                    let a = pta.offset(k - 2);
                    let b = pta.offset(k - 1);
                    if not_greater(is_less, &*a, &*b) {
                        broke = true;
                        break;
                    }
                    k -= 1;
                }

                if !broke {
                    quad_reversal(pts, pta.add(remainder).sub(1));
                    if pts == array {
                        return true;
                    }
                    pta = array;
                } else {
                    quad_reversal(pts, pta.sub(1));
                    crate::tiny::tail_swap(pta, scratch, remainder, is_less);
                    pta = array;
                }
            }
            None => {
                crate::tiny::tail_swap(pta, scratch, remainder, is_less);
                pta = array;
            }
        }

        let mut count32 = nmemb / 32;
        while count32 > 0 {
            count32 -= 1;

            if !(not_greater(is_less, &*pta.add(7), &*pta.add(8))
                && not_greater(is_less, &*pta.add(15), &*pta.add(16))
                && not_greater(is_less, &*pta.add(23), &*pta.add(24)))
            {
                let swap = scratch.as_mut_ptr();
                parity_merge(swap, pta, 8, 8, is_less);
                parity_merge(swap.add(16), pta.add(16), 8, 8, is_less);
                parity_merge(pta, swap, 16, 16, is_less);
            }
            pta = pta.add(32);
        }

        if nmemb % 32 > 8 {
            tail_merge(pta, scratch, nmemb % 32, 8, is_less);
        }

        false
    }
}
