//! Component F — the power-of-four bottom-up merge ladder that turns the
//! 32-element runs [`crate::quad_swap::quad_swap`] built into the fully
//! sorted array, one quadrupling of the block size at a time.

use core::ptr;

use crate::cross_merge::cross_merge;
use crate::parity_merge::not_greater;
use crate::partial_merge::tail_merge;
use crate::scratch::Scratch;

/// Merges the four adjacent `block`-sized runs at `array[0..4*block)` into
/// one sorted run of `4*block`, skipping whichever half (or both) is
/// already known to be in order relative to its neighbour.
///
/// # Safety
/// `array[0..4*block)` must be valid for reads and writes, each of the
/// four `block`-sized spans individually sorted, and `scratch` must have
/// room for at least `4*block` elements.
unsafe fn quad_merge_block<T, F>(array: *mut T, scratch: &mut Scratch<T>, block: usize, is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    unsafe {
        let pt1 = array.add(block);
        let pt2 = pt1.add(block);
        let pt3 = pt2.add(block);
        let block_x2 = block * 2;

        let left_done = not_greater(is_less, &*pt1.sub(1), &*pt1) as usize;
        let right_done = not_greater(is_less, &*pt3.sub(1), &*pt3) as usize;

        let swap = scratch.as_mut_ptr();

        match left_done | (right_done * 2) {
            0 => {
                cross_merge(swap, array, block, block, is_less);
                cross_merge(swap.add(block_x2), pt2, block, block, is_less);
            }
            1 => {
                ptr::copy_nonoverlapping(array, swap, block_x2);
                cross_merge(swap.add(block_x2), pt2, block, block, is_less);
            }
            2 => {
                cross_merge(swap, array, block, block, is_less);
                ptr::copy_nonoverlapping(pt2, swap.add(block_x2), block_x2);
            }
            _ => {
                if not_greater(is_less, &*pt2.sub(1), &*pt2) {
                    return;
                }
                ptr::copy_nonoverlapping(array, swap, block_x2 * 2);
            }
        }
        cross_merge(array, swap, block_x2, block_x2, is_less);
    }
}

/// Repeatedly quadruples the block size, quad-merging aligned groups of
/// four blocks at each level while `4*block` still fits both `nmemb` and
/// `scratch`, tail-merging whatever's left over at the end of each level.
///
/// Returns the largest block size actually merged by this ladder (half of
/// the final `4*block` step), which [`crate::rotate::rotate_merge`] uses
/// as its own starting block size.
///
/// # Safety
/// `array[0..nmemb)` must be valid for reads and writes, consisting of
/// sorted runs of size `block`.
pub(crate) unsafe fn quad_merge<T, F>(
    array: *mut T,
    scratch: &mut Scratch<T>,
    nmemb: usize,
    block: usize,
    is_less: &mut F,
) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    unsafe {
        let pte = array.add(nmemb);
        let mut block = block * 4;

        while block <= nmemb && block <= scratch.len() {
            let mut pta = array;

            loop {
                quad_merge_block(pta, scratch, block / 4, is_less);
                pta = pta.add(block);
                if !(pta.add(block) <= pte) {
                    break;
                }
            }

            tail_merge(pta, scratch, pte.offset_from(pta) as usize, block / 4, is_less);
            block *= 4;
        }

        tail_merge(array, scratch, nmemb, block / 4, is_less);

        block / 2
    }
}
