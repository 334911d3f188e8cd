//! Component I — the four-quadrant order scan that crumsort runs before
//! committing to a partition, letting it skip straight to (partial)
//! quadsort work on whichever quadrants are already sorted or reversed.

use crate::crumsort::fulcrum::fulcrum_partition;
use crate::crumsort::QUAD_CACHE;
use crate::quad_swap::quad_reversal;
use crate::quadsort::quadsort_with_scratch;
use crate::rotate::rotate_merge_block;
use crate::scratch::Scratch;

/// Splits `array[0..nmemb)` into four roughly-equal quadrants, samples
/// each quadrant's local order (in 32-element strides, skipping ahead 96
/// elements at a time through long already-ordered stretches), and uses
/// what it finds to decide, per quadrant, whether to reverse a run in
/// place, hand it to quadsort outright, or partition it with
/// [`fulcrum_partition`] — then merges the four results back together
/// with [`rotate_merge_block`].
///
/// This is the one entry point in the crate that looks ahead before
/// choosing a strategy instead of discovering order incidentally while
/// sorting; the quad-swap state machine in [`crate::quad_swap`] detects
/// ordered/reversed runs opportunistically, while this scans for them
/// up front over a span large enough that partitioning unconditionally
/// would be wasteful.
///
/// # Safety
/// `array[0..nmemb)` must be valid for reads and writes, and `nmemb >
/// CRUM_OUT` (the caller in [`crate::crumsort::crumsort_swap`] only
/// reaches this path above that threshold).
pub(crate) unsafe fn crum_analyze<T, F>(array: *mut T, scratch: &mut Scratch<T>, nmemb: usize, is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    unsafe {
        let half1 = nmemb / 2;
        let quad1 = half1 / 2;
        let quad2 = half1 - quad1;
        let half2 = nmemb - half1;
        let quad3 = half2 / 2;
        let quad4 = half2 - quad3;

        let mut pta = array;
        let mut ptb = array.add(quad1);
        let mut ptc = array.add(half1);
        let mut ptd = array.add(half1 + quad3);

        let mut astreaks = 0usize;
        let mut bstreaks = 0usize;
        let mut cstreaks = 0usize;
        let mut dstreaks = 0usize;
        let mut abalance = 0usize;
        let mut bbalance = 0usize;
        let mut cbalance = 0usize;
        let mut dbalance = 0usize;

        let mut cnt = nmemb;
        while cnt > 132 {
            let mut asum = 0usize;
            let mut bsum = 0usize;
            let mut csum = 0usize;
            let mut dsum = 0usize;

            for _ in 0..32 {
                asum += is_less(&*pta.add(1), &*pta) as usize;
                pta = pta.add(1);
                bsum += is_less(&*ptb.add(1), &*ptb) as usize;
                ptb = ptb.add(1);
                csum += is_less(&*ptc.add(1), &*ptc) as usize;
                ptc = ptc.add(1);
                dsum += is_less(&*ptd.add(1), &*ptd) as usize;
                ptd = ptd.add(1);
            }

            abalance += asum;
            astreaks += (asum == 0 || asum == 32) as usize;
            bbalance += bsum;
            bstreaks += (bsum == 0 || bsum == 32) as usize;
            cbalance += csum;
            cstreaks += (csum == 0 || csum == 32) as usize;
            dbalance += dsum;
            dstreaks += (dsum == 0 || dsum == 32) as usize;

            if cnt > 516 && asum + bsum + csum + dsum == 0 {
                abalance += 48;
                pta = pta.add(96);
                bbalance += 48;
                ptb = ptb.add(96);
                cbalance += 48;
                ptc = ptc.add(96);
                dbalance += 48;
                ptd = ptd.add(96);
                cnt -= 384;
            }
            cnt -= 128;
        }

        while cnt > 7 {
            abalance += is_less(&*pta.add(1), &*pta) as usize;
            pta = pta.add(1);
            bbalance += is_less(&*ptb.add(1), &*ptb) as usize;
            ptb = ptb.add(1);
            cbalance += is_less(&*ptc.add(1), &*ptc) as usize;
            ptc = ptc.add(1);
            dbalance += is_less(&*ptd.add(1), &*ptd) as usize;
            ptd = ptd.add(1);
            cnt -= 4;
        }

        if quad1 < quad2 {
            bbalance += is_less(&*ptb.add(1), &*ptb) as usize;
            ptb = ptb.add(1);
        }
        if quad1 < quad3 {
            cbalance += is_less(&*ptc.add(1), &*ptc) as usize;
            ptc = ptc.add(1);
        }
        if quad1 < quad4 {
            dbalance += is_less(&*ptd.add(1), &*ptd) as usize;
            ptd = ptd.add(1);
        }

        if abalance + bbalance + cbalance + dbalance == 0
            && !is_less(&*pta.add(1), &*pta)
            && !is_less(&*ptb.add(1), &*ptb)
            && !is_less(&*ptc.add(1), &*ptc)
        {
            return;
        }

        let mut asum = (quad1 - abalance == 1) as usize;
        let mut bsum = (quad2 - bbalance == 1) as usize;
        let mut csum = (quad3 - cbalance == 1) as usize;
        let mut dsum = (quad4 - dbalance == 1) as usize;

        if asum | bsum | csum | dsum != 0 {
            let span1 = (asum != 0 && bsum != 0) && is_less(&*pta.add(1), &*pta);
            let span2 = (bsum != 0 && csum != 0) && is_less(&*ptb.add(1), &*ptb);
            let span3 = (csum != 0 && dsum != 0) && is_less(&*ptc.add(1), &*ptc);

            match span1 as usize | (span2 as usize) * 2 | (span3 as usize) * 4 {
                0 => {}
                1 => {
                    quad_reversal(array, ptb);
                    abalance = 0;
                    bbalance = 0;
                }
                2 => {
                    quad_reversal(pta.add(1), ptc);
                    bbalance = 0;
                    cbalance = 0;
                }
                3 => {
                    quad_reversal(array, ptc);
                    abalance = 0;
                    bbalance = 0;
                    cbalance = 0;
                }
                4 => {
                    quad_reversal(ptb.add(1), ptd);
                    cbalance = 0;
                    dbalance = 0;
                }
                5 => {
                    quad_reversal(array, ptb);
                    quad_reversal(ptb.add(1), ptd);
                    abalance = 0;
                    bbalance = 0;
                    cbalance = 0;
                    dbalance = 0;
                }
                6 => {
                    quad_reversal(pta.add(1), ptd);
                    bbalance = 0;
                    cbalance = 0;
                    dbalance = 0;
                }
                _ => {
                    quad_reversal(array, ptd);
                    return;
                }
            }

            if asum != 0 && abalance != 0 {
                quad_reversal(array, pta);
                abalance = 0;
            }
            if bsum != 0 && bbalance != 0 {
                quad_reversal(pta.add(1), ptb);
                bbalance = 0;
            }
            if csum != 0 && cbalance != 0 {
                quad_reversal(ptb.add(1), ptc);
                cbalance = 0;
            }
            if dsum != 0 && dbalance != 0 {
                quad_reversal(ptc.add(1), ptd);
                dbalance = 0;
            }
        }

        // Quadrants with more than 1-in-512 already-ordered 32-runs are left
        // to quadsort itself; the rest go through the partition.
        let order_cnt = nmemb / 512;
        asum = (astreaks > order_cnt) as usize;
        bsum = (bstreaks > order_cnt) as usize;
        csum = (cstreaks > order_cnt) as usize;
        dsum = (dstreaks > order_cnt) as usize;

        let force_cache = quad1 > QUAD_CACHE;
        let mask = if force_cache {
            15
        } else {
            asum + bsum * 2 + csum * 4 + dsum * 8
        };

        match mask {
            0 => {
                fulcrum_partition(array, scratch, core::ptr::null(), nmemb, is_less);
                return;
            }
            1 => {
                if abalance != 0 {
                    quadsort_with_scratch(array, scratch, quad1, is_less);
                }
                fulcrum_partition(pta.add(1), scratch, core::ptr::null(), quad2 + half2, is_less);
            }
            2 => {
                fulcrum_partition(array, scratch, core::ptr::null(), quad1, is_less);
                if bbalance != 0 {
                    quadsort_with_scratch(pta.add(1), scratch, quad2, is_less);
                }
                fulcrum_partition(ptb.add(1), scratch, core::ptr::null(), half2, is_less);
            }
            3 => {
                if abalance != 0 {
                    quadsort_with_scratch(array, scratch, quad1, is_less);
                }
                if bbalance != 0 {
                    quadsort_with_scratch(pta.add(1), scratch, quad2, is_less);
                }
                fulcrum_partition(ptb.add(1), scratch, core::ptr::null(), half2, is_less);
            }
            4 => {
                fulcrum_partition(array, scratch, core::ptr::null(), half1, is_less);
                if cbalance != 0 {
                    quadsort_with_scratch(ptb.add(1), scratch, quad3, is_less);
                }
                fulcrum_partition(ptc.add(1), scratch, core::ptr::null(), quad4, is_less);
            }
            8 => {
                fulcrum_partition(array, scratch, core::ptr::null(), half1 + quad3, is_less);
                if dbalance != 0 {
                    quadsort_with_scratch(ptc.add(1), scratch, quad4, is_less);
                }
            }
            9 => {
                if abalance != 0 {
                    quadsort_with_scratch(array, scratch, quad1, is_less);
                }
                fulcrum_partition(pta.add(1), scratch, core::ptr::null(), quad2 + quad3, is_less);
                if dbalance != 0 {
                    quadsort_with_scratch(ptc.add(1), scratch, quad4, is_less);
                }
            }
            12 => {
                fulcrum_partition(array, scratch, core::ptr::null(), half1, is_less);
                if cbalance != 0 {
                    quadsort_with_scratch(ptb.add(1), scratch, quad3, is_less);
                }
                if dbalance != 0 {
                    quadsort_with_scratch(ptc.add(1), scratch, quad4, is_less);
                }
            }
            _ => {
                if asum != 0 {
                    if abalance != 0 {
                        quadsort_with_scratch(array, scratch, quad1, is_less);
                    }
                } else {
                    fulcrum_partition(array, scratch, core::ptr::null(), quad1, is_less);
                }
                if bsum != 0 {
                    if bbalance != 0 {
                        quadsort_with_scratch(pta.add(1), scratch, quad2, is_less);
                    }
                } else {
                    fulcrum_partition(pta.add(1), scratch, core::ptr::null(), quad2, is_less);
                }
                if csum != 0 {
                    if cbalance != 0 {
                        quadsort_with_scratch(ptb.add(1), scratch, quad3, is_less);
                    }
                } else {
                    fulcrum_partition(ptb.add(1), scratch, core::ptr::null(), quad3, is_less);
                }
                if dsum != 0 {
                    if dbalance != 0 {
                        quadsort_with_scratch(ptc.add(1), scratch, quad4, is_less);
                    }
                } else {
                    fulcrum_partition(ptc.add(1), scratch, core::ptr::null(), quad4, is_less);
                }
            }
        }

        if !is_less(&*pta.add(1), &*pta) {
            if !is_less(&*ptc.add(1), &*ptc) {
                if !is_less(&*ptb.add(1), &*ptb) {
                    return;
                }
            } else {
                rotate_merge_block(array.add(half1), scratch, quad3, quad4, is_less);
            }
        } else {
            rotate_merge_block(array, scratch, quad1, quad2, is_less);

            if is_less(&*ptc.add(1), &*ptc) {
                rotate_merge_block(array.add(half1), scratch, quad3, quad4, is_less);
            }
        }
        rotate_merge_block(array, scratch, half1, half2, is_less);
    }
}
