//! Shared test scaffolding: input-pattern generators, a move-only element
//! type, and a scratch-trapping type that panics if ever
//! default-constructed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const TEST_SIZES: &[usize] = &[
    0, 1, 2, 3, 4, 5, 7, 8, 9, 15, 16, 17, 31, 32, 33, 63, 64, 65, 127, 128, 129, 200, 511, 512,
    513, 1000, 2048, 2049, 4096, 5000, 10_000, 20_000,
];

fn rng_for(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Uniform random `i32`s across the full range.
pub fn random(len: usize, seed: u64) -> Vec<i32> {
    let mut rng = rng_for(seed);
    (0..len).map(|_| rng.random()).collect()
}

/// Already ascending.
pub fn ascending(len: usize) -> Vec<i32> {
    (0..len as i32).collect()
}

/// Already descending (the worst case for any naive insertion-style sort).
pub fn descending(len: usize) -> Vec<i32> {
    (0..len as i32).rev().collect()
}

/// Alternating ascending/descending runs of length 16 — exercises the
/// ordered/reversed run detection in quad-swap and the balance scan in
/// crumsort's quadrant analysis.
pub fn saw_mixed(len: usize) -> Vec<i32> {
    let mut v = Vec::with_capacity(len);
    let mut i = 0usize;
    let mut value = 0i32;
    while i < len {
        let run = 16.min(len - i);
        if (i / 16) % 2 == 0 {
            for _ in 0..run {
                v.push(value);
                value += 1;
            }
        } else {
            for _ in 0..run {
                v.push(value);
                value -= 1;
            }
        }
        i += run;
    }
    v
}

/// Uniform random values from a narrow range, forcing heavy key
/// duplication.
pub fn random_uniform(len: usize, seed: u64) -> Vec<i32> {
    let mut rng = rng_for(seed);
    (0..len).map(|_| rng.random_range(0..8)).collect()
}

/// Zipf-ish distribution: small values vastly more common than large
/// ones, biasing pivot/median samples toward duplicates without making
/// every key identical.
pub fn random_zipf(len: usize, seed: u64) -> Vec<i32> {
    let mut rng = rng_for(seed);
    (0..len)
        .map(|_| {
            let u: f64 = rng.random_range(0.0..1.0);
            (-(1.0 - u).ln() * 20.0) as i32
        })
        .collect()
}

/// One majority value with a thin scatter of distinct minority values,
/// shuffled. Unlike [`random_uniform`]'s handful of evenly-spread keys
/// (heavy enough that `crum_median_of_cbrt`'s `generic` detector usually
/// fires and routes straight to quadsort, bypassing partitioning
/// entirely), the lopsided majority/minority split here keeps most pivot
/// samples non-generic while still reliably producing a small side
/// against a much larger side — the imbalance `fulcrum_partition` checks
/// for (`s_size <= a_size / 32`) before calling `fulcrum_reverse_partition`
/// directly, and the `max`-bounded fast path at the top of its loop, both
/// take.
pub fn skewed_duplicates(len: usize, seed: u64) -> Vec<i32> {
    let mut rng = rng_for(seed);
    let mut v: Vec<i32> = (0..len)
        .map(|i| if i % 10 == 0 { (i / 10) as i32 } else { 0 })
        .collect();
    use rand::seq::SliceRandom;
    v.shuffle(&mut rng);
    v
}

/// All patterns for a given size, tagged with a name for failure
/// messages.
pub fn all_patterns(len: usize, seed: u64) -> Vec<(&'static str, Vec<i32>)> {
    vec![
        ("random", random(len, seed)),
        ("ascending", ascending(len)),
        ("descending", descending(len)),
        ("saw_mixed", saw_mixed(len)),
        ("random_uniform", random_uniform(len, seed)),
        ("random_zipf", random_zipf(len, seed)),
        ("skewed_duplicates", skewed_duplicates(len, seed)),
    ]
}

/// An element that cannot be copied or implicitly duplicated — a `Box`
/// is the simplest thing the standard library gives us whose double-drop
/// or double-free the sanitizer/test harness would actually be able to
/// observe (as an abort), rather than a logic bug that quietly produces a
/// wrong-looking-but-still-valid value.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone)]
pub struct MoveOnly(pub Box<i32>);

impl MoveOnly {
    pub fn new(v: i32) -> Self {
        MoveOnly(Box::new(v))
    }
}

/// A type whose `Default` panics — any code path that accidentally
/// default-constructs a `T` instead of moving one in from a real slot
/// will fail this test immediately instead of silently reading
/// uninitialized memory.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone)]
pub struct Traps(pub i32);

impl Default for Traps {
    fn default() -> Self {
        panic!("Traps::default() called — a value was fabricated instead of moved");
    }
}
