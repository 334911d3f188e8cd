//! AFL harness for `quadsort::crumsort`. Unstable, so only the sorted
//! multiset invariant is checked, not tie order.

fn main() {
    afl::fuzz!(|data: &[u8]| {
        let mut v: Vec<i32> = data
            .chunks_exact(4)
            .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();

        let mut expected = v.clone();
        expected.sort();

        quadsort::crumsort(&mut v).expect("fixed-size byte buffer must not fail to allocate scratch");

        assert_eq!(v, expected, "crumsort disagrees with Vec::sort");
    });
}
