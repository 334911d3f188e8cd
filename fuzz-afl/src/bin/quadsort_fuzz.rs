//! AFL harness for `quadsort::sort`: chunks the raw input into `i32`s and
//! checks the result against both the permutation and ordering
//! invariants (sorted, stable on equal keys, same multiset as the input).

fn main() {
    afl::fuzz!(|data: &[u8]| {
        let mut v: Vec<i32> = data
            .chunks_exact(4)
            .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .enumerate()
            .map(|(i, x)| (x, i))
            .collect();

        let mut expected = v.clone();
        expected.sort();

        quadsort::sort_by(&mut v, |a, b| a.0 < b.0)
            .expect("fixed-size byte buffer must not fail to allocate scratch");

        assert_eq!(v, expected, "quadsort disagrees with Vec::sort on value or on stable tie order");
    });
}
