//! Random splitting of byte buffers.

use rand::{Rng, RngCore};

/// Bytes of input per permitted split.
pub const BYTES_PER_SPLIT: usize = 4;

/// Draws the number of split rounds for an input of `len` bytes.
///
/// Uniform in `[1, len / BYTES_PER_SPLIT]`, or exactly 1 when that range is
/// empty.
pub fn split_count(len: usize, rng: &mut dyn RngCore) -> usize {
    let upper = len / BYTES_PER_SPLIT;
    if upper == 0 {
        1
    } else {
        rng.gen_range(1..=upper)
    }
}

/// Splits `data` into a random number of randomly sized, contiguous pieces.
///
/// Each round advances the end cursor by a uniform offset in `[0, len)`,
/// clamped to the end; the last round always runs to the end. Pieces may be
/// empty. Concatenated in order, the pieces are exactly `data`. The number of
/// pieces is at most [`split_count`]'s draw, and fewer when the cursor reaches
/// the end early.
///
/// Empty input yields no pieces.
pub fn split<'a>(data: &'a [u8], rng: &mut dyn RngCore) -> Vec<&'a [u8]> {
    let len = data.len();
    if len == 0 {
        return Vec::new();
    }

    let splits = split_count(len, rng);
    let mut pieces = Vec::with_capacity(splits);
    let mut start = 0;
    let mut end = 0;

    for round in 0..splits {
        if start >= len {
            break;
        }
        end = if round + 1 == splits {
            len
        } else {
            (end + rng.gen_range(0..len)).min(len)
        };
        pieces.push(&data[start..end]);
        start = end;
    }

    pieces
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn tiny_inputs_are_one_piece() {
        let mut rng = StdRng::seed_from_u64(3);
        let inputs: [&[u8]; 3] = [b"a", b"ab", b"abc"];
        for data in inputs {
            let pieces = split(data, &mut rng);
            assert_eq!(pieces, vec![data]);
        }
    }

    #[test]
    fn empty_input_has_no_pieces() {
        let mut rng = StdRng::seed_from_u64(3);
        assert!(split(b"", &mut rng).is_empty());
    }

    #[test]
    fn split_count_bounds() {
        let mut rng = StdRng::seed_from_u64(8);
        for len in [0, 1, 3, 4, 7, 8, 100, 4096] {
            for _ in 0..50 {
                let count = split_count(len, &mut rng);
                assert!(count >= 1);
                assert!(count <= (len / BYTES_PER_SPLIT).max(1));
            }
        }
    }

    #[test]
    fn same_seed_same_pieces() {
        let data = b"the quick brown fox jumps over the lazy dog";
        let a = split(data, &mut StdRng::seed_from_u64(21));
        let b = split(data, &mut StdRng::seed_from_u64(21));
        assert_eq!(a, b);
    }

    #[test]
    fn larger_inputs_split_for_some_seed() {
        let data = [7u8; 256];
        let multi = (0..64u64).any(|seed| split(&data, &mut StdRng::seed_from_u64(seed)).len() > 1);
        assert!(multi);
    }

    proptest! {
        #[test]
        fn pieces_cover_input_exactly(
            data in prop::collection::vec(any::<u8>(), 1..2048),
            seed in any::<u64>(),
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let pieces = split(&data, &mut rng);

            prop_assert!(!pieces.is_empty());
            prop_assert!(pieces.len() <= (data.len() / BYTES_PER_SPLIT).max(1));
            prop_assert_eq!(pieces.concat(), data);
        }
    }
}
