//! Age-driven corrosion of fragment contents.
//!
//! Corrosion works on Unicode scalar values rather than bytes, so a mutated
//! fragment is still well-formed UTF-8 even when the characters it holds
//! are nonsense.

use chrono::{DateTime, Utc};
use rand::{Rng, RngCore};

/// Size of the Unicode code point space. Drifted values wrap modulo this.
const CODE_POINT_SPACE: i64 = 0x11_0000;

/// Half the width of the drift distribution.
const DRIFT_CENTER: i32 = i32::MAX / 2;

/// Number of corrosion rounds for a fragment buried at `interred_at`.
///
/// `floor(log10(s)) + 1` for `s` whole elapsed seconds, which is the number
/// of decimal digits in `s`. Anything under one second old (or stamped in
/// the future) gets zero.
#[must_use]
pub fn intensity_for(interred_at: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    let elapsed = now.signed_duration_since(interred_at).num_seconds();
    if elapsed <= 0 {
        0
    } else {
        elapsed.ilog10() + 1
    }
}

/// Applies `intensity` rounds of corrosion to `piece`.
///
/// Each round picks one scalar value uniformly and shifts it by a signed
/// drift drawn from `[-(i32::MAX / 2), i32::MAX / 2 + 1]`, wrapping into the
/// code point space. A shift that lands on a surrogate yields U+FFFD.
/// Invalid UTF-8 in the input decodes as U+FFFD before corrosion starts.
///
/// With zero intensity, or an empty piece, the bytes come back untouched.
#[must_use]
pub fn corrode(piece: &[u8], intensity: u32, rng: &mut dyn RngCore) -> Vec<u8> {
    if intensity == 0 || piece.is_empty() {
        return piece.to_vec();
    }

    let mut scalars: Vec<char> = String::from_utf8_lossy(piece).chars().collect();
    for _ in 0..intensity {
        let position = rng.gen_range(0..scalars.len());
        let drift = rng.gen_range(0..=i32::MAX) - DRIFT_CENTER;
        scalars[position] = drift_scalar(scalars[position], drift);
    }

    scalars.into_iter().collect::<String>().into_bytes()
}

fn drift_scalar(scalar: char, drift: i32) -> char {
    let shifted = (i64::from(u32::from(scalar)) + i64::from(drift)).rem_euclid(CODE_POINT_SPACE);
    u32::try_from(shifted)
        .ok()
        .and_then(char::from_u32)
        .unwrap_or(char::REPLACEMENT_CHARACTER)
}
