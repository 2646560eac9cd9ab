// Copyright (c) 2026 Stegstr
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/brunkstr/stegstr

//! Zigzag scan order for 8×8 DCT blocks.
//!
//! Payload bits address coefficients by zigzag index (the order JPEG itself
//! uses), while blocks are stored in natural row-major order. This table is
//! the bridge between the two.

/// Maps zigzag index (0–63) to natural row-major index (0–63).
///
/// Index 0 is the DC term; 1..=63 walk the AC coefficients from lowest to
/// highest spatial frequency.
pub const ZIGZAG_TO_NATURAL: [usize; 64] = [
     0,  1,  8, 16,  9,  2,  3, 10,
    17, 24, 32, 25, 18, 11,  4,  5,
    12, 19, 26, 33, 40, 48, 41, 34,
    27, 20, 13,  6,  7, 14, 21, 28,
    35, 42, 49, 56, 57, 50, 43, 36,
    29, 22, 15, 23, 30, 37, 44, 51,
    58, 59, 52, 45, 38, 31, 39, 46,
    53, 60, 61, 54, 47, 55, 62, 63,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_a_permutation() {
        let mut seen = [false; 64];
        for &idx in &ZIGZAG_TO_NATURAL {
            assert!(!seen[idx], "duplicate natural index {idx}");
            seen[idx] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn low_frequencies_first() {
        // The embeddable band (zigzag 1..=24) stays within the first six
        // anti-diagonals: low-to-mid spatial frequencies only.
        for zi in 1..=24 {
            let nat = ZIGZAG_TO_NATURAL[zi];
            let (row, col) = (nat / 8, nat % 8);
            assert!(row + col <= 6, "zigzag {zi} maps to ({row},{col})");
        }
    }

    #[test]
    fn known_positions() {
        assert_eq!(ZIGZAG_TO_NATURAL[0], 0); // DC
        assert_eq!(ZIGZAG_TO_NATURAL[1], 1); // (0,1)
        assert_eq!(ZIGZAG_TO_NATURAL[2], 8); // (1,0)
        assert_eq!(ZIGZAG_TO_NATURAL[63], 63);
    }
}
