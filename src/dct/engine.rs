// Copyright (c) 2026 Stegstr
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/brunkstr/stegstr

//! 8×8 separable orthonormal DCT (type II forward, type III inverse).
//!
//! Pure numeric leaf: no level shift, no quantization. The pipeline owns
//! the ±128 shift; the [`crate::dct::quant`] module owns quantization.

use std::sync::OnceLock;

/// Pre-computed cosine table: `COSINE[u][x] = cos((2x + 1) u π / 16)`.
static COSINE: OnceLock<[[f64; 8]; 8]> = OnceLock::new();

/// Orthonormal scale factors: C(0) = 1/√8, C(u>0) = 1/2.
static NORM: OnceLock<[f64; 8]> = OnceLock::new();

fn cosine_table() -> &'static [[f64; 8]; 8] {
    COSINE.get_or_init(|| {
        let mut table = [[0.0f64; 8]; 8];
        for u in 0..8 {
            for x in 0..8 {
                table[u][x] = ((2 * x + 1) as f64 * u as f64 * std::f64::consts::PI / 16.0).cos();
            }
        }
        table
    })
}

fn norm_table() -> &'static [f64; 8] {
    NORM.get_or_init(|| {
        let mut n = [0.5f64; 8];
        n[0] = 1.0 / (8.0f64).sqrt();
        n
    })
}

/// Forward 8×8 DCT-II. Input and output are row-major.
///
/// Orthonormal scaling, so [`inverse_dct_8x8`] is the exact inverse up to
/// floating-point error.
pub fn forward_dct_8x8(block: &[f64; 64]) -> [f64; 64] {
    let cos = cosine_table();
    let c = norm_table();

    // Separable: rows first, then columns.
    let mut temp = [0.0f64; 64];
    for row in 0..8 {
        for u in 0..8 {
            let mut sum = 0.0;
            for x in 0..8 {
                sum += block[row * 8 + x] * cos[u][x];
            }
            temp[row * 8 + u] = c[u] * sum;
        }
    }

    let mut coeffs = [0.0f64; 64];
    for col in 0..8 {
        for v in 0..8 {
            let mut sum = 0.0;
            for y in 0..8 {
                sum += temp[y * 8 + col] * cos[v][y];
            }
            coeffs[v * 8 + col] = c[v] * sum;
        }
    }

    coeffs
}

/// Inverse 8×8 DCT (type III). Input and output are row-major.
pub fn inverse_dct_8x8(coeffs: &[f64; 64]) -> [f64; 64] {
    let cos = cosine_table();
    let c = norm_table();

    let mut temp = [0.0f64; 64];
    for col in 0..8 {
        for y in 0..8 {
            let mut sum = 0.0;
            for v in 0..8 {
                sum += c[v] * coeffs[v * 8 + col] * cos[v][y];
            }
            temp[y * 8 + col] = sum;
        }
    }

    let mut block = [0.0f64; 64];
    for row in 0..8 {
        for x in 0..8 {
            let mut sum = 0.0;
            for u in 0..8 {
                sum += c[u] * temp[row * 8 + u] * cos[u][x];
            }
            block[row * 8 + x] = sum;
        }
    }

    block
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_roundtrip(block: &[f64; 64]) {
        let coeffs = forward_dct_8x8(block);
        let back = inverse_dct_8x8(&coeffs);
        for i in 0..64 {
            assert!(
                (block[i] - back[i]).abs() < 1e-6,
                "index {i}: {} vs {}",
                block[i],
                back[i]
            );
        }
    }

    #[test]
    fn roundtrip_flat() {
        assert_roundtrip(&[0.0; 64]);
    }

    #[test]
    fn roundtrip_constant() {
        assert_roundtrip(&[87.5; 64]);
    }

    #[test]
    fn roundtrip_gradient() {
        let mut block = [0.0f64; 64];
        for i in 0..64 {
            block[i] = (i / 8) as f64 * 4.0 + (i % 8) as f64 * 2.5 - 30.0;
        }
        assert_roundtrip(&block);
    }

    #[test]
    fn roundtrip_pseudo_random() {
        use rand::{Rng, SeedableRng};
        let mut rng = rand::rngs::StdRng::seed_from_u64(0x5747);
        for _ in 0..10 {
            let mut block = [0.0f64; 64];
            for v in block.iter_mut() {
                *v = rng.gen_range(-128.0..128.0);
            }
            assert_roundtrip(&block);
        }
    }

    #[test]
    fn constant_block_is_dc_only() {
        let block = [64.0f64; 64];
        let coeffs = forward_dct_8x8(&block);
        // Orthonormal DC gain is 8: DC = 64 * 8 = 512.
        assert!((coeffs[0] - 512.0).abs() < 1e-9);
        for i in 1..64 {
            assert!(coeffs[i].abs() < 1e-9, "AC {i} = {}", coeffs[i]);
        }
    }

    #[test]
    fn energy_preserved() {
        // Orthonormal transform: sum of squares is invariant (Parseval).
        let mut block = [0.0f64; 64];
        for i in 0..64 {
            block[i] = ((i * 37) % 53) as f64 - 26.0;
        }
        let coeffs = forward_dct_8x8(&block);
        let e_spatial: f64 = block.iter().map(|x| x * x).sum();
        let e_freq: f64 = coeffs.iter().map(|x| x * x).sum();
        assert!((e_spatial - e_freq).abs() < 1e-6);
    }
}
