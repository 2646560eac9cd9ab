// Copyright (c) 2026 Stegstr
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/brunkstr/stegstr

//! GF(2^8) arithmetic with primitive polynomial 0x11D.

use std::sync::OnceLock;

struct GfTables {
    /// exp table doubled to 512 entries so products skip the mod 255.
    exp: [u8; 512],
    log: [u8; 256],
}

static TABLES: OnceLock<GfTables> = OnceLock::new();

fn tables() -> &'static GfTables {
    TABLES.get_or_init(|| {
        let mut exp = [0u8; 512];
        let mut log = [0u8; 256];
        let mut x: u16 = 1;
        for i in 0..255 {
            exp[i] = x as u8;
            log[x as usize] = i as u8;
            x <<= 1;
            if x & 0x100 != 0 {
                x ^= 0x11D;
            }
        }
        for i in 255..512 {
            exp[i] = exp[i - 255];
        }
        GfTables { exp, log }
    })
}

#[inline]
pub fn gf_add(a: u8, b: u8) -> u8 {
    a ^ b
}

pub fn gf_mul(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    let t = tables();
    t.exp[t.log[a as usize] as usize + t.log[b as usize] as usize]
}

/// α^power for power in 0..=254.
pub fn gf_exp(power: usize) -> u8 {
    tables().exp[power % 255]
}

/// Discrete log base α. Undefined for zero; callers must not pass it.
pub fn gf_log(a: u8) -> usize {
    tables().log[a as usize] as usize
}

pub fn gf_inv(a: u8) -> u8 {
    let t = tables();
    t.exp[255 - t.log[a as usize] as usize]
}

pub fn gf_div(a: u8, b: u8) -> u8 {
    if a == 0 {
        return 0;
    }
    gf_mul(a, gf_inv(b))
}

/// Evaluate a polynomial with descending-order coefficients at x (Horner).
pub fn poly_eval(poly: &[u8], x: u8) -> u8 {
    let mut y = 0u8;
    for &coeff in poly {
        y = gf_add(gf_mul(y, x), coeff);
    }
    y
}

/// Multiply two polynomials with descending-order coefficients.
pub fn poly_mul(a: &[u8], b: &[u8]) -> Vec<u8> {
    let mut out = vec![0u8; a.len() + b.len() - 1];
    for (i, &ca) in a.iter().enumerate() {
        for (j, &cb) in b.iter().enumerate() {
            out[i + j] ^= gf_mul(ca, cb);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_is_xor() {
        assert_eq!(gf_add(0x53, 0xCA), 0x99);
        assert_eq!(gf_add(7, 7), 0);
    }

    #[test]
    fn mul_identities() {
        for a in 0..=255u8 {
            assert_eq!(gf_mul(a, 1), a);
            assert_eq!(gf_mul(a, 0), 0);
            assert_eq!(gf_mul(0, a), 0);
        }
    }

    #[test]
    fn mul_known_value() {
        // 2 * 0x80 wraps through the primitive polynomial: 0x100 ^ 0x11D = 0x1D.
        assert_eq!(gf_mul(2, 0x80), 0x1D);
    }

    #[test]
    fn mul_commutative() {
        for a in [3u8, 29, 127, 200, 255] {
            for b in [5u8, 17, 99, 180, 254] {
                assert_eq!(gf_mul(a, b), gf_mul(b, a));
            }
        }
    }

    #[test]
    fn inverse_roundtrip() {
        for a in 1..=255u8 {
            assert_eq!(gf_mul(a, gf_inv(a)), 1);
        }
    }

    #[test]
    fn div_inverts_mul() {
        for a in [1u8, 42, 133, 254] {
            for b in [1u8, 7, 99, 255] {
                assert_eq!(gf_div(gf_mul(a, b), b), a);
            }
        }
    }

    #[test]
    fn exp_log_roundtrip() {
        for p in 0..255usize {
            assert_eq!(gf_log(gf_exp(p)), p);
        }
    }

    #[test]
    fn poly_eval_descending() {
        // x^2 + 2x + 3 at x = 2: 4 ^ 4 ^ 3 = 3.
        assert_eq!(poly_eval(&[1, 2, 3], 2), 3);
        // Constant polynomial.
        assert_eq!(poly_eval(&[7], 0xAB), 7);
    }

    #[test]
    fn poly_mul_degrees_add() {
        let p = poly_mul(&[1, 1], &[1, 2]); // (x+1)(x+2) = x^2 + 3x + 2
        assert_eq!(p, vec![1, 3, 2]);
    }
}
