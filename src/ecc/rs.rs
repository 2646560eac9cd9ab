// Copyright (c) 2026 Stegstr
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/brunkstr/stegstr

//! Reed-Solomon error correction over GF(2^8).
//!
//! RS(255, 255-nsym) with primitive polynomial 0x11D and FCR=0. Systematic
//! encoding, Berlekamp-Massey decoding with Chien search and the Forney
//! algorithm, plus erasure handling via Forney-modified syndromes. Payloads
//! longer than one block are split into 255-symbol chunks; data shorter than
//! a full block uses a shortened code (virtual front zero-padding).

use crate::ecc::gf256::{gf_add, gf_exp, gf_inv, gf_mul, poly_eval, poly_mul};

/// Maximum RS block size for GF(2^8).
const N_MAX: usize = 255;

/// Error returned when RS decoding fails (too many errors or erasures).
#[derive(Debug, PartialEq, Eq)]
pub struct RsDecodeError;

impl core::fmt::Display for RsDecodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Reed-Solomon: too many errors to correct")
    }
}

impl std::error::Error for RsDecodeError {}

/// Generator polynomial g(x) = prod_{i=0}^{nsym-1} (x - alpha^i),
/// highest-degree coefficient first.
fn build_gen_poly(nsym: usize) -> Vec<u8> {
    let mut gpoly = vec![1u8];
    for i in 0..nsym {
        gpoly = poly_mul(&gpoly, &[1, gf_exp(i)]);
    }
    gpoly
}

/// RS-encode a single data block (systematic). `data.len() + nsym` must
/// not exceed 255.
fn encode_block(data: &[u8], gpoly: &[u8], nsym: usize) -> Vec<u8> {
    let mut shift_reg = vec![0u8; nsym];
    for &byte in data {
        let feedback = gf_add(byte, shift_reg[0]);
        for j in 0..nsym - 1 {
            shift_reg[j] = gf_add(shift_reg[j + 1], gf_mul(feedback, gpoly[j + 1]));
        }
        shift_reg[nsym - 1] = gf_mul(feedback, gpoly[nsym]);
    }

    let mut encoded = Vec::with_capacity(data.len() + nsym);
    encoded.extend_from_slice(data);
    encoded.extend_from_slice(&shift_reg);
    encoded
}

/// RS-encode an arbitrarily long payload with `nsym` parity symbols per
/// block, splitting into blocks of up to `255 - nsym` data symbols.
///
/// Returns the concatenation of all encoded blocks; the last block may be
/// a shortened code.
pub fn encode(payload: &[u8], nsym: usize) -> Vec<u8> {
    assert!((1..N_MAX).contains(&nsym), "nsym {nsym} out of range");
    let k_max = N_MAX - nsym;
    let gpoly = build_gen_poly(nsym);
    let mut encoded = Vec::with_capacity(encoded_len(payload.len(), nsym));
    if payload.is_empty() {
        encoded.extend_from_slice(&encode_block(payload, &gpoly, nsym));
        return encoded;
    }
    for chunk in payload.chunks(k_max) {
        encoded.extend_from_slice(&encode_block(chunk, &gpoly, nsym));
    }
    encoded
}

/// Encoded length for a given data length and parity count.
pub fn encoded_len(data_len: usize, nsym: usize) -> usize {
    let k_max = N_MAX - nsym;
    if data_len == 0 {
        return nsym;
    }
    let full_blocks = data_len / k_max;
    let remainder = data_len % k_max;
    let mut total = full_blocks * N_MAX;
    if remainder > 0 {
        total += remainder + nsym;
    }
    total
}

/// Syndromes S_0 .. S_{nsym-1} of a full 255-symbol block (FCR=0).
fn compute_syndromes(block: &[u8], nsym: usize) -> Vec<u8> {
    let mut syndromes = vec![0u8; nsym];
    for (i, s) in syndromes.iter_mut().enumerate() {
        *s = poly_eval(block, gf_exp(i));
    }
    syndromes
}

fn syndromes_are_zero(syndromes: &[u8]) -> bool {
    syndromes.iter().all(|&s| s == 0)
}

/// Forney-modified syndromes: annihilate the known erasure contributions
/// so Berlekamp-Massey only has to locate the unknown errors.
///
/// `erasure_gf_pos` holds GF positions (exponent of the locator α^p).
/// Only the first `nsym - erasures` entries of the result are meaningful.
fn forney_syndromes(syndromes: &[u8], erasure_gf_pos: &[usize]) -> Vec<u8> {
    let mut fsynd = syndromes.to_vec();
    for &p in erasure_gf_pos {
        let x = gf_exp(p);
        for j in 0..fsynd.len() - 1 {
            fsynd[j] = gf_add(gf_mul(fsynd[j], x), fsynd[j + 1]);
        }
    }
    fsynd
}

/// Berlekamp-Massey: error locator sigma(x) in ascending power,
/// sigma[0] = 1.
fn berlekamp_massey(syndromes: &[u8]) -> Vec<u8> {
    let n = syndromes.len();

    let mut c = vec![0u8; n + 1];
    c[0] = 1;
    let mut c_len = 1usize;

    let mut b = vec![0u8; n + 1];
    b[0] = 1;
    let mut b_len = 1usize;

    let mut ell = 0usize;
    let mut bval = 1u8;
    let mut m = 1usize;

    for r in 0..n {
        let mut delta = syndromes[r];
        for i in 1..c_len.min(r + 1) {
            delta = gf_add(delta, gf_mul(c[i], syndromes[r - i]));
        }

        if delta == 0 {
            m += 1;
            continue;
        }

        let factor = gf_mul(delta, gf_inv(bval));

        if 2 * ell <= r {
            let old_c = c.clone();
            let old_c_len = c_len;

            c_len = (b_len + m).max(c_len);
            for j in 0..b_len {
                c[j + m] = gf_add(c[j + m], gf_mul(factor, b[j]));
            }

            b[..old_c_len].copy_from_slice(&old_c[..old_c_len]);
            for slot in b.iter_mut().skip(old_c_len) {
                *slot = 0;
            }
            b_len = old_c_len;
            ell = r + 1 - ell;
            bval = delta;
            m = 1;
        } else {
            c_len = (b_len + m).max(c_len);
            for j in 0..b_len {
                c[j + m] = gf_add(c[j + m], gf_mul(factor, b[j]));
            }
            m += 1;
        }
    }

    c[..c_len].to_vec()
}

/// Evaluate an ascending-power polynomial at x.
fn eval_asc(poly: &[u8], x: u8) -> u8 {
    let mut result = 0u8;
    let mut x_pow = 1u8;
    for &coeff in poly {
        result = gf_add(result, gf_mul(coeff, x_pow));
        x_pow = gf_mul(x_pow, x);
    }
    result
}

/// Chien search over the full 255-symbol block. An errata at GF position p
/// sits at array index 254 - p; the locator has a root at α^{-p}.
///
/// Returns (gf_pos, array_pos) pairs, or None if the root count does not
/// match the locator degree.
fn chien_search(locator_asc: &[u8], n: usize) -> Option<Vec<(usize, usize)>> {
    let degree = locator_asc.len() - 1;
    let mut found = Vec::with_capacity(degree);

    for p in 0..n {
        let x = gf_exp((255 - (p % 255)) % 255);
        if eval_asc(locator_asc, x) == 0 {
            found.push((p, n - 1 - p));
        }
    }

    if found.len() != degree {
        return None;
    }
    Some(found)
}

/// Forney algorithm with FCR=0: e_l = X_l * Omega(X_l^{-1}) / Lambda'(X_l^{-1})
/// where Omega = S(x) * Lambda(x) mod x^{nsym}.
fn forney(locator_asc: &[u8], syndromes: &[u8], found: &[(usize, usize)]) -> Vec<u8> {
    let two_t = syndromes.len();

    let mut omega = vec![0u8; two_t];
    for i in 0..locator_asc.len().min(two_t) {
        for j in 0..two_t {
            if i + j < two_t {
                omega[i + j] = gf_add(omega[i + j], gf_mul(locator_asc[i], syndromes[j]));
            }
        }
    }

    // Formal derivative in GF(2^m): even-power terms vanish.
    let deriv_len = locator_asc.len().saturating_sub(1);
    let mut locator_prime = vec![0u8; deriv_len];
    for i in (1..locator_asc.len()).step_by(2) {
        locator_prime[i - 1] = locator_asc[i];
    }

    let mut magnitudes = Vec::with_capacity(found.len());
    for &(gf_pos, _) in found {
        let x_val = gf_exp(gf_pos);
        let x_inv = gf_exp((255 - (gf_pos % 255)) % 255);

        let omega_val = eval_asc(&omega, x_inv);
        let lp_val = eval_asc(&locator_prime, x_inv);

        if lp_val == 0 {
            magnitudes.push(0);
            continue;
        }
        magnitudes.push(gf_mul(x_val, gf_mul(omega_val, gf_inv(lp_val))));
    }

    magnitudes
}

/// Decode a single block. `erasure_positions` are local indices into
/// `received` whose symbols are treated as unreliable.
fn decode_block(
    received: &[u8],
    data_len: usize,
    nsym: usize,
    erasure_positions: &[usize],
) -> Result<(Vec<u8>, usize), RsDecodeError> {
    let block_len = received.len();
    debug_assert_eq!(block_len, data_len + nsym);

    if erasure_positions.len() > nsym {
        return Err(RsDecodeError);
    }

    let padding = N_MAX - block_len;
    let mut full_block = vec![0u8; N_MAX];
    full_block[padding..].copy_from_slice(received);

    // Erased symbols are zeroed before syndrome computation, so the errata
    // magnitude at each erasure is the original symbol value itself.
    let mut erasure_gf_pos = Vec::with_capacity(erasure_positions.len());
    for &local in erasure_positions {
        if local >= block_len {
            return Err(RsDecodeError);
        }
        let array_pos = padding + local;
        full_block[array_pos] = 0;
        erasure_gf_pos.push(N_MAX - 1 - array_pos);
    }

    let syndromes = compute_syndromes(&full_block, nsym);
    if syndromes_are_zero(&syndromes) {
        return Ok((full_block[padding..padding + data_len].to_vec(), 0));
    }

    let num_erasures = erasure_gf_pos.len();

    // Locate the unknown errors on the erasure-adjusted syndromes.
    let fsynd = forney_syndromes(&syndromes, &erasure_gf_pos);
    let sigma_asc = berlekamp_massey(&fsynd[..nsym - num_erasures]);
    let num_errors = sigma_asc.len() - 1;

    if 2 * num_errors + num_erasures > nsym {
        return Err(RsDecodeError);
    }

    // Errata locator = error locator * erasure locator.
    let mut gamma_asc = vec![1u8];
    for &p in &erasure_gf_pos {
        gamma_asc = poly_mul(&gamma_asc, &[1, gf_exp(p)]);
    }
    let errata_asc = poly_mul(&sigma_asc, &gamma_asc);

    let found = chien_search(&errata_asc, N_MAX).ok_or(RsDecodeError)?;
    let magnitudes = forney(&errata_asc, &syndromes, &found);

    let mut corrected = full_block;
    for (i, &(_, array_pos)) in found.iter().enumerate() {
        if array_pos < padding {
            // Errata in the virtual zero-padded region of a shortened code.
            return Err(RsDecodeError);
        }
        corrected[array_pos] = gf_add(corrected[array_pos], magnitudes[i]);
    }

    let check = compute_syndromes(&corrected, nsym);
    if !syndromes_are_zero(&check) {
        return Err(RsDecodeError);
    }

    Ok((corrected[padding..padding + data_len].to_vec(), num_errors))
}

/// RS-decode a payload encoded with [`encode`].
///
/// `erasures` holds byte positions into `encoded` whose symbols should be
/// treated as erased (location known, value unknown); they are routed to
/// the block that contains them. Corrects up to `nsym` erasures, or any
/// mix with `2*errors + erasures <= nsym`, per block.
///
/// Returns the decoded payload and the total number of unknown-position
/// errors corrected across all blocks.
pub fn decode(
    encoded: &[u8],
    data_len: usize,
    nsym: usize,
    erasures: &[usize],
) -> Result<(Vec<u8>, usize), RsDecodeError> {
    assert!((1..N_MAX).contains(&nsym), "nsym {nsym} out of range");
    if encoded.len() != encoded_len(data_len, nsym) {
        return Err(RsDecodeError);
    }

    let k_max = N_MAX - nsym;
    let mut decoded = Vec::with_capacity(data_len);
    let mut remaining = data_len;
    let mut offset = 0;
    let mut total_errors = 0;

    loop {
        let chunk_data_len = remaining.min(k_max);
        let block_len = chunk_data_len + nsym;

        let block = &encoded[offset..offset + block_len];
        let local_erasures: Vec<usize> = erasures
            .iter()
            .filter(|&&p| p >= offset && p < offset + block_len)
            .map(|&p| p - offset)
            .collect();

        let (data, errors) = decode_block(block, chunk_data_len, nsym, &local_erasures)?;
        decoded.extend_from_slice(&data);
        total_errors += errors;

        offset += block_len;
        remaining -= chunk_data_len;
        if remaining == 0 {
            break;
        }
    }

    Ok((decoded, total_errors))
}
