// Copyright (c) 2026 Stegstr
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/brunkstr/stegstr

//! Payload framing: magic/length header, deflate, Reed-Solomon coding,
//! bit repetition and the majority-vote unframing path.
//!
//! Wire format of the raw frame: `"STEGSTR" || length(u32 BE) || stored
//! payload` where the stored payload is deflated when `compress` is on.
//! The frame is RS-encoded, prefixed with the codeword length (u16 BE),
//! and every bit of the result is repeated `repeat` times in the
//! coefficient stream.

use std::io::{Read, Write};

use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;

use crate::codec::error::CodecError;
use crate::codec::options::{CodecOptions, MAGIC};
use crate::ecc;

/// Codeword length prefix is a u16, so a codeword caps at 65535 bytes.
const MAX_CODEWORD_LEN: usize = u16::MAX as usize;

/// Upper bound on inflated payload size (decompression bomb guard).
const INFLATE_LIMIT: u64 = 64 * 1024 * 1024;

/// Expand bytes to bits, most significant bit first.
pub fn bytes_to_bits(bytes: &[u8]) -> Vec<u8> {
    let mut bits = Vec::with_capacity(bytes.len() * 8);
    for &byte in bytes {
        for shift in (0..8).rev() {
            bits.push((byte >> shift) & 1);
        }
    }
    bits
}

/// Pack bits (MSB first) back into bytes. Trailing bits that do not fill
/// a whole byte are dropped.
pub fn bits_to_bytes(bits: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(bits.len() / 8);
    for chunk in bits.chunks_exact(8) {
        let mut byte = 0u8;
        for &bit in chunk {
            byte = (byte << 1) | (bit & 1);
        }
        bytes.push(byte);
    }
    bytes
}

fn deflate(data: &[u8]) -> Vec<u8> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    // Writing into a Vec cannot fail.
    encoder
        .write_all(data)
        .and_then(|_| encoder.finish())
        .expect("deflate into memory should not fail")
}

fn inflate(data: &[u8]) -> Option<Vec<u8>> {
    let mut out = Vec::new();
    DeflateDecoder::new(data)
        .take(INFLATE_LIMIT)
        .read_to_end(&mut out)
        .ok()?;
    Some(out)
}

/// Build the embedded bitstream for a payload.
///
/// Fails only when the payload is so large its codeword overflows the
/// u16 length prefix; capacity against a concrete image is the
/// pipeline's check.
pub fn frame(payload: &[u8], opts: &CodecOptions) -> Result<Vec<u8>, CodecError> {
    let stored = if opts.compress {
        deflate(payload)
    } else {
        payload.to_vec()
    };
    if stored.len() > u32::MAX as usize {
        return Err(CodecError::InvalidOptions("payload longer than 4 GiB"));
    }

    let mut raw = Vec::with_capacity(MAGIC.len() + 4 + stored.len());
    raw.extend_from_slice(MAGIC);
    raw.extend_from_slice(&(stored.len() as u32).to_be_bytes());
    raw.extend_from_slice(&stored);

    let codeword = ecc::encode(&raw, opts.rs_nsym);
    if codeword.len() > MAX_CODEWORD_LEN {
        return Err(CodecError::PayloadTooLarge {
            needed_bits: opts.repeat * 8 * (2 + codeword.len()),
            available_bits: opts.repeat * 8 * (2 + MAX_CODEWORD_LEN),
        });
    }

    let mut framed = Vec::with_capacity(2 + codeword.len());
    framed.extend_from_slice(&(codeword.len() as u16).to_be_bytes());
    framed.extend_from_slice(&codeword);

    let bits = bytes_to_bits(&framed);
    let mut repeated = Vec::with_capacity(bits.len() * opts.repeat);
    for bit in bits {
        for _ in 0..opts.repeat {
            repeated.push(bit);
        }
    }
    Ok(repeated)
}

/// Collapse repeated raw bits by majority vote.
///
/// A 50/50 split votes 1 (even repeat counts only; kept for
/// compatibility with existing senders). The vote margin of a bit is the
/// mean detection margin of its repeat group.
pub fn majority_vote(raw_bits: &[u8], raw_margins: &[f64], repeat: usize) -> (Vec<u8>, Vec<f64>) {
    let groups = raw_bits.len() / repeat;
    let mut bits = Vec::with_capacity(groups);
    let mut margins = Vec::with_capacity(groups);
    for g in 0..groups {
        let span = g * repeat..(g + 1) * repeat;
        let ones: usize = raw_bits[span.clone()].iter().map(|&b| b as usize).sum();
        bits.push(u8::from(ones * 2 >= repeat));
        margins.push(raw_margins[span].iter().sum::<f64>() / repeat as f64);
    }
    (bits, margins)
}

/// How a codeword is handed to the RS decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeAttempt {
    /// Low-margin bytes marked as erasures.
    WithErasures,
    /// Plain errors-only decoding.
    Blind,
}

/// Invert [`ecc::encoded_len`]: the data length whose codeword is exactly
/// `codeword_len` bytes, or None when no such length exists.
fn frame_len_for_codeword(codeword_len: usize, nsym: usize) -> Option<usize> {
    let full = codeword_len / 255;
    let rem = codeword_len % 255;
    let data_len = if rem == 0 {
        codeword_len.checked_sub(nsym * full)?
    } else if rem > nsym {
        codeword_len.checked_sub(nsym * (full + 1))?
    } else {
        return None;
    };
    if ecc::encoded_len(data_len, nsym) == codeword_len {
        Some(data_len)
    } else {
        None
    }
}

/// Recover the payload from a detected raw bitstream.
///
/// `raw_margins` are the per-coefficient detection margins, parallel to
/// `raw_bits`. Any integrity failure (short stream, implausible lengths,
/// uncorrectable codeword, bad magic, inflate failure) returns None.
pub fn unframe(raw_bits: &[u8], raw_margins: &[f64], opts: &CodecOptions) -> Option<Vec<u8>> {
    debug_assert_eq!(raw_bits.len(), raw_margins.len());

    let (bits, bit_margins) = majority_vote(raw_bits, raw_margins, opts.repeat);
    if bits.len() < 16 {
        return None;
    }

    let len_bytes = bits_to_bytes(&bits[..16]);
    let codeword_len = u16::from_be_bytes([len_bytes[0], len_bytes[1]]) as usize;
    if codeword_len == 0 || bits.len() < 16 + codeword_len * 8 {
        return None;
    }

    let codeword = bits_to_bytes(&bits[16..16 + codeword_len * 8]);
    let frame_len = frame_len_for_codeword(codeword_len, opts.rs_nsym)?;

    // Per-byte confidence: the weakest of a byte's eight bit votes.
    // Bytes under the threshold become erasures, doubling what RS can fix
    // at those positions.
    let threshold = opts.erasure_threshold();
    let mut erasures = Vec::new();
    for i in 0..codeword_len {
        let start = 16 + i * 8;
        let byte_margin = bit_margins[start..start + 8]
            .iter()
            .cloned()
            .fold(f64::INFINITY, f64::min);
        if byte_margin < threshold {
            erasures.push(i);
        }
    }

    let attempts: &[DecodeAttempt] = if erasures.is_empty() {
        &[DecodeAttempt::Blind]
    } else {
        &[DecodeAttempt::WithErasures, DecodeAttempt::Blind]
    };

    let mut raw = None;
    for attempt in attempts {
        let hints: &[usize] = match attempt {
            DecodeAttempt::WithErasures => &erasures,
            DecodeAttempt::Blind => &[],
        };
        if let Ok((decoded, _)) = ecc::decode(&codeword, frame_len, opts.rs_nsym, hints) {
            raw = Some(decoded);
            break;
        }
    }
    let raw = raw?;

    if raw.len() < MAGIC.len() + 4 || &raw[..MAGIC.len()] != MAGIC {
        return None;
    }
    let stored_len =
        u32::from_be_bytes([raw[7], raw[8], raw[9], raw[10]]) as usize;
    let stored = raw.get(MAGIC.len() + 4..)?;
    if stored.len() != stored_len {
        return None;
    }

    if opts.compress {
        inflate(stored)
    } else {
        Some(stored.to_vec())
    }
}
