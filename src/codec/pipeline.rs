// Copyright (c) 2026 Stegstr
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/brunkstr/stegstr

//! Embed/detect orchestration.
//!
//! The pipeline emulates what a JPEG encoder stores for each touched
//! 8x8 luminance block: level shift, forward DCT, division by the
//! quality-scaled quantization table. QIM operates in that quantized
//! coefficient domain, so the modulation lines up with the grid the
//! sharing platform's re-encode will snap coefficients back onto.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::codec::container::{resize_for_target, ImageContainer, PixelCodec, PixelImage};
use crate::codec::error::CodecError;
use crate::codec::framing;
use crate::codec::luma::{apply_luma_delta, block_luma, luma_plane};
use crate::codec::options::CodecOptions;
use crate::codec::progress;
use crate::codec::qim::{qim_detect, qim_embed};
use crate::codec::stream;
use crate::dct::{forward_dct_8x8, inverse_dct_8x8, dequantize, quant_table, quantize};
use crate::ecc;

/// Embed `payload` into `cover_bytes` using the default `image`-crate
/// container. Output is a JPEG at `opts.quality`.
pub fn embed(cover_bytes: &[u8], payload: &[u8], opts: &CodecOptions) -> Result<Vec<u8>, CodecError> {
    embed_with_codec(&ImageContainer, cover_bytes, payload, opts)
}

/// Detect and recover a payload from `image_bytes` using the default
/// container. `Ok(None)` means "no payload readable with these options".
pub fn detect(image_bytes: &[u8], opts: &CodecOptions) -> Result<Option<Vec<u8>>, CodecError> {
    detect_with_codec(&ImageContainer, image_bytes, opts)
}

/// [`embed`] with an explicit container collaborator.
pub fn embed_with_codec(
    codec: &dyn PixelCodec,
    cover_bytes: &[u8],
    payload: &[u8],
    opts: &CodecOptions,
) -> Result<Vec<u8>, CodecError> {
    opts.validate()?;

    let mut img = codec.decode(cover_bytes)?;
    if let Some(width) = opts.platform.target_width() {
        img = resize_for_target(&img, width);
    }

    let blocks_x = img.width / 8;
    let blocks_y = img.height / 8;
    if blocks_x == 0 || blocks_y == 0 {
        return Err(CodecError::InvalidImage(
            "smaller than one 8x8 block".into(),
        ));
    }

    // Capacity is checked before any pixel is touched.
    let bits = framing::frame(payload, opts)?;
    let available_bits = stream::stream_len(blocks_y, blocks_x);
    if bits.len() > available_bits {
        return Err(CodecError::PayloadTooLarge {
            needed_bits: bits.len(),
            available_bits,
        });
    }

    // Group the stream slots by block so each touched block goes through
    // the transform exactly once.
    let nblocks = (blocks_y * blocks_x) as usize;
    let mut writes: Vec<Vec<(usize, u8)>> = vec![Vec::new(); nblocks];
    for (i, &bit) in bits.iter().enumerate() {
        let pos = stream::position(i, blocks_y, blocks_x);
        let blk = (pos.block_row * blocks_x + pos.block_col) as usize;
        writes[blk].push((pos.natural_index(), bit));
    }

    let qt = quant_table(opts.quality);
    let plane = luma_plane(&img);

    let touched = writes.iter().filter(|w| !w.is_empty()).count() as u32;
    progress::init(touched);

    for (blk, block_writes) in writes.iter().enumerate() {
        if block_writes.is_empty() {
            continue;
        }
        progress::check_cancelled()?;

        let block_row = blk as u32 / blocks_x;
        let block_col = blk as u32 % blocks_x;

        let original = block_luma(&plane, img.width, block_row, block_col);
        let mut shifted = original;
        for v in &mut shifted {
            *v -= 128.0;
        }

        let coeffs = forward_dct_8x8(&shifted);
        let mut quantized = quantize(&coeffs, &qt);
        for &(natural, bit) in block_writes {
            quantized[natural] = qim_embed(quantized[natural], bit, opts.delta);
        }

        let restored = inverse_dct_8x8(&dequantize(&quantized, &qt));
        let mut delta = [0.0f64; 64];
        for i in 0..64 {
            delta[i] = restored[i] + 128.0 - original[i];
        }
        apply_luma_delta(&mut img, block_row, block_col, &delta);
        progress::advance();
    }

    progress::finish();
    codec.encode(&img, opts.quality)
}

/// [`detect`] with an explicit container collaborator.
pub fn detect_with_codec(
    codec: &dyn PixelCodec,
    image_bytes: &[u8],
    opts: &CodecOptions,
) -> Result<Option<Vec<u8>>, CodecError> {
    opts.validate()?;

    let img = codec.decode(image_bytes)?;
    let blocks_x = img.width / 8;
    let blocks_y = img.height / 8;
    if blocks_x == 0 || blocks_y == 0 {
        return Ok(None);
    }

    let coeffs = block_coefficients(&img, blocks_y, blocks_x, opts)?;

    let mut bits = Vec::with_capacity(stream::stream_len(blocks_y, blocks_x));
    let mut margins = Vec::with_capacity(bits.capacity());
    for i in 0..stream::stream_len(blocks_y, blocks_x) {
        let pos = stream::position(i, blocks_y, blocks_x);
        let blk = (pos.block_row * blocks_x + pos.block_col) as usize;
        let z = coeffs[blk][pos.natural_index()];
        let (bit, margin) = qim_detect(z, opts.delta);
        bits.push(bit);
        margins.push(margin);
    }

    let payload = framing::unframe(&bits, &margins, opts);
    progress::finish();
    Ok(payload)
}

/// Quantized-domain coefficients of every complete block. The hot loop of
/// detection; runs over rayon when the `parallel` feature is on.
///
/// Quantization here divides without rounding: the fractional position
/// within the quantization grid is exactly what QIM detection reads.
fn block_coefficients(
    img: &PixelImage,
    blocks_y: u32,
    blocks_x: u32,
    opts: &CodecOptions,
) -> Result<Vec<[f64; 64]>, CodecError> {
    let qt = quant_table(opts.quality);
    let plane = luma_plane(img);
    let nblocks = (blocks_y * blocks_x) as usize;

    progress::init(nblocks as u32);
    progress::check_cancelled()?;

    let transform = |blk: &usize| -> [f64; 64] {
        let block_row = *blk as u32 / blocks_x;
        let block_col = *blk as u32 % blocks_x;
        let mut block = block_luma(&plane, img.width, block_row, block_col);
        for v in &mut block {
            *v -= 128.0;
        }
        let coeffs = forward_dct_8x8(&block);
        let mut out = [0.0f64; 64];
        for i in 0..64 {
            out[i] = coeffs[i] / qt[i] as f64;
        }
        progress::advance();
        out
    };

    let block_indices: Vec<usize> = (0..nblocks).collect();
    #[cfg(feature = "parallel")]
    let coeffs: Vec<[f64; 64]> = block_indices.par_iter().map(transform).collect();
    #[cfg(not(feature = "parallel"))]
    let coeffs: Vec<[f64; 64]> = block_indices.iter().map(transform).collect();

    progress::check_cancelled()?;
    Ok(coeffs)
}

/// Largest payload (in stored bytes) that fits an image of the given
/// dimensions with these options.
///
/// Exact inverse of embed's bit accounting: binary search over the
/// chunked-RS frame length. With `compress` on, embed may accept more
/// than this for compressible payloads; the figure here is the
/// worst-case guarantee.
pub fn capacity_bytes(width: u32, height: u32, opts: &CodecOptions) -> Result<usize, CodecError> {
    opts.validate()?;

    let available = stream::stream_len(height / 8, width / 8);
    let overhead = crate::codec::options::MAGIC.len() + 4;

    let needed = |payload_len: usize| {
        opts.repeat * 8 * (2 + ecc::encoded_len(overhead + payload_len, opts.rs_nsym))
    };

    if needed(0) > available {
        return Ok(0);
    }

    // needed() is monotonic in payload_len; find the last fitting length.
    let mut lo = 0usize;
    let mut hi = available / (opts.repeat * 8) + 1;
    while lo < hi {
        let mid = lo + (hi - lo + 1) / 2;
        if needed(mid) <= available {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    Ok(lo)
}
