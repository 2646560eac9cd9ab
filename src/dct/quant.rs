// Copyright (c) 2026 Stegstr
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/brunkstr/stegstr

//! JPEG luminance quantization tables and coefficient (de)quantization.

/// ITU-T T.81 Annex K base luminance quantization table, natural order.
pub const BASE_LUMA_QT: [u16; 64] = [
    16, 11, 10, 16, 24, 40, 51, 61, //
    12, 12, 14, 19, 26, 58, 60, 55, //
    14, 13, 16, 24, 40, 57, 69, 56, //
    14, 17, 22, 29, 51, 87, 80, 62, //
    18, 22, 37, 56, 68, 109, 103, 77, //
    24, 35, 55, 64, 81, 104, 113, 92, //
    49, 64, 78, 87, 103, 121, 120, 101, //
    72, 92, 95, 98, 112, 100, 103, 99, //
];

/// Luminance quantization table for a JPEG quality factor in 1..=100.
///
/// Uses the libjpeg quality scaling curve: below 50 the base table is
/// scaled up steeply, above 50 it is scaled down linearly. Every entry
/// is clamped to 1..=255.
pub fn quant_table(quality: u8) -> [u16; 64] {
    let q = quality.clamp(1, 100) as u32;
    let scale = if q < 50 { 5000 / q } else { 200 - 2 * q };
    let mut table = [0u16; 64];
    for i in 0..64 {
        let v = (BASE_LUMA_QT[i] as u32 * scale + 50) / 100;
        table[i] = v.clamp(1, 255) as u16;
    }
    table
}

/// Divide each DCT coefficient by its table entry and round to the
/// nearest integer, half away from zero.
pub fn quantize(coeffs: &[f64; 64], table: &[u16; 64]) -> [f64; 64] {
    let mut out = [0.0f64; 64];
    for i in 0..64 {
        out[i] = (coeffs[i] / table[i] as f64).round();
    }
    out
}

/// Multiply each quantized coefficient back by its table entry.
pub fn dequantize(quantized: &[f64; 64], table: &[u16; 64]) -> [f64; 64] {
    let mut out = [0.0f64; 64];
    for i in 0..64 {
        out[i] = quantized[i] * table[i] as f64;
    }
    out
}
