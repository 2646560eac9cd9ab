// Copyright (c) 2026 Stegstr
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/brunkstr/stegstr

//! Luminance plane extraction and RGB write-back.
//!
//! Embedding modulates Y only. The modification is written back by adding
//! the luminance delta equally to R, G and B, which leaves the chroma
//! components of the JPEG color transform unchanged and so preserves hue.

use crate::codec::container::PixelImage;

/// BT.601 luminance for one pixel.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> f64 {
    0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64
}

/// Full-image luminance plane, row-major f64.
pub fn luma_plane(img: &PixelImage) -> Vec<f64> {
    let mut plane = Vec::with_capacity((img.width * img.height) as usize);
    for chunk in img.data.chunks_exact(4) {
        plane.push(luma(chunk[0], chunk[1], chunk[2]));
    }
    plane
}

/// Copy the 8x8 luminance block at (block_row, block_col) out of the plane.
pub fn block_luma(plane: &[f64], width: u32, block_row: u32, block_col: u32) -> [f64; 64] {
    let mut block = [0.0f64; 64];
    let x0 = (block_col * 8) as usize;
    let y0 = (block_row * 8) as usize;
    for dy in 0..8 {
        let row_start = (y0 + dy) * width as usize + x0;
        block[dy * 8..dy * 8 + 8].copy_from_slice(&plane[row_start..row_start + 8]);
    }
    block
}

/// Apply a per-pixel luminance delta to the 8x8 block at
/// (block_row, block_col), adding it equally to R, G and B with rounding
/// and 0..=255 clamping. Alpha is untouched.
pub fn apply_luma_delta(img: &mut PixelImage, block_row: u32, block_col: u32, delta: &[f64; 64]) {
    let x0 = block_col * 8;
    let y0 = block_row * 8;
    for dy in 0..8u32 {
        for dx in 0..8u32 {
            let d = delta[(dy * 8 + dx) as usize];
            if d == 0.0 {
                continue;
            }
            let (r, g, b) = img.rgb(x0 + dx, y0 + dy);
            let shift = |c: u8| (c as f64 + d).round().clamp(0.0, 255.0) as u8;
            img.set_rgb(x0 + dx, y0 + dy, shift(r), shift(g), shift(b));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, r: u8, g: u8, b: u8) -> PixelImage {
        let mut data = Vec::with_capacity((width * height * 4) as usize);
        for _ in 0..width * height {
            data.extend_from_slice(&[r, g, b, 255]);
        }
        PixelImage::new(width, height, data)
    }

    #[test]
    fn luma_weights() {
        assert_eq!(luma(0, 0, 0), 0.0);
        assert!((luma(255, 255, 255) - 255.0).abs() < 1e-9);
        assert!((luma(255, 0, 0) - 0.299 * 255.0).abs() < 1e-9);
    }

    #[test]
    fn plane_matches_pixels() {
        let img = solid(16, 8, 100, 150, 200);
        let plane = luma_plane(&img);
        assert_eq!(plane.len(), 128);
        let expected = luma(100, 150, 200);
        assert!(plane.iter().all(|&y| (y - expected).abs() < 1e-9));
    }

    #[test]
    fn block_extraction_offsets() {
        // 16x16: 4 blocks; paint block (1,1) differently.
        let mut img = solid(16, 16, 10, 10, 10);
        for y in 8..16 {
            for x in 8..16 {
                img.set_rgb(x, y, 200, 200, 200);
            }
        }
        let plane = luma_plane(&img);
        let b00 = block_luma(&plane, 16, 0, 0);
        let b11 = block_luma(&plane, 16, 1, 1);
        assert!(b00.iter().all(|&y| (y - 10.0).abs() < 1e-9));
        assert!(b11.iter().all(|&y| (y - 200.0).abs() < 1e-9));
    }

    #[test]
    fn delta_shifts_all_channels_equally() {
        let mut img = solid(8, 8, 100, 120, 140);
        let delta = [5.4f64; 64];
        apply_luma_delta(&mut img, 0, 0, &delta);
        assert_eq!(img.rgb(0, 0), (105, 125, 145));
        assert_eq!(img.rgb(7, 7), (105, 125, 145));
    }

    #[test]
    fn delta_clamps_at_bounds() {
        let mut img = solid(8, 8, 250, 3, 128);
        let delta = [100.0f64; 64];
        apply_luma_delta(&mut img, 0, 0, &delta);
        assert_eq!(img.rgb(4, 4), (255, 103, 228));

        let mut img = solid(8, 8, 250, 3, 128);
        let delta = [-100.0f64; 64];
        apply_luma_delta(&mut img, 0, 0, &delta);
        assert_eq!(img.rgb(4, 4), (150, 0, 28));
    }

    #[test]
    fn zero_delta_is_noop() {
        let mut img = solid(8, 8, 1, 2, 3);
        let orig = img.clone();
        apply_luma_delta(&mut img, 0, 0, &[0.0; 64]);
        assert_eq!(img, orig);
    }
}
