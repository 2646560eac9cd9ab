// Copyright (c) 2026 Stegstr
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/brunkstr/stegstr

//! Pixel container collaborator.
//!
//! The pipeline works on raw RGBA8 planes; parsing and re-encoding the
//! surrounding file format is delegated to a [`PixelCodec`]. The default
//! implementation wraps the `image` crate and re-encodes as JPEG at the
//! configured quality.

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{ExtendedColorType, ImageEncoder, RgbaImage};

use crate::codec::error::CodecError;

/// An RGBA8 pixel buffer, row-major, 4 bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelImage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl PixelImage {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), (width * height * 4) as usize);
        Self {
            width,
            height,
            data,
        }
    }

    /// RGB of the pixel at (x, y).
    #[inline]
    pub fn rgb(&self, x: u32, y: u32) -> (u8, u8, u8) {
        let i = ((y * self.width + x) * 4) as usize;
        (self.data[i], self.data[i + 1], self.data[i + 2])
    }

    #[inline]
    pub fn set_rgb(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8) {
        let i = ((y * self.width + x) * 4) as usize;
        self.data[i] = r;
        self.data[i + 1] = g;
        self.data[i + 2] = b;
    }
}

/// Decodes cover bytes into pixels and re-encodes stego pixels into bytes.
pub trait PixelCodec {
    fn decode(&self, bytes: &[u8]) -> Result<PixelImage, CodecError>;
    fn encode(&self, image: &PixelImage, quality: u8) -> Result<Vec<u8>, CodecError>;
}

/// Default [`PixelCodec`] backed by the `image` crate. Accepts any format
/// the crate can sniff; output is always JPEG.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageContainer;

impl PixelCodec for ImageContainer {
    fn decode(&self, bytes: &[u8]) -> Result<PixelImage, CodecError> {
        let decoded = image::load_from_memory(bytes)?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(PixelImage::new(width, height, rgba.into_raw()))
    }

    fn encode(&self, img: &PixelImage, quality: u8) -> Result<Vec<u8>, CodecError> {
        let rgba = RgbaImage::from_raw(img.width, img.height, img.data.clone())
            .ok_or_else(|| CodecError::InvalidImage("pixel buffer size mismatch".into()))?;
        // JPEG has no alpha channel.
        let rgb = image::DynamicImage::ImageRgba8(rgba).to_rgb8();

        let mut out = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut out, quality);
        encoder.write_image(rgb.as_raw(), img.width, img.height, ExtendedColorType::Rgb8)?;
        Ok(out)
    }
}

/// Downscale to the platform's width when the image is wider, preserving
/// aspect ratio, then crop both dimensions down to multiples of 8 so the
/// resampled image is all complete blocks.
///
/// Images already at or under `target_width` pass through untouched.
pub fn resize_for_target(img: &PixelImage, target_width: u32) -> PixelImage {
    if img.width <= target_width {
        return img.clone();
    }

    let new_width = target_width;
    let new_height =
        ((img.height as u64 * target_width as u64 + img.width as u64 / 2) / img.width as u64) as u32;
    let new_height = new_height.max(1);

    let src = RgbaImage::from_raw(img.width, img.height, img.data.clone())
        .unwrap_or_else(|| RgbaImage::new(img.width, img.height));
    let resized = image::imageops::resize(&src, new_width, new_height, FilterType::Lanczos3);

    let crop_w = (new_width / 8) * 8;
    let crop_h = (new_height / 8) * 8;
    let cropped = image::imageops::crop_imm(&resized, 0, 0, crop_w.max(8), crop_h.max(8)).to_image();

    let (w, h) = cropped.dimensions();
    PixelImage::new(w, h, cropped.into_raw())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> PixelImage {
        let mut data = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                data.push((x % 256) as u8);
                data.push((y % 256) as u8);
                data.push(((x + y) % 256) as u8);
                data.push(255);
            }
        }
        PixelImage::new(width, height, data)
    }

    #[test]
    fn rgb_accessors_roundtrip() {
        let mut img = gradient(16, 16);
        img.set_rgb(3, 7, 10, 20, 30);
        assert_eq!(img.rgb(3, 7), (10, 20, 30));
    }

    #[test]
    fn jpeg_roundtrip_preserves_dimensions() {
        let img = gradient(64, 48);
        let codec = ImageContainer;
        let bytes = codec.encode(&img, 90).unwrap();
        let back = codec.decode(&bytes).unwrap();
        assert_eq!(back.width, 64);
        assert_eq!(back.height, 48);
    }

    #[test]
    fn decode_garbage_is_invalid_image() {
        let codec = ImageContainer;
        match codec.decode(b"not an image at all") {
            Err(CodecError::InvalidImage(_)) => {}
            other => panic!("expected InvalidImage, got {other:?}"),
        }
    }

    #[test]
    fn resize_skips_narrow_images() {
        let img = gradient(100, 60);
        let out = resize_for_target(&img, 1080);
        assert_eq!(out, img);
    }

    #[test]
    fn resize_downscales_and_crops_to_blocks() {
        let img = gradient(2000, 1100);
        let out = resize_for_target(&img, 1080);
        assert_eq!(out.width, 1080);
        // 1100 * 1080 / 2000 = 594, cropped to 592.
        assert_eq!(out.height, 592);
        assert_eq!(out.width % 8, 0);
        assert_eq!(out.height % 8, 0);
    }

    #[test]
    fn resize_exact_width_passes_through() {
        let img = gradient(1080, 700);
        let out = resize_for_target(&img, 1080);
        assert_eq!(out, img);
    }
}
