// Copyright (c) 2026 Stegstr
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/brunkstr/stegstr

//! Error types for the embed/detect pipeline.
//!
//! Integrity failures during detection ("no payload here") are not errors;
//! they surface as `Ok(None)` from the facade. [`CodecError`] covers the
//! genuinely exceptional paths.

use core::fmt;

/// Errors that can occur while embedding or detecting a payload.
#[derive(Debug)]
pub enum CodecError {
    /// The cover image bytes could not be decoded, or the decoded image is
    /// unusable (e.g. smaller than one 8x8 block).
    InvalidImage(String),
    /// The payload needs more coefficient slots than the cover provides.
    PayloadTooLarge {
        needed_bits: usize,
        available_bits: usize,
    },
    /// A configuration value is out of its valid range.
    InvalidOptions(&'static str),
    /// The operation was cancelled by the caller.
    Cancelled,
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidImage(msg) => write!(f, "invalid cover image: {msg}"),
            Self::PayloadTooLarge {
                needed_bits,
                available_bits,
            } => write!(
                f,
                "payload too large: needs {needed_bits} coefficient bits, image provides {available_bits}"
            ),
            Self::InvalidOptions(msg) => write!(f, "invalid options: {msg}"),
            Self::Cancelled => write!(f, "operation cancelled by caller"),
        }
    }
}

impl std::error::Error for CodecError {}

impl From<image::ImageError> for CodecError {
    fn from(e: image::ImageError) -> Self {
        Self::InvalidImage(e.to_string())
    }
}
