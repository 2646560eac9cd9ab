// Copyright (c) 2026 Stegstr
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/brunkstr/stegstr

//! Codec configuration and the platform pre-resize table.

use crate::codec::error::CodecError;

/// Frame magic, recognizable in a recovered byte stream.
pub const MAGIC: &[u8; 7] = b"STEGSTR";

/// Sharing platform the stego image is destined for. Each platform
/// recompresses uploads to a known maximum width; pre-resizing to that
/// width keeps the platform from resampling (and destroying) the
/// embedded coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// No pre-resize.
    None,
    Instagram,
    Imessage,
    Twitter,
    WhatsappStandard,
    TelegramPhoto,
    Facebook,
    WhatsappHd,
}

impl Platform {
    /// Maximum width the platform preserves, or `None` for no resize.
    pub fn target_width(self) -> Option<u32> {
        match self {
            Platform::None => None,
            Platform::Instagram => Some(1080),
            Platform::Imessage => Some(1280),
            Platform::Twitter => Some(1600),
            Platform::WhatsappStandard => Some(1600),
            Platform::TelegramPhoto => Some(1920),
            Platform::Facebook => Some(2048),
            Platform::WhatsappHd => Some(4096),
        }
    }
}

/// Tunable parameters for embedding and detection.
///
/// Both sides of a transfer must agree on `quality`, `delta`, `repeat`,
/// `rs_nsym` and `compress`; a mismatch reads as "no payload".
#[derive(Debug, Clone)]
pub struct CodecOptions {
    /// JPEG quality factor used for the quantization table and the
    /// re-encoded output, 1..=100.
    pub quality: u8,
    /// QIM step size in dequantized-coefficient units.
    pub delta: f64,
    /// Times each bit is repeated in the coefficient stream (odd values
    /// avoid 50/50 votes).
    pub repeat: usize,
    /// Reed-Solomon parity symbols per 255-byte block, 1..=254.
    pub rs_nsym: usize,
    /// Deflate the payload before framing.
    pub compress: bool,
    /// Optional platform pre-resize before embedding.
    pub platform: Platform,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            quality: 75,
            delta: 14.0,
            repeat: 5,
            rs_nsym: 128,
            compress: true,
            platform: Platform::None,
        }
    }
}

impl CodecOptions {
    /// Check every field against its valid range. Called at each facade
    /// entry point so bad values fail loudly instead of corrupting output.
    pub fn validate(&self) -> Result<(), CodecError> {
        if self.quality == 0 || self.quality > 100 {
            return Err(CodecError::InvalidOptions("quality must be in 1..=100"));
        }
        if !self.delta.is_finite() || self.delta <= 0.0 {
            return Err(CodecError::InvalidOptions("delta must be positive"));
        }
        if self.repeat == 0 {
            return Err(CodecError::InvalidOptions("repeat must be at least 1"));
        }
        if self.rs_nsym == 0 || self.rs_nsym > 254 {
            return Err(CodecError::InvalidOptions("rs_nsym must be in 1..=254"));
        }
        Ok(())
    }

    /// QIM margin below which a detected byte is treated as an RS erasure.
    pub fn erasure_threshold(&self) -> f64 {
        self.delta / 6.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(CodecOptions::default().validate().is_ok());
    }

    #[test]
    fn bad_fields_rejected() {
        let mut opts = CodecOptions::default();
        opts.quality = 0;
        assert!(opts.validate().is_err());

        let mut opts = CodecOptions::default();
        opts.quality = 101;
        assert!(opts.validate().is_err());

        let mut opts = CodecOptions::default();
        opts.delta = 0.0;
        assert!(opts.validate().is_err());

        let mut opts = CodecOptions::default();
        opts.delta = f64::NAN;
        assert!(opts.validate().is_err());

        let mut opts = CodecOptions::default();
        opts.repeat = 0;
        assert!(opts.validate().is_err());

        let mut opts = CodecOptions::default();
        opts.rs_nsym = 255;
        assert!(opts.validate().is_err());
    }

    #[test]
    fn platform_widths() {
        assert_eq!(Platform::None.target_width(), None);
        assert_eq!(Platform::Instagram.target_width(), Some(1080));
        assert_eq!(Platform::WhatsappHd.target_width(), Some(4096));
        assert_eq!(
            Platform::Twitter.target_width(),
            Platform::WhatsappStandard.target_width()
        );
    }

    #[test]
    fn erasure_threshold_scales_with_delta() {
        let opts = CodecOptions::default();
        assert!((opts.erasure_threshold() - 14.0 / 6.0).abs() < 1e-12);
    }
}
