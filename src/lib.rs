// Copyright (c) 2026 Stegstr
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/brunkstr/stegstr

//! # stegstr-codec
//!
//! DCT-domain steganographic transport codec. Embeds an arbitrary binary
//! blob into a cover image so it can still be recovered after the image
//! has been re-encoded as JPEG or run through a sharing platform's
//! recompression.
//!
//! The channel is built from four layers:
//!
//! - **QIM** modulation of quantized 8x8 DCT luminance coefficients,
//!   with a per-coefficient confidence margin on readback.
//! - **Repetition** of every bit with majority voting.
//! - **Reed-Solomon** coding over GF(2^8), with low-confidence bytes
//!   handed to the decoder as erasures.
//! - **Framing**: magic + length header, optionally deflated payload.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use stegstr_codec::{embed, detect, CodecOptions};
//!
//! let cover = std::fs::read("photo.png").unwrap();
//! let opts = CodecOptions::default();
//! let stego_jpeg = embed(&cover, b"hidden payload", &opts).unwrap();
//! let recovered = detect(&stego_jpeg, &opts).unwrap();
//! assert_eq!(recovered.as_deref(), Some(&b"hidden payload"[..]));
//! ```

pub mod codec;
pub mod dct;
pub mod ecc;

pub use codec::progress;
pub use codec::{capacity_bytes, detect, detect_with_codec, embed, embed_with_codec};
pub use codec::{CodecError, CodecOptions, Platform, MAGIC};
pub use codec::{ImageContainer, PixelCodec, PixelImage};
