// Copyright (c) 2026 Stegstr
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/brunkstr/stegstr

//! Steganographic transport layer: framing, QIM modulation and the
//! embed/detect pipeline.

pub mod container;
pub mod error;
pub mod framing;
pub mod luma;
pub mod options;
pub mod pipeline;
pub mod progress;
pub mod qim;
pub mod stream;

pub use container::{resize_for_target, ImageContainer, PixelCodec, PixelImage};
pub use error::CodecError;
pub use options::{CodecOptions, Platform, MAGIC};
pub use pipeline::{capacity_bytes, detect, detect_with_codec, embed, embed_with_codec};
