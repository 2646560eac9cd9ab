// Copyright (c) 2026 Stegstr
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/brunkstr/stegstr

//! Forward error correction: GF(2^8) arithmetic and Reed-Solomon codes.

pub mod gf256;
pub mod rs;

pub use rs::{decode, encode, encoded_len, RsDecodeError};
