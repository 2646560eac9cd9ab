// Copyright (c) 2026 Stegstr
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/brunkstr/stegstr

//! Frequency-domain primitives: 8×8 DCT, quantization tables, zigzag order.

pub mod engine;
pub mod quant;
pub mod zigzag;

pub use engine::{forward_dct_8x8, inverse_dct_8x8};
pub use quant::{dequantize, quant_table, quantize};
pub use zigzag::ZIGZAG_TO_NATURAL;
