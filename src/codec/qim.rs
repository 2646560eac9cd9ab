// Copyright (c) 2026 Stegstr
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/brunkstr/stegstr

//! Quantization index modulation on a single coefficient.
//!
//! A bit is embedded by snapping the coefficient to the nearest multiple
//! of `delta` and offsetting by a quarter step: down for 0, up for 1.
//! Detection recomputes the cell and picks the nearer of the two
//! reconstruction levels; the distance gap between them is the confidence
//! margin. Perturbations under `delta / 4` minus the integer rounding
//! slack cannot flip a bit.

/// Embed one bit into coefficient value `x`.
///
/// The result is rounded (half away from zero) so it can be stored as an
/// integer JPEG coefficient.
pub fn qim_embed(x: f64, bit: u8, delta: f64) -> f64 {
    let cell = (x / delta).round() * delta;
    let offset = if bit == 0 { -delta / 4.0 } else { delta / 4.0 };
    (cell + offset).round()
}

/// Detect the bit carried by coefficient value `z`.
///
/// Returns `(bit, margin)`; `margin` is the absolute difference between
/// the distances to the two reconstruction levels (0 at the decision
/// boundary, `delta / 2` for a pristine embed). Equidistant reads resolve
/// to bit 0.
pub fn qim_detect(z: f64, delta: f64) -> (u8, f64) {
    let cell = (z / delta).round() * delta;
    let d0 = (z - (cell - delta / 4.0)).abs();
    let d1 = (z - (cell + delta / 4.0)).abs();
    let bit = if d0 <= d1 { 0 } else { 1 };
    (bit, (d0 - d1).abs())
}
