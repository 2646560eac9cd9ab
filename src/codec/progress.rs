// Copyright (c) 2026 Stegstr
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/brunkstr/stegstr

//! Global embed/detect progress tracking.
//!
//! Uses atomics so it is safe to call from rayon worker threads. The
//! frontend polls [`get`] for a progress bar and calls [`cancel`] to
//! abort a long-running pass.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use super::error::CodecError;

static STEP: AtomicU32 = AtomicU32::new(0);
static TOTAL: AtomicU32 = AtomicU32::new(0);
static CANCELLED: AtomicBool = AtomicBool::new(false);

/// Reset progress to 0 and set the total step count.
/// Also resets the cancellation flag so a fresh operation starts clean.
pub fn init(total: u32) {
    CANCELLED.store(false, Ordering::Relaxed);
    STEP.store(0, Ordering::Relaxed);
    TOTAL.store(total, Ordering::Relaxed);
}

/// Request cancellation of the current operation.
///
/// The pipeline checks this flag at block-loop boundaries and returns
/// `Err(CodecError::Cancelled)` when set.
pub fn cancel() {
    CANCELLED.store(true, Ordering::Relaxed);
}

/// Returns `true` if cancellation has been requested.
pub fn is_cancelled() -> bool {
    CANCELLED.load(Ordering::Relaxed)
}

/// Check for cancellation and return an error if requested.
pub fn check_cancelled() -> Result<(), CodecError> {
    if is_cancelled() {
        Err(CodecError::Cancelled)
    } else {
        Ok(())
    }
}

/// Advance progress by one step.
/// Step is capped at total-1 so the bar never reads 100% before
/// [`finish`].
pub fn advance() {
    let total = TOTAL.load(Ordering::Relaxed);
    if total == 0 {
        STEP.fetch_add(1, Ordering::Relaxed);
    } else {
        let _ = STEP.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |s| {
            if s + 1 < total {
                Some(s + 1)
            } else {
                Some(s)
            }
        });
    }
}

/// Read the current (step, total) progress.
pub fn get() -> (u32, u32) {
    (STEP.load(Ordering::Relaxed), TOTAL.load(Ordering::Relaxed))
}

/// Mark progress as complete (step = total).
pub fn finish() {
    let t = TOTAL.load(Ordering::Relaxed);
    STEP.store(t, Ordering::Relaxed);
}

#[cfg(test)]
mod tests {
    use super::*;

    // Progress state is global; run the sequence in one test to avoid
    // interleaving with parallel test threads.
    #[test]
    fn lifecycle() {
        init(4);
        assert_eq!(get(), (0, 4));
        assert!(check_cancelled().is_ok());

        advance();
        advance();
        assert_eq!(get(), (2, 4));

        // Capped below total until finish().
        advance();
        advance();
        advance();
        assert_eq!(get(), (3, 4));

        finish();
        assert_eq!(get(), (4, 4));

        cancel();
        assert!(is_cancelled());
        assert!(matches!(check_cancelled(), Err(CodecError::Cancelled)));

        init(1);
        assert!(!is_cancelled());
    }
}
