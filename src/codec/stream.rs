// Copyright (c) 2026 Stegstr
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/brunkstr/stegstr

//! Coefficient stream planner.
//!
//! Maps a linear bit index onto (block, AC coefficient) positions. The
//! enumeration is AC-index-major: all blocks' zigzag-1 coefficients come
//! first, then all zigzag-2, and so on. Consecutive bits of a codeword
//! therefore land in different spatial regions, so localized damage (a
//! crop, a sticker, heavy local recompression) smears into isolated symbol
//! errors instead of wiping out whole codeword spans. Embed and detect
//! share this mapping; any divergence desynchronizes the whole stream.

use crate::dct::zigzag::ZIGZAG_TO_NATURAL;

/// Zigzag AC indices 1..=EMBED_AC_COUNT carry payload. Index 0 is the DC
/// coefficient; higher indices quantize too coarsely to survive.
pub const EMBED_AC_COUNT: usize = 24;

/// One slot in the coefficient stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoeffPos {
    pub block_row: u32,
    pub block_col: u32,
    /// Zigzag index in 1..=EMBED_AC_COUNT.
    pub zigzag: usize,
}

impl CoeffPos {
    /// Row-major index of this coefficient within its 8x8 block.
    #[inline]
    pub fn natural_index(&self) -> usize {
        ZIGZAG_TO_NATURAL[self.zigzag] as usize
    }
}

/// Total stream length in bits for a block grid.
pub fn stream_len(blocks_y: u32, blocks_x: u32) -> usize {
    blocks_y as usize * blocks_x as usize * EMBED_AC_COUNT
}

/// The i-th slot of the stream for a block grid. `i` must be below
/// [`stream_len`].
pub fn position(i: usize, blocks_y: u32, blocks_x: u32) -> CoeffPos {
    let nblocks = blocks_y as usize * blocks_x as usize;
    debug_assert!(i < nblocks * EMBED_AC_COUNT);
    let ac = i / nblocks;
    let blk = i % nblocks;
    CoeffPos {
        block_row: (blk / blocks_x as usize) as u32,
        block_col: (blk % blocks_x as usize) as u32,
        zigzag: ac + 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn stream_len_counts_all_slots() {
        assert_eq!(stream_len(4, 4), 16 * 24);
        assert_eq!(stream_len(1, 1), 24);
        assert_eq!(stream_len(0, 10), 0);
    }

    #[test]
    fn first_slots_walk_blocks_not_coefficients() {
        // AC-index-major: the first nblocks slots all use zigzag 1.
        let p0 = position(0, 2, 3);
        let p5 = position(5, 2, 3);
        let p6 = position(6, 2, 3);
        assert_eq!(p0, CoeffPos { block_row: 0, block_col: 0, zigzag: 1 });
        assert_eq!(p5, CoeffPos { block_row: 1, block_col: 2, zigzag: 1 });
        assert_eq!(p6, CoeffPos { block_row: 0, block_col: 0, zigzag: 2 });
    }

    #[test]
    fn enumeration_is_a_bijection() {
        let (by, bx) = (3u32, 5u32);
        let mut seen = HashSet::new();
        for i in 0..stream_len(by, bx) {
            let p = position(i, by, bx);
            assert!(p.block_row < by);
            assert!(p.block_col < bx);
            assert!((1..=EMBED_AC_COUNT).contains(&p.zigzag));
            assert!(seen.insert((p.block_row, p.block_col, p.zigzag)));
        }
        assert_eq!(seen.len(), stream_len(by, bx));
    }

    #[test]
    fn adjacent_bits_land_in_different_blocks() {
        let (by, bx) = (4u32, 4u32);
        for i in 0..stream_len(by, bx) - 1 {
            let a = position(i, by, bx);
            let b = position(i + 1, by, bx);
            assert_ne!(
                (a.block_row, a.block_col),
                (b.block_row, b.block_col),
                "slots {i} and {} share a block",
                i + 1
            );
        }
    }

    #[test]
    fn natural_index_is_in_block_range() {
        for i in 0..stream_len(2, 2) {
            let n = position(i, 2, 2).natural_index();
            assert!(n > 0 && n < 64);
        }
    }
}
