//! Buffer layout calculus.
//!
//! ## Layout
//!
//! A book for capacity `N` (max levels per side) is one `[i64]` of length
//! `2 + 12N + 4`:
//!
//! ```text
//! [0]                      bid depth
//! [1]                      ask depth
//! [2,       2 + 4N)        bid raw levels   {price, size, timestamp, order_id} x N
//! [2 + 4N,  2 + 8N)        ask raw levels
//! [2 + 8N,  2 + 9N)        bid collapsed pointers (absolute offsets)
//! [2 + 9N,  2 + 10N)       ask collapsed pointers
//! [2 + 10N, 2 + 11N)       bid uncrossed pointers
//! [2 + 11N, 2 + 12N)       ask uncrossed pointers
//! [2 + 12N, 2 + 12N + 4)   bid collapsed depth, ask collapsed depth,
//!                          bid uncrossed depth, ask uncrossed depth
//! ```
//!
//! Every offset in the crate is computed here. [`Layout::from_len`] is the
//! only place a capacity is recovered from a bare buffer.

use crate::error::{BookError, Result};
use crate::types::Side;

/// Cells per raw level
pub const LEVEL_WIDTH: usize = 4;

/// Depth counters at the head of the buffer
pub const HEADER_LEN: usize = 2;

/// Collapsed and uncrossed counts at the tail of the buffer
pub const META_LEN: usize = 4;

/// Cells per unit of capacity: two raw sides plus four pointer arrays
pub const CELLS_PER_CAPACITY: usize = 2 * LEVEL_WIDTH + 4;

/// Largest capacity accepted by configuration and snapshots
pub const MAX_CAPACITY: usize = 4096;

/// Section geometry for a given capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Layout {
    capacity: usize,
}

impl Layout {
    /// Layout for `capacity` levels per side
    #[inline]
    pub const fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Recover the layout of a buffer from its length alone.
    ///
    /// # Errors
    ///
    /// `InvalidLength` unless `len == 6 + 12 * N` for some `N`.
    ///
    /// # Example
    ///
    /// ```
    /// use dense_book::layout::Layout;
    ///
    /// assert_eq!(Layout::from_len(66).unwrap().capacity(), 5);
    /// assert!(Layout::from_len(67).is_err());
    /// ```
    pub fn from_len(len: usize) -> Result<Self> {
        let fixed = HEADER_LEN + META_LEN;
        if len < fixed || (len - fixed) % CELLS_PER_CAPACITY != 0 {
            return Err(BookError::InvalidLength(len));
        }
        Ok(Self::new((len - fixed) / CELLS_PER_CAPACITY))
    }

    /// Max levels per side
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total buffer length
    #[inline]
    pub const fn len(&self) -> usize {
        HEADER_LEN + CELLS_PER_CAPACITY * self.capacity + META_LEN
    }

    /// True for the degenerate zero-capacity layout
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.capacity == 0
    }

    // ========================================================================
    // Header
    // ========================================================================

    /// Cell holding the live raw depth of `side`
    #[inline]
    pub const fn depth_index(&self, side: Side) -> usize {
        side.index()
    }

    // ========================================================================
    // Raw levels
    // ========================================================================

    /// First cell of the raw level array of `side`
    #[inline]
    pub const fn raw_base(&self, side: Side) -> usize {
        HEADER_LEN + side.index() * LEVEL_WIDTH * self.capacity
    }

    /// First cell of raw level `level` on `side`
    #[inline]
    pub const fn raw_offset(&self, side: Side, level: usize) -> usize {
        self.raw_base(side) + level * LEVEL_WIDTH
    }

    /// One past the last cell of the first `depth` raw levels of `side`
    #[inline]
    pub const fn raw_end(&self, side: Side, depth: usize) -> usize {
        self.raw_offset(side, depth)
    }

    /// Raw level index of an absolute offset, if it is a slot start on `side`
    pub fn raw_level_of(&self, side: Side, offset: usize) -> Option<usize> {
        let base = self.raw_base(side);
        let rel = offset.checked_sub(base)?;
        if rel % LEVEL_WIDTH != 0 || rel / LEVEL_WIDTH >= self.capacity {
            return None;
        }
        Some(rel / LEVEL_WIDTH)
    }

    // ========================================================================
    // Pointer arrays
    // ========================================================================

    /// First cell of the collapsed pointer array of `side`
    #[inline]
    pub const fn collapsed_base(&self, side: Side) -> usize {
        HEADER_LEN + (2 * LEVEL_WIDTH + side.index()) * self.capacity
    }

    /// First cell of the uncrossed pointer array of `side`
    #[inline]
    pub const fn uncrossed_base(&self, side: Side) -> usize {
        HEADER_LEN + (2 * LEVEL_WIDTH + 2 + side.index()) * self.capacity
    }

    // ========================================================================
    // Meta
    // ========================================================================

    /// First cell of the meta block
    #[inline]
    pub const fn meta_base(&self) -> usize {
        HEADER_LEN + CELLS_PER_CAPACITY * self.capacity
    }

    /// Cell holding the collapsed depth of `side`
    #[inline]
    pub const fn collapsed_depth_index(&self, side: Side) -> usize {
        self.meta_base() + side.index()
    }

    /// Cell holding the uncrossed depth of `side`
    #[inline]
    pub const fn uncrossed_depth_index(&self, side: Side) -> usize {
        self.meta_base() + 2 + side.index()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_len() {
        assert_eq!(Layout::new(0).len(), 6);
        assert_eq!(Layout::new(1).len(), 18);
        assert_eq!(Layout::new(5).len(), 2 + 12 * 5 + 4);
    }

    #[test]
    fn test_section_bases() {
        let n = 5;
        let layout = Layout::new(n);

        assert_eq!(layout.depth_index(Side::Bid), 0);
        assert_eq!(layout.depth_index(Side::Ask), 1);
        assert_eq!(layout.raw_base(Side::Bid), 2);
        assert_eq!(layout.raw_base(Side::Ask), 2 + 4 * n);
        assert_eq!(layout.collapsed_base(Side::Bid), 2 + 8 * n);
        assert_eq!(layout.collapsed_base(Side::Ask), 2 + 9 * n);
        assert_eq!(layout.uncrossed_base(Side::Bid), 2 + 10 * n);
        assert_eq!(layout.uncrossed_base(Side::Ask), 2 + 11 * n);
        assert_eq!(layout.collapsed_depth_index(Side::Bid), 2 + 12 * n);
        assert_eq!(layout.collapsed_depth_index(Side::Ask), 2 + 12 * n + 1);
        assert_eq!(layout.uncrossed_depth_index(Side::Bid), 2 + 12 * n + 2);
        assert_eq!(layout.uncrossed_depth_index(Side::Ask), 2 + 12 * n + 3);
        assert_eq!(layout.uncrossed_depth_index(Side::Ask) + 1, layout.len());
    }

    #[test]
    fn test_from_len_roundtrip() {
        for n in [0, 1, 2, 7, 64, MAX_CAPACITY] {
            let layout = Layout::new(n);
            assert_eq!(Layout::from_len(layout.len()), Ok(layout));
        }
    }

    #[test]
    fn test_from_len_rejects_misaligned() {
        assert_eq!(Layout::from_len(0), Err(BookError::InvalidLength(0)));
        assert_eq!(Layout::from_len(5), Err(BookError::InvalidLength(5)));
        assert_eq!(Layout::from_len(17), Err(BookError::InvalidLength(17)));
        assert_eq!(Layout::from_len(19), Err(BookError::InvalidLength(19)));
    }

    #[test]
    fn test_raw_level_of() {
        let layout = Layout::new(3);
        assert_eq!(layout.raw_level_of(Side::Bid, 2), Some(0));
        assert_eq!(layout.raw_level_of(Side::Bid, 10), Some(2));
        assert_eq!(layout.raw_level_of(Side::Bid, 3), None);
        assert_eq!(layout.raw_level_of(Side::Bid, 14), None);
        assert_eq!(layout.raw_level_of(Side::Ask, 14), Some(0));
        assert_eq!(layout.raw_level_of(Side::Ask, 2), None);
    }
}
