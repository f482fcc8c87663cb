//! Owning order book over a dense buffer.
//!
//! ## Architecture
//!
//! `OrderBook` owns one `Vec<i64>` laid out by [`Layout`] and is the only
//! type that mutates a book. Reads go through [`BookRead`] and
//! [`Analytics`](crate::orderbook::Analytics), exactly as they would on a
//! [`BookView`] of a copied buffer.
//!
//! ## Uncrossed view validity
//!
//! Uncrossing is never implicit. The book keeps a version counter bumped by
//! every mutation and remembers the version at which [`OrderBook::uncross`]
//! last ran. In-place modifications keep prices where they are, so they do
//! not invalidate the uncrossed view; inserts, removals and clears do.
//!
//! ## Example
//!
//! ```
//! use dense_book::{Analytics, BookRead, Level, OrderBook, Side, View};
//!
//! let mut book = OrderBook::new(5);
//! book.insert(Side::Bid, Level::new(100, 10, 1, 1)).unwrap();
//! book.insert(Side::Bid, Level::new(100, 5, 2, 2)).unwrap();
//! book.insert(Side::Bid, Level::new(99, 20, 3, 3)).unwrap();
//!
//! assert_eq!(book.size(Side::Bid, 0, View::Collapsed), Some(15));
//! assert_eq!(book.price(Side::Bid, 1, View::Collapsed), Some(99));
//!
//! book.insert(Side::Ask, Level::new(101, 4, 4, 4)).unwrap();
//! assert!(!book.is_uncrossed_current());
//! book.uncross();
//! assert!(book.is_uncrossed_current());
//! assert_eq!(book.spread(View::Uncrossed), Some(1));
//! ```

use tracing::debug;

use crate::config::BookConfig;
use crate::engine::{compact, mutation, uncross};
use crate::error::Result;
use crate::layout::Layout;
use crate::orderbook::{BookRead, BookView};
use crate::snapshot::BookSnapshot;
use crate::types::{Level, Side};

/// Dense two-sided order book for one instrument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBook {
    /// The book buffer
    cells: Vec<i64>,

    /// Geometry of `cells`
    layout: Layout,

    /// Construction parameters
    config: BookConfig,

    /// Bumped by every mutation
    version: u64,

    /// Version at which the uncrossed pointers were last rebuilt
    uncrossed_at: Option<u64>,
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::from_config(BookConfig::default())
    }
}

impl OrderBook {
    /// Create an empty book holding up to `capacity` levels per side
    ///
    /// # Example
    ///
    /// ```
    /// use dense_book::{BookRead, OrderBook};
    ///
    /// let book = OrderBook::new(5);
    /// assert_eq!(book.capacity(), 5);
    /// assert_eq!(book.cells().len(), 2 + 12 * 5 + 4);
    /// ```
    pub fn new(capacity: usize) -> Self {
        Self::from_config(BookConfig::new(capacity))
    }

    /// Create an empty book from a validated config
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the config is rejected by [`BookConfig::validate`].
    pub fn with_config(config: BookConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_config(config))
    }

    fn from_config(config: BookConfig) -> Self {
        let layout = Layout::new(config.capacity);
        debug!(
            capacity = config.capacity,
            cells = layout.len(),
            "book allocated"
        );
        Self {
            cells: vec![0; layout.len()],
            layout,
            config,
            version: 0,
            uncrossed_at: Some(0),
        }
    }

    /// Adopt a buffer produced elsewhere.
    ///
    /// The freshness of its uncrossed view is unknown, so the adopted book
    /// reports it as stale until [`uncross`](OrderBook::uncross) runs.
    ///
    /// # Errors
    ///
    /// `InvalidLength` / `CorruptBuffer` if the buffer is not a valid book.
    pub fn from_cells(cells: Vec<i64>) -> Result<Self> {
        let layout = BookView::new(&cells)?.layout();
        Ok(Self {
            cells,
            layout,
            config: BookConfig::new(layout.capacity()),
            version: 0,
            uncrossed_at: None,
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Construction parameters
    #[inline]
    pub fn config(&self) -> &BookConfig {
        &self.config
    }

    /// Mutation counter
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// True if no insert, removal or clear happened since the last uncross
    #[inline]
    pub fn is_uncrossed_current(&self) -> bool {
        self.uncrossed_at == Some(self.version)
    }

    /// Borrowed view of the buffer
    #[inline]
    pub fn view(&self) -> BookView<'_> {
        BookView::trusted(&self.cells, self.layout).with_price_scale(self.config.price_scale)
    }

    /// Give up ownership of the buffer
    pub fn into_cells(self) -> Vec<i64> {
        self.cells
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Record a mutation. Structural ones invalidate the uncrossed view.
    fn touch(&mut self, structural: bool) {
        let current = self.is_uncrossed_current();
        self.version += 1;
        if current && !structural {
            self.uncrossed_at = Some(self.version);
        }
    }

    /// Insert a level at its price-time position.
    ///
    /// Returns the raw level index the entry was written to.
    ///
    /// # Errors
    ///
    /// `CapacityExceeded` if the side is full; the book is left unchanged.
    pub fn insert(&mut self, side: Side, level: Level) -> Result<usize> {
        let at = mutation::insert(&mut self.cells, self.layout, side, level)?;
        self.touch(true);
        Ok(at)
    }

    /// Remove raw level `level` of `side`.
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` if `level` is at or beyond the live depth.
    pub fn remove_level(&mut self, side: Side, level: usize) -> Result<Level> {
        let removed = mutation::remove_level(&mut self.cells, self.layout, side, level)?;
        self.touch(true);
        Ok(removed)
    }

    /// Remove the `occurrence`-th (0-based) level carrying `order_id`.
    ///
    /// Returns `None` if there are fewer matches.
    pub fn remove_by_order_id(
        &mut self,
        side: Side,
        order_id: i64,
        occurrence: usize,
    ) -> Option<Level> {
        let removed = mutation::remove_by_order_id(
            &mut self.cells,
            self.layout,
            side,
            order_id,
            occurrence,
        )?;
        self.touch(true);
        Some(removed)
    }

    /// Remove every level carrying `order_id`. Returns how many were removed.
    pub fn remove_all_by_order_id(&mut self, side: Side, order_id: i64) -> usize {
        let removed =
            mutation::remove_all_by_order_id(&mut self.cells, self.layout, side, order_id);
        if removed > 0 {
            self.touch(true);
        }
        removed
    }

    /// Overwrite size, timestamp and order id of raw level `level` in place.
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` if `level` is at or beyond the live depth.
    pub fn modify_level(
        &mut self,
        side: Side,
        level: usize,
        size: i64,
        timestamp: i64,
        order_id: i64,
    ) -> Result<()> {
        mutation::modify_level(
            &mut self.cells,
            self.layout,
            side,
            level,
            size,
            timestamp,
            order_id,
        )?;
        self.touch(false);
        Ok(())
    }

    /// Overwrite the size of the `occurrence`-th level carrying `order_id`.
    ///
    /// Returns `false` if there are fewer matches.
    pub fn modify_by_order_id(
        &mut self,
        side: Side,
        order_id: i64,
        occurrence: usize,
        new_size: i64,
    ) -> bool {
        let found = mutation::modify_by_order_id(
            &mut self.cells,
            self.layout,
            side,
            order_id,
            occurrence,
            new_size,
        );
        if found {
            self.touch(false);
        }
        found
    }

    /// Drop every level of `side`
    pub fn clear(&mut self, side: Side) {
        mutation::clear(&mut self.cells, self.layout, side);
        self.touch(true);
    }

    /// Drop every level of both sides
    pub fn clear_all(&mut self) {
        for side in Side::BOTH {
            mutation::clear(&mut self.cells, self.layout, side);
        }
        self.touch(true);
    }

    // ========================================================================
    // Derived views
    // ========================================================================

    /// Rebuild the uncrossed view from the current collapsed view.
    ///
    /// Returns `(bid survivors, ask survivors)`.
    pub fn uncross(&mut self) -> (usize, usize) {
        let counts = uncross::uncross(&mut self.cells, self.layout);
        self.uncrossed_at = Some(self.version);
        counts
    }

    /// Live-sized copy of the buffer for transfer.
    ///
    /// A stale uncrossed view is refreshed on a private copy first, so the
    /// result always carries an uncrossed view matching its levels.
    ///
    /// # Errors
    ///
    /// Only if the buffer fails validation, which an `OrderBook` maintains.
    pub fn compact(&self) -> Result<Vec<i64>> {
        if self.is_uncrossed_current() {
            return compact::realize(&self.cells);
        }
        debug!(
            version = self.version,
            "refreshing stale uncrossed view before compaction"
        );
        let mut cells = self.cells.clone();
        uncross::uncross(&mut cells, self.layout);
        compact::realize(&cells)
    }

    /// Compacted, SSZ-encodable snapshot of the book
    ///
    /// # Errors
    ///
    /// `Codec` if the compacted buffer exceeds the snapshot size limit.
    pub fn snapshot(&self) -> Result<BookSnapshot> {
        BookSnapshot::from_cells(&self.compact()?)
    }
}

impl BookRead for OrderBook {
    #[inline]
    fn cells(&self) -> &[i64] {
        &self.cells
    }

    #[inline]
    fn layout(&self) -> Layout {
        self.layout
    }

    fn price_scale(&self) -> u32 {
        self.config.price_scale
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BookError;
    use crate::orderbook::Analytics;
    use crate::types::View;

    #[test]
    fn test_book_new() {
        let book = OrderBook::new(5);

        assert!(book.is_empty());
        assert_eq!(book.capacity(), 5);
        assert_eq!(book.cells().len(), 66);
        assert!(book.cells().iter().all(|&c| c == 0));
        assert_eq!(book.version(), 0);
        assert!(book.is_uncrossed_current());
    }

    #[test]
    fn test_book_with_config_rejects_zero_capacity() {
        let err = OrderBook::with_config(BookConfig::new(0)).unwrap_err();
        assert!(matches!(err, BookError::InvalidConfig(_)));
    }

    #[test]
    fn test_book_default() {
        let book = OrderBook::default();
        assert_eq!(book.capacity(), crate::config::DEFAULT_CAPACITY);
    }

    #[test]
    fn test_version_tracks_mutations() {
        let mut book = OrderBook::new(4);

        book.insert(Side::Bid, Level::new(100, 1, 0, 1)).unwrap();
        assert_eq!(book.version(), 1);

        // Rejected and no-op operations leave the version alone
        assert!(book.remove_level(Side::Bid, 3).is_err());
        assert!(book.remove_by_order_id(Side::Bid, 9, 0).is_none());
        assert_eq!(book.remove_all_by_order_id(Side::Bid, 9), 0);
        assert!(!book.modify_by_order_id(Side::Bid, 9, 0, 5));
        assert_eq!(book.version(), 1);

        book.modify_level(Side::Bid, 0, 2, 0, 1).unwrap();
        assert_eq!(book.version(), 2);
    }

    #[test]
    fn test_uncrossed_staleness() {
        let mut book = OrderBook::new(4);
        book.insert(Side::Bid, Level::new(100, 1, 0, 1)).unwrap();
        assert!(!book.is_uncrossed_current());

        book.uncross();
        assert!(book.is_uncrossed_current());

        // Size changes keep prices in place
        book.modify_by_order_id(Side::Bid, 1, 0, 7);
        assert!(book.is_uncrossed_current());

        book.insert(Side::Ask, Level::new(99, 1, 0, 2)).unwrap();
        assert!(!book.is_uncrossed_current());
        assert_eq!(book.view_depth(Side::Bid, View::Uncrossed), 1);

        book.uncross();
        assert_eq!(book.view_depth(Side::Bid, View::Uncrossed), 0);
    }

    #[test]
    fn test_clear_all() {
        let mut book = OrderBook::new(3);
        book.insert(Side::Bid, Level::new(100, 1, 0, 1)).unwrap();
        book.insert(Side::Ask, Level::new(101, 1, 0, 2)).unwrap();

        book.clear_all();

        assert!(book.is_empty());
        assert_eq!(book.view_depth(Side::Bid, View::Collapsed), 0);
        assert_eq!(book.view_depth(Side::Ask, View::Collapsed), 0);
        assert_eq!(book.midpoint(View::Raw), None);
    }

    #[test]
    fn test_from_cells_roundtrip() {
        let mut book = OrderBook::new(3);
        book.insert(Side::Bid, Level::new(100, 1, 0, 1)).unwrap();

        let adopted = OrderBook::from_cells(book.cells().to_vec()).unwrap();

        assert_eq!(adopted.cells(), book.cells());
        assert!(!adopted.is_uncrossed_current());
        assert!(OrderBook::from_cells(vec![0; 10]).is_err());
    }

    #[test]
    fn test_compact_refreshes_stale_uncross() {
        let mut book = OrderBook::new(4);
        book.insert(Side::Bid, Level::new(99, 1, 0, 1)).unwrap();
        book.insert(Side::Ask, Level::new(101, 1, 0, 2)).unwrap();

        let compact = book.compact().unwrap();
        let view = BookView::new(&compact).unwrap();

        assert_eq!(view.spread(View::Uncrossed), Some(2));
    }

    #[test]
    fn test_view_carries_price_scale() {
        let book = OrderBook::with_config(BookConfig::new(2).with_price_scale(3)).unwrap();
        assert_eq!(book.view().price_scale(), 3);
    }
}
