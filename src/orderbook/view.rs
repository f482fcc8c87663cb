//! Read surface over any buffer that follows the book layout.
//!
//! ## Design
//!
//! [`BookRead`] carries every accessor as a provided method on top of two
//! required ones (`cells`, `layout`). It is implemented by the owning
//! [`OrderBook`](crate::orderbook::OrderBook) and by [`BookView`], a borrowed
//! view over a buffer received from elsewhere, so the same query code runs
//! against both.
//!
//! ## Missing levels
//!
//! A level that does not exist in the requested view is `None`. There are no
//! numeric sentinels anywhere in the read surface.

use crate::error::{BookError, Result};
use crate::layout::{Layout, LEVEL_WIDTH};
use crate::orderbook::dump::Dump;
use crate::types::{Field, Level, Side, View};

// ============================================================================
// BookRead trait
// ============================================================================

/// Query interface shared by owned books and borrowed views.
pub trait BookRead {
    /// The underlying buffer
    fn cells(&self) -> &[i64];

    /// Geometry of [`cells`](BookRead::cells)
    fn layout(&self) -> Layout;

    /// Decimal places used when rendering prices in a dump
    fn price_scale(&self) -> u32 {
        0
    }

    /// Max levels per side
    #[inline]
    fn capacity(&self) -> usize {
        self.layout().capacity()
    }

    // ========================================================================
    // Counts
    // ========================================================================

    /// Live raw level count of `side`
    #[inline]
    fn depth(&self, side: Side) -> usize {
        self.cells()[self.layout().depth_index(side)] as usize
    }

    /// Distinct price count of `side`
    #[inline]
    fn collapsed_depth(&self, side: Side) -> usize {
        self.cells()[self.layout().collapsed_depth_index(side)] as usize
    }

    /// Uncrossed price count of `side` as of the last uncross
    #[inline]
    fn uncrossed_depth(&self, side: Side) -> usize {
        self.cells()[self.layout().uncrossed_depth_index(side)] as usize
    }

    /// Level count of `side` in `view`
    fn view_depth(&self, side: Side, view: View) -> usize {
        match view {
            View::Raw => self.depth(side),
            View::Collapsed => self.collapsed_depth(side),
            View::Uncrossed => self.uncrossed_depth(side),
        }
    }

    /// True if `level` exists on `side` in `view`
    #[inline]
    fn has_level(&self, side: Side, level: usize, view: View) -> bool {
        level < self.view_depth(side, view)
    }

    /// True if both sides are empty
    fn is_empty(&self) -> bool {
        self.depth(Side::Bid) == 0 && self.depth(Side::Ask) == 0
    }

    // ========================================================================
    // Level accessors
    // ========================================================================

    /// Absolute offset of the raw slot behind `level` in `view`
    ///
    /// For collapsed views this is the first raw level of the price group.
    fn slot_offset(&self, side: Side, level: usize, view: View) -> Option<usize> {
        if !self.has_level(side, level, view) {
            return None;
        }
        let layout = self.layout();
        let offset = match view {
            View::Raw => layout.raw_offset(side, level),
            View::Collapsed => self.cells()[layout.collapsed_base(side) + level] as usize,
            View::Uncrossed => self.cells()[layout.uncrossed_base(side) + level] as usize,
        };
        Some(offset)
    }

    /// Price of `level`
    fn price(&self, side: Side, level: usize, view: View) -> Option<i64> {
        let offset = self.slot_offset(side, level, view)?;
        Some(self.cells()[offset + Field::Price.offset()])
    }

    /// Size of `level`
    ///
    /// In collapsed views this is the sum over every raw level at that price.
    fn size(&self, side: Side, level: usize, view: View) -> Option<i64> {
        let offset = self.slot_offset(side, level, view)?;
        Some(match view {
            View::Raw => self.cells()[offset + Field::Size.offset()],
            View::Collapsed | View::Uncrossed => self.group_size(side, offset),
        })
    }

    /// Timestamp of `level` (first order of the group in collapsed views)
    fn timestamp(&self, side: Side, level: usize, view: View) -> Option<i64> {
        let offset = self.slot_offset(side, level, view)?;
        Some(self.cells()[offset + Field::Timestamp.offset()])
    }

    /// Order id of `level` (first order of the group in collapsed views)
    fn order_id(&self, side: Side, level: usize, view: View) -> Option<i64> {
        let offset = self.slot_offset(side, level, view)?;
        Some(self.cells()[offset + Field::OrderId.offset()])
    }

    /// All four fields of `level`, with aggregated size in collapsed views
    fn level(&self, side: Side, level: usize, view: View) -> Option<Level> {
        let offset = self.slot_offset(side, level, view)?;
        let mut out = Level::from_cells(&self.cells()[offset..offset + LEVEL_WIDTH]);
        if view.is_collapsed() {
            out.size = self.group_size(side, offset);
        }
        Some(out)
    }

    /// Iterate the levels of `side` in `view`, best first
    fn levels(&self, side: Side, view: View) -> Levels<'_, Self> {
        Levels {
            book: self,
            side,
            view,
            next: 0,
            end: self.view_depth(side, view),
        }
    }

    /// Summed size of the contiguous price group starting at `offset`
    ///
    /// Saturates at the `i64` bounds.
    fn group_size(&self, side: Side, offset: usize) -> i64 {
        let cells = self.cells();
        let end = self.layout().raw_end(side, self.depth(side));
        let price = cells[offset + Field::Price.offset()];

        let mut total = cells[offset + Field::Size.offset()];
        let mut cursor = offset + LEVEL_WIDTH;
        while cursor < end && cells[cursor + Field::Price.offset()] == price {
            total = total.saturating_add(cells[cursor + Field::Size.offset()]);
            cursor += LEVEL_WIDTH;
        }
        total
    }

    // ========================================================================
    // Order-id scoped lookup
    // ========================================================================

    /// The `level`-th match among raw levels whose order id is in `ids`.
    ///
    /// With `collapsed`, consecutive matches at the same price form one group:
    /// the group's size is the sum of its matches, while price, timestamp
    /// and order id come from its first match.
    fn level_for_ids(
        &self,
        side: Side,
        ids: &[i64],
        level: usize,
        collapsed: bool,
    ) -> Option<Level> {
        let layout = self.layout();
        let cells = self.cells();

        let mut seen = 0;
        let mut last_price = None;
        let mut found: Option<Level> = None;
        for i in 0..self.depth(side) {
            let offset = layout.raw_offset(side, i);
            let slot = Level::from_cells(&cells[offset..offset + LEVEL_WIDTH]);
            if !id_matches(ids, slot.order_id) {
                continue;
            }

            if !collapsed {
                if seen == level {
                    return Some(slot);
                }
                seen += 1;
                continue;
            }

            if last_price == Some(slot.price) {
                if let Some(group) = found.as_mut() {
                    group.size = group.size.saturating_add(slot.size);
                }
                continue;
            }
            if found.is_some() {
                break;
            }
            last_price = Some(slot.price);
            if seen == level {
                found = Some(slot);
            }
            seen += 1;
        }
        found
    }

    /// Price of the `level`-th id match
    fn price_for_ids(&self, side: Side, ids: &[i64], level: usize, collapsed: bool) -> Option<i64> {
        self.level_for_ids(side, ids, level, collapsed).map(|l| l.price)
    }

    /// Size of the `level`-th id match (summed per group when collapsed)
    fn size_for_ids(&self, side: Side, ids: &[i64], level: usize, collapsed: bool) -> Option<i64> {
        self.level_for_ids(side, ids, level, collapsed).map(|l| l.size)
    }

    /// Timestamp of the `level`-th id match
    fn timestamp_for_ids(
        &self,
        side: Side,
        ids: &[i64],
        level: usize,
        collapsed: bool,
    ) -> Option<i64> {
        self.level_for_ids(side, ids, level, collapsed).map(|l| l.timestamp)
    }

    // ========================================================================
    // Debug dump
    // ========================================================================

    /// Human-readable listing of `side` in `view`
    fn dump(&self, side: Side, view: View) -> Dump<'_, Self> {
        Dump::new(self, side, view)
    }
}

/// Membership test with the common one- and two-id cases unrolled.
#[inline]
fn id_matches(ids: &[i64], id: i64) -> bool {
    match ids {
        [a] => *a == id,
        [a, b] => *a == id || *b == id,
        _ => ids.contains(&id),
    }
}

// ============================================================================
// Level iterator
// ============================================================================

/// Iterator over the levels of one side in one view.
pub struct Levels<'a, B: ?Sized> {
    book: &'a B,
    side: Side,
    view: View,
    next: usize,
    end: usize,
}

impl<B: BookRead + ?Sized> Iterator for Levels<'_, B> {
    type Item = Level;

    fn next(&mut self) -> Option<Level> {
        if self.next >= self.end {
            return None;
        }
        let level = self.book.level(self.side, self.next, self.view);
        self.next += 1;
        level
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end.saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl<B: BookRead + ?Sized> ExactSizeIterator for Levels<'_, B> {}

// ============================================================================
// BookView
// ============================================================================

/// A validated, read-only view over a borrowed book buffer.
///
/// ## Example
///
/// ```
/// use dense_book::{Analytics, BookRead, BookView, Level, OrderBook, Side, View};
///
/// let mut book = OrderBook::new(4);
/// book.insert(Side::Bid, Level::new(99, 10, 0, 1)).unwrap();
/// book.insert(Side::Ask, Level::new(101, 10, 0, 2)).unwrap();
///
/// // A copy received from another thread or process
/// let received = book.cells().to_vec();
/// let view = BookView::new(&received).unwrap();
///
/// assert_eq!(view.price(Side::Bid, 0, View::Raw), Some(99));
/// assert_eq!(view.midpoint(View::Raw), Some(100.0));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BookView<'a> {
    cells: &'a [i64],
    layout: Layout,
    price_scale: u32,
}

impl<'a> BookView<'a> {
    /// Wrap `cells`, checking the header and every live pointer.
    ///
    /// # Errors
    ///
    /// - `InvalidLength` if the length matches no capacity
    /// - `CorruptBuffer` if a counter exceeds the capacity, the collapsed
    ///   count exceeds the raw depth, or a pointer does not name a raw slot
    ///   of its side
    pub fn new(cells: &'a [i64]) -> Result<Self> {
        let layout = Layout::from_len(cells.len())?;
        validate(cells, layout)?;
        Ok(Self::trusted(cells, layout))
    }

    /// Wrap a buffer whose invariants are maintained by the caller.
    pub(crate) fn trusted(cells: &'a [i64], layout: Layout) -> Self {
        Self {
            cells,
            layout,
            price_scale: 0,
        }
    }

    /// Render prices with `scale` decimal places in dumps
    pub fn with_price_scale(mut self, scale: u32) -> Self {
        self.price_scale = scale;
        self
    }

    /// The wrapped buffer with its original lifetime
    pub fn into_cells(self) -> &'a [i64] {
        self.cells
    }
}

impl BookRead for BookView<'_> {
    #[inline]
    fn cells(&self) -> &[i64] {
        self.cells
    }

    #[inline]
    fn layout(&self) -> Layout {
        self.layout
    }

    fn price_scale(&self) -> u32 {
        self.price_scale
    }
}

/// Check the counters and pointers of a foreign buffer.
fn validate(cells: &[i64], layout: Layout) -> Result<()> {
    let capacity = layout.capacity();
    let count = |index: usize, what: &str, side: Side, limit: usize| -> Result<usize> {
        usize::try_from(cells[index])
            .ok()
            .filter(|&n| n <= limit)
            .ok_or_else(|| {
                BookError::corrupt(format!(
                    "{side:?} {what} {} outside 0..={limit}",
                    cells[index]
                ))
            })
    };

    for side in Side::BOTH {
        let depth = count(layout.depth_index(side), "depth", side, capacity)?;
        let collapsed = count(
            layout.collapsed_depth_index(side),
            "collapsed depth",
            side,
            depth,
        )?;
        let uncrossed = count(
            layout.uncrossed_depth_index(side),
            "uncrossed depth",
            side,
            capacity,
        )?;

        let live = |ptr: i64, limit: usize| {
            usize::try_from(ptr)
                .ok()
                .and_then(|offset| layout.raw_level_of(side, offset))
                .is_some_and(|level| level < limit)
        };
        for i in 0..collapsed {
            let ptr = cells[layout.collapsed_base(side) + i];
            if !live(ptr, depth) {
                return Err(BookError::corrupt(format!(
                    "{side:?} collapsed pointer {ptr} is not a live raw slot"
                )));
            }
        }
        for i in 0..uncrossed {
            let ptr = cells[layout.uncrossed_base(side) + i];
            if !live(ptr, capacity) {
                return Err(BookError::corrupt(format!(
                    "{side:?} uncrossed pointer {ptr} is not a raw slot"
                )));
            }
        }
    }
    Ok(())
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orderbook::OrderBook;

    fn sample_book() -> OrderBook {
        let mut book = OrderBook::new(5);
        book.insert(Side::Bid, Level::new(100, 10, 1, 1)).unwrap();
        book.insert(Side::Bid, Level::new(100, 5, 2, 2)).unwrap();
        book.insert(Side::Bid, Level::new(99, 20, 3, 3)).unwrap();
        book
    }

    #[test]
    fn test_raw_accessors() {
        let book = sample_book();

        let raw: Vec<Level> = book.levels(Side::Bid, View::Raw).collect();
        assert_eq!(
            raw,
            vec![
                Level::new(100, 10, 1, 1),
                Level::new(100, 5, 2, 2),
                Level::new(99, 20, 3, 3),
            ]
        );
        assert_eq!(book.level(Side::Bid, 1, View::Raw), Some(raw[1]));
        assert_eq!(book.price(Side::Bid, 3, View::Raw), None);
        assert_eq!(book.price(Side::Ask, 0, View::Raw), None);
    }

    #[test]
    fn test_collapsed_accessors() {
        let book = sample_book();

        assert_eq!(book.view_depth(Side::Bid, View::Collapsed), 2);
        assert_eq!(book.price(Side::Bid, 0, View::Collapsed), Some(100));
        assert_eq!(book.size(Side::Bid, 0, View::Collapsed), Some(15));
        assert_eq!(book.timestamp(Side::Bid, 0, View::Collapsed), Some(1));
        assert_eq!(book.order_id(Side::Bid, 0, View::Collapsed), Some(1));
        assert_eq!(book.price(Side::Bid, 1, View::Collapsed), Some(99));
        assert_eq!(book.size(Side::Bid, 1, View::Collapsed), Some(20));
        assert!(!book.has_level(Side::Bid, 2, View::Collapsed));
    }

    #[test]
    fn test_levels_iterator() {
        let book = sample_book();

        let prices: Vec<i64> = book
            .levels(Side::Bid, View::Collapsed)
            .map(|l| l.price)
            .collect();
        assert_eq!(prices, vec![100, 99]);
        assert_eq!(book.levels(Side::Bid, View::Raw).len(), 3);
        assert_eq!(book.levels(Side::Ask, View::Raw).count(), 0);
    }

    #[test]
    fn test_level_for_ids_raw() {
        let book = sample_book();

        assert_eq!(book.price_for_ids(Side::Bid, &[2], 0, false), Some(100));
        assert_eq!(book.size_for_ids(Side::Bid, &[1, 3], 1, false), Some(20));
        let ts = book.timestamp_for_ids(Side::Bid, &[1, 2, 3], 2, false);
        assert_eq!(ts, Some(3));
        assert_eq!(book.price_for_ids(Side::Bid, &[2], 1, false), None);
        assert_eq!(book.price_for_ids(Side::Bid, &[], 0, false), None);
    }

    #[test]
    fn test_level_for_ids_collapsed() {
        let mut book = sample_book();
        book.insert(Side::Bid, Level::new(98, 7, 4, 1)).unwrap();

        // ids {1, 2}: group 100 = 10 + 5, group 98 = 7
        assert_eq!(book.size_for_ids(Side::Bid, &[1, 2], 0, true), Some(15));
        assert_eq!(book.timestamp_for_ids(Side::Bid, &[1, 2], 0, true), Some(1));
        assert_eq!(book.price_for_ids(Side::Bid, &[1, 2], 1, true), Some(98));
        assert_eq!(book.size_for_ids(Side::Bid, &[1, 2], 1, true), Some(7));
        assert_eq!(book.size_for_ids(Side::Bid, &[1, 2], 2, true), None);
    }

    #[test]
    fn test_level_for_ids_any_set_size_agrees() {
        let book = sample_book();

        for level in 0..3 {
            let two = book.level_for_ids(Side::Bid, &[1, 3], level, true);
            let four = book.level_for_ids(Side::Bid, &[9, 1, 8, 3], level, true);
            assert_eq!(two, four);
        }
    }

    #[test]
    fn test_collapsed_size_saturates() {
        let half = i64::MAX / 2 + 1;
        let mut book = OrderBook::new(3);
        book.insert(Side::Bid, Level::new(100, half, 1, 1)).unwrap();
        book.insert(Side::Bid, Level::new(100, half, 2, 1)).unwrap();

        assert_eq!(book.size(Side::Bid, 0, View::Raw), Some(half));
        assert_eq!(book.size(Side::Bid, 0, View::Collapsed), Some(i64::MAX));
        assert_eq!(book.size_for_ids(Side::Bid, &[1], 0, true), Some(i64::MAX));
    }

    #[test]
    fn test_view_new_validates_length() {
        let cells = vec![0; 20];
        let err = BookView::new(&cells).unwrap_err();
        assert_eq!(err, BookError::InvalidLength(20));
    }

    #[test]
    fn test_view_new_rejects_bad_depth() {
        let layout = Layout::new(2);
        let mut cells = vec![0; layout.len()];
        cells[layout.depth_index(Side::Ask)] = 3;
        assert!(matches!(
            BookView::new(&cells),
            Err(BookError::CorruptBuffer(_))
        ));

        cells[layout.depth_index(Side::Ask)] = -1;
        assert!(matches!(
            BookView::new(&cells),
            Err(BookError::CorruptBuffer(_))
        ));
    }

    #[test]
    fn test_view_new_rejects_misaligned_pointer() {
        let book = sample_book();
        let layout = book.layout();
        let mut cells = book.cells().to_vec();
        cells[layout.collapsed_base(Side::Bid)] += 1;

        assert!(matches!(
            BookView::new(&cells),
            Err(BookError::CorruptBuffer(_))
        ));
    }

    #[test]
    fn test_view_new_rejects_pointer_into_other_side() {
        let book = sample_book();
        let layout = book.layout();
        let mut cells = book.cells().to_vec();
        cells[layout.collapsed_base(Side::Bid)] = layout.raw_base(Side::Ask) as i64;

        assert!(matches!(
            BookView::new(&cells),
            Err(BookError::CorruptBuffer(_))
        ));
    }

    #[test]
    fn test_view_matches_owner() {
        let book = sample_book();
        let view = BookView::new(book.cells()).unwrap();

        for v in View::ALL {
            for level in 0..3 {
                assert_eq!(
                    view.level(Side::Bid, level, v),
                    book.level(Side::Bid, level, v)
                );
            }
        }
    }
}
