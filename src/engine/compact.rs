//! Buffer compaction ("realize").
//!
//! Repacks a capacity-sized buffer into the smallest buffer that still holds
//! every live level: capacity `max(bid depth, ask depth)`. Because pointer
//! arrays store absolute offsets, every pointer is translated to its raw level
//! index against the source layout and re-emitted against the destination
//! layout. Copying pointers verbatim would leave ask pointers aimed at the old
//! ask base.

use tracing::debug;

use crate::error::{BookError, Result};
use crate::layout::Layout;
use crate::orderbook::{BookRead, BookView};
use crate::types::Side;

/// Produce a live-sized copy of `src`.
///
/// The uncrossed pointers are copied, not recomputed. After any insert or
/// removal that followed the last uncross, run
/// [`uncross_in_place`](crate::uncross_in_place) on the buffer (or
/// `OrderBook::uncross`) before calling this, or use `OrderBook::compact`,
/// which refreshes a stale uncrossed view on a copy first.
///
/// # Errors
///
/// - `InvalidLength` / `CorruptBuffer` if `src` is not a valid book
/// - `CorruptBuffer` if the uncrossed pointers reference levels past the live
///   depth (the uncrossed view is stale; run an uncross first)
///
/// # Example
///
/// ```
/// use dense_book::{realize, BookRead, BookView, Level, OrderBook, Side, View};
///
/// let mut book = OrderBook::new(64);
/// book.insert(Side::Bid, Level::new(99, 5, 1, 1)).unwrap();
/// book.insert(Side::Ask, Level::new(101, 7, 2, 2)).unwrap();
///
/// let compact = realize(book.cells()).unwrap();
/// let view = BookView::new(&compact).unwrap();
/// assert_eq!(view.capacity(), 1);
/// assert_eq!(view.price(Side::Ask, 0, View::Collapsed), Some(101));
/// ```
pub fn realize(src: &[i64]) -> Result<Vec<i64>> {
    let view = BookView::new(src)?;
    let from = view.layout();
    let bid_depth = view.depth(Side::Bid);
    let ask_depth = view.depth(Side::Ask);
    let to = Layout::new(bid_depth.max(ask_depth));

    let mut dst = vec![0i64; to.len()];
    for side in Side::BOTH {
        let depth = view.depth(side);
        dst[to.depth_index(side)] = depth as i64;

        let src_raw = from.raw_base(side);
        dst[to.raw_base(side)..to.raw_end(side, depth)]
            .copy_from_slice(&src[src_raw..from.raw_end(side, depth)]);

        let collapsed = view.collapsed_depth(side);
        rebase(
            src,
            &mut dst,
            from,
            to,
            side,
            from.collapsed_base(side),
            to.collapsed_base(side),
            collapsed,
            depth,
        )?;
        dst[to.collapsed_depth_index(side)] = collapsed as i64;

        let uncrossed = view.uncrossed_depth(side);
        if uncrossed > depth {
            return Err(BookError::corrupt(format!(
                "{side:?} uncrossed depth {uncrossed} exceeds live depth {depth}"
            )));
        }
        rebase(
            src,
            &mut dst,
            from,
            to,
            side,
            from.uncrossed_base(side),
            to.uncrossed_base(side),
            uncrossed,
            depth,
        )?;
        dst[to.uncrossed_depth_index(side)] = uncrossed as i64;
    }

    debug!(
        from_capacity = from.capacity(),
        to_capacity = to.capacity(),
        bid_depth,
        ask_depth,
        "book realized"
    );
    Ok(dst)
}

/// Copy `count` pointers from `src_ptrs` to `dst_ptrs`, re-basing each one.
#[allow(clippy::too_many_arguments)]
fn rebase(
    src: &[i64],
    dst: &mut [i64],
    from: Layout,
    to: Layout,
    side: Side,
    src_ptrs: usize,
    dst_ptrs: usize,
    count: usize,
    depth: usize,
) -> Result<()> {
    for i in 0..count {
        let ptr = src[src_ptrs + i];
        let level = usize::try_from(ptr)
            .ok()
            .and_then(|offset| from.raw_level_of(side, offset))
            .filter(|&level| level < depth)
            .ok_or_else(|| {
                BookError::corrupt(format!("{side:?} pointer {ptr} is outside the live levels"))
            })?;
        dst[dst_ptrs + i] = to.raw_offset(side, level) as i64;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::uncross_in_place;
    use crate::orderbook::{Analytics, OrderBook};
    use crate::types::{Level, View};

    fn crossed_book() -> OrderBook {
        let mut book = OrderBook::new(8);
        for (price, size, id) in [(102, 1, 1), (100, 2, 2), (100, 3, 3), (98, 4, 4)] {
            book.insert(Side::Bid, Level::new(price, size, id * 10, id)).unwrap();
        }
        for (price, size, id) in [(101, 5, 5), (103, 6, 6)] {
            book.insert(Side::Ask, Level::new(price, size, id * 10, id)).unwrap();
        }
        book.uncross();
        book
    }

    #[test]
    fn test_realize_shrinks_to_live_depth() {
        let book = crossed_book();
        let compact = realize(book.cells()).unwrap();

        assert_eq!(compact.len(), Layout::new(4).len());
        assert_eq!(Layout::from_len(compact.len()).unwrap().capacity(), 4);
    }

    #[test]
    fn test_realize_preserves_queries() {
        let book = crossed_book();
        let compact = realize(book.cells()).unwrap();
        let view = BookView::new(&compact).unwrap();

        for side in Side::BOTH {
            for v in View::ALL {
                assert_eq!(view.view_depth(side, v), book.view_depth(side, v));
                for level in 0..book.view_depth(side, v) {
                    assert_eq!(view.level(side, level, v), book.level(side, level, v));
                }
            }
        }
    }

    #[test]
    fn test_realize_rebases_ask_pointers() {
        let book = crossed_book();
        let compact = realize(book.cells()).unwrap();
        let to = Layout::new(4);

        assert_eq!(
            compact[to.collapsed_base(Side::Ask)],
            to.raw_base(Side::Ask) as i64
        );
    }

    #[test]
    fn test_realize_empty_book() {
        let book = OrderBook::new(16);
        let compact = realize(book.cells()).unwrap();
        assert_eq!(compact, vec![0; 6]);
    }

    #[test]
    fn test_realize_rejects_stale_uncrossed_view() {
        let mut book = crossed_book();
        book.remove_level(Side::Bid, 3).unwrap();
        book.remove_level(Side::Bid, 2).unwrap();

        let err = realize(book.cells()).unwrap_err();
        assert!(matches!(err, BookError::CorruptBuffer(_)));
    }

    #[test]
    fn test_realize_after_fresh_uncross() {
        let mut book = crossed_book();
        book.remove_level(Side::Bid, 3).unwrap();
        book.remove_level(Side::Bid, 2).unwrap();

        let mut cells = book.cells().to_vec();
        uncross_in_place(&mut cells).unwrap();
        let compact = realize(&cells).unwrap();

        assert_eq!(compact, book.compact().unwrap());
        let view = BookView::new(&compact).unwrap();
        assert_eq!(view.best_bid(View::Uncrossed), Some(100));
        assert_eq!(view.best_ask(View::Uncrossed), Some(103));
    }
}
