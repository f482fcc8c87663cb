//! Uncrossing engine.
//!
//! A bid price group survives iff its price is strictly below every ask
//! collapsed price; an ask group survives iff its price is strictly above
//! every bid collapsed price. The surviving pointers are copied, in order,
//! into the uncrossed arrays.
//!
//! Cost is `O(bid groups x ask groups)`, bounded by the capacity. The pass
//! reads only the collapsed pointers, so they must be current.

use tracing::debug;

use crate::error::Result;
use crate::layout::Layout;
use crate::orderbook::{BookRead, BookView};
use crate::types::Side;

/// Recompute both uncrossed pointer arrays and counts.
///
/// Returns `(bid survivors, ask survivors)`.
pub fn uncross(cells: &mut [i64], layout: Layout) -> (usize, usize) {
    let bids = uncross_side(cells, layout, Side::Bid);
    let asks = uncross_side(cells, layout, Side::Ask);
    debug!(bids, asks, "book uncrossed");
    (bids, asks)
}

/// Uncross an externally supplied buffer.
///
/// The buffer is validated before any cell is written.
///
/// # Errors
///
/// `InvalidLength` or `CorruptBuffer` if the buffer does not hold a book.
///
/// # Example
///
/// ```
/// use dense_book::{uncross_in_place, BookRead, Level, OrderBook, Side};
///
/// let mut book = OrderBook::new(4);
/// book.insert(Side::Bid, Level::new(101, 1, 0, 1)).unwrap();
/// book.insert(Side::Ask, Level::new(100, 1, 0, 2)).unwrap();
///
/// let mut cells = book.cells().to_vec();
/// assert_eq!(uncross_in_place(&mut cells).unwrap(), (0, 0));
/// ```
pub fn uncross_in_place(cells: &mut [i64]) -> Result<(usize, usize)> {
    let layout = BookView::new(&*cells)?.layout();
    Ok(uncross(cells, layout))
}

fn uncross_side(cells: &mut [i64], layout: Layout, side: Side) -> usize {
    let other = side.opposite();
    let own_ptrs = layout.collapsed_base(side);
    let own_count = cells[layout.collapsed_depth_index(side)] as usize;
    let other_ptrs = layout.collapsed_base(other);
    let other_count = cells[layout.collapsed_depth_index(other)] as usize;
    let out = layout.uncrossed_base(side);

    let mut survivors = 0;
    for i in 0..own_count {
        let ptr = cells[own_ptrs + i];
        let price = cells[ptr as usize];
        let crossed = (0..other_count).any(|j| {
            let other_price = cells[cells[other_ptrs + j] as usize];
            match side {
                Side::Bid => price >= other_price,
                Side::Ask => other_price >= price,
            }
        });
        if !crossed {
            cells[out + survivors] = ptr;
            survivors += 1;
        }
    }

    cells[layout.uncrossed_depth_index(side)] = survivors as i64;
    survivors
}
