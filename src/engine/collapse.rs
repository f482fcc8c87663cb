//! Collapsed-view builder.
//!
//! One left-to-right pass over the live raw levels of a side records the
//! absolute offset of the first level of every distinct price. Raw levels are
//! sorted, so each price group is contiguous and the pointers come out in
//! side order.

use crate::layout::{Layout, LEVEL_WIDTH};
use crate::types::Side;

/// Rebuild the collapsed pointers and collapsed depth of `side`.
///
/// Returns the number of distinct prices.
pub fn rebuild(cells: &mut [i64], layout: Layout, side: Side) -> usize {
    let depth = cells[layout.depth_index(side)] as usize;
    let ptrs = layout.collapsed_base(side);

    let mut count = 0;
    let mut prev = None;
    let mut offset = layout.raw_base(side);
    for _ in 0..depth {
        let price = cells[offset];
        if prev != Some(price) {
            cells[ptrs + count] = offset as i64;
            count += 1;
            prev = Some(price);
        }
        offset += LEVEL_WIDTH;
    }

    cells[layout.collapsed_depth_index(side)] = count as i64;
    count
}
