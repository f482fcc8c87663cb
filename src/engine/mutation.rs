//! Mutation engine for the raw level arrays.
//!
//! ## Ordering
//!
//! - **Bids**: descending price, FIFO among equal prices
//! - **Asks**: ascending price, FIFO among equal prices
//!
//! Insertion scans for the first level the new price strictly improves on,
//! so an order at an existing price always lands behind the orders already
//! resting there.
//!
//! ## Pointer maintenance
//!
//! Structural changes (insert, remove, clear) rebuild the collapsed pointers
//! of the touched side before returning. In-place modifications keep every
//! price where it was and leave the pointers alone. Uncrossed pointers are
//! never touched here.
//!
//! Every function validates its arguments before writing, so a returned
//! error leaves the buffer unchanged.

use tracing::{debug, trace};

use crate::engine::collapse;
use crate::error::{BookError, Result};
use crate::layout::{Layout, LEVEL_WIDTH};
use crate::types::{Field, Level, Side};

// ============================================================================
// Depth helpers
// ============================================================================

/// Live raw depth of `side`
#[inline]
pub fn depth(cells: &[i64], layout: Layout, side: Side) -> usize {
    cells[layout.depth_index(side)] as usize
}

#[inline]
fn set_depth(cells: &mut [i64], layout: Layout, side: Side, depth: usize) {
    cells[layout.depth_index(side)] = depth as i64;
}

/// Raw level index of the `occurrence`-th (0-based) level carrying `order_id`
fn find_occurrence(
    cells: &[i64],
    layout: Layout,
    side: Side,
    order_id: i64,
    occurrence: usize,
) -> Option<usize> {
    let depth = depth(cells, layout, side);
    (0..depth)
        .filter(|&i| cells[layout.raw_offset(side, i) + Field::OrderId.offset()] == order_id)
        .nth(occurrence)
}

// ============================================================================
// Insert
// ============================================================================

/// Insert a level at its price-time position.
///
/// Returns the raw level index the entry was written to.
///
/// # Errors
///
/// `CapacityExceeded` if the side already holds `capacity` levels.
pub fn insert(cells: &mut [i64], layout: Layout, side: Side, level: Level) -> Result<usize> {
    let depth = depth(cells, layout, side);
    if depth >= layout.capacity() {
        debug!(?side, capacity = layout.capacity(), "insert rejected, side full");
        return Err(BookError::CapacityExceeded {
            side,
            capacity: layout.capacity(),
        });
    }

    let insert_at = (0..depth)
        .find(|&i| side.improves(level.price, cells[layout.raw_offset(side, i)]))
        .unwrap_or(depth);

    let offset = layout.raw_offset(side, insert_at);
    if insert_at < depth {
        cells.copy_within(offset..layout.raw_end(side, depth), offset + LEVEL_WIDTH);
    }
    cells[offset..offset + LEVEL_WIDTH].copy_from_slice(&level.to_cells());
    set_depth(cells, layout, side, depth + 1);
    collapse::rebuild(cells, layout, side);

    trace!(
        ?side,
        price = level.price,
        size = level.size,
        order_id = level.order_id,
        insert_at,
        "level inserted"
    );
    Ok(insert_at)
}

// ============================================================================
// Remove
// ============================================================================

/// Remove raw level `level`, shifting later levels toward the head.
///
/// # Errors
///
/// `IndexOutOfRange` if `level >= depth`.
pub fn remove_level(cells: &mut [i64], layout: Layout, side: Side, level: usize) -> Result<Level> {
    let depth = depth(cells, layout, side);
    if level >= depth {
        return Err(BookError::IndexOutOfRange { side, level, depth });
    }

    let offset = layout.raw_offset(side, level);
    let removed = Level::from_cells(&cells[offset..offset + LEVEL_WIDTH]);
    cells.copy_within(offset + LEVEL_WIDTH..layout.raw_end(side, depth), offset);
    set_depth(cells, layout, side, depth - 1);
    collapse::rebuild(cells, layout, side);

    trace!(?side, level, price = removed.price, "level removed");
    Ok(removed)
}

/// Remove the `occurrence`-th (0-based) level carrying `order_id`.
///
/// Returns `None` and leaves the book untouched if there are fewer matches.
pub fn remove_by_order_id(
    cells: &mut [i64],
    layout: Layout,
    side: Side,
    order_id: i64,
    occurrence: usize,
) -> Option<Level> {
    let level = find_occurrence(cells, layout, side, order_id, occurrence)?;
    remove_level(cells, layout, side, level).ok()
}

/// Remove every level carrying `order_id` in one compaction pass.
///
/// Returns the number of levels removed.
pub fn remove_all_by_order_id(
    cells: &mut [i64],
    layout: Layout,
    side: Side,
    order_id: i64,
) -> usize {
    let depth = depth(cells, layout, side);
    let mut write = 0;
    for read in 0..depth {
        let src = layout.raw_offset(side, read);
        if cells[src + Field::OrderId.offset()] == order_id {
            continue;
        }
        if write != read {
            let dst = layout.raw_offset(side, write);
            cells.copy_within(src..src + LEVEL_WIDTH, dst);
        }
        write += 1;
    }

    set_depth(cells, layout, side, write);
    collapse::rebuild(cells, layout, side);

    let removed = depth - write;
    trace!(?side, order_id, removed, "levels removed by order id");
    removed
}

// ============================================================================
// Modify
// ============================================================================

/// Overwrite size, timestamp and order id of raw level `level` in place.
///
/// The price, and therefore the slot's position, is unchanged.
///
/// # Errors
///
/// `IndexOutOfRange` if `level >= depth`.
pub fn modify_level(
    cells: &mut [i64],
    layout: Layout,
    side: Side,
    level: usize,
    size: i64,
    timestamp: i64,
    order_id: i64,
) -> Result<()> {
    let depth = depth(cells, layout, side);
    if level >= depth {
        return Err(BookError::IndexOutOfRange { side, level, depth });
    }

    let offset = layout.raw_offset(side, level);
    cells[offset + Field::Size.offset()] = size;
    cells[offset + Field::Timestamp.offset()] = timestamp;
    cells[offset + Field::OrderId.offset()] = order_id;
    Ok(())
}

/// Overwrite the size of the `occurrence`-th level carrying `order_id`.
///
/// Returns `false` if there are fewer matches.
pub fn modify_by_order_id(
    cells: &mut [i64],
    layout: Layout,
    side: Side,
    order_id: i64,
    occurrence: usize,
    new_size: i64,
) -> bool {
    match find_occurrence(cells, layout, side, order_id, occurrence) {
        Some(level) => {
            cells[layout.raw_offset(side, level) + Field::Size.offset()] = new_size;
            true
        }
        None => false,
    }
}

// ============================================================================
// Clear
// ============================================================================

/// Drop every level of `side`. Cells past the new depth are left as they are.
pub fn clear(cells: &mut [i64], layout: Layout, side: Side) {
    set_depth(cells, layout, side, 0);
    collapse::rebuild(cells, layout, side);
}

// ============================================================================
// Unit Tests
// ============================================================================
