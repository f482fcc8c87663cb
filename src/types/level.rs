//! The four-field level record stored in each raw slot.

use crate::layout::LEVEL_WIDTH;

/// One raw level: a resting order's price, size, timestamp and id.
///
/// Prices and sizes are integer ticks. In the buffer a level occupies
/// [`LEVEL_WIDTH`] consecutive cells in field order.
///
/// ## Example
///
/// ```
/// use dense_book::types::Level;
///
/// let level = Level::new(100, 10, 1_703_577_600_000, 7);
/// assert_eq!(level.to_cells(), [100, 10, 1_703_577_600_000, 7]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Level {
    /// Price in ticks
    pub price: i64,

    /// Size in ticks (aggregated across the price group in collapsed views)
    pub size: i64,

    /// Caller-supplied timestamp
    pub timestamp: i64,

    /// Caller-supplied order identifier
    pub order_id: i64,
}

/// Field positions within a raw slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Price,
    Size,
    Timestamp,
    OrderId,
}

impl Field {
    /// Offset of the field from the start of its slot
    #[inline]
    pub const fn offset(self) -> usize {
        match self {
            Field::Price => 0,
            Field::Size => 1,
            Field::Timestamp => 2,
            Field::OrderId => 3,
        }
    }
}

impl Level {
    /// Create a new level record
    pub fn new(price: i64, size: i64, timestamp: i64, order_id: i64) -> Self {
        Self {
            price,
            size,
            timestamp,
            order_id,
        }
    }

    /// Read a level from the first [`LEVEL_WIDTH`] cells of `slot`.
    ///
    /// # Panics
    ///
    /// If `slot` is shorter than [`LEVEL_WIDTH`].
    #[inline]
    pub fn from_cells(slot: &[i64]) -> Self {
        Self {
            price: slot[Field::Price.offset()],
            size: slot[Field::Size.offset()],
            timestamp: slot[Field::Timestamp.offset()],
            order_id: slot[Field::OrderId.offset()],
        }
    }

    /// Cells in buffer order
    #[inline]
    pub fn to_cells(self) -> [i64; LEVEL_WIDTH] {
        [self.price, self.size, self.timestamp, self.order_id]
    }
}
