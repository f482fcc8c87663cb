//! Book side enumeration.

// ============================================================================
// Side enum
// ============================================================================

/// Book side: Bid or Ask
///
/// The discriminant doubles as the section index inside the buffer:
/// - Bid = 0 (depth counter at cell 0, first raw section)
/// - Ask = 1 (depth counter at cell 1, second raw section)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    /// Bid side - resting buy interest, best price is the highest
    #[default]
    Bid,
    /// Ask side - resting sell interest, best price is the lowest
    Ask,
}

impl Side {
    /// Both sides, bid first.
    pub const BOTH: [Side; 2] = [Side::Bid, Side::Ask];

    /// Section index of this side (0 for bid, 1 for ask)
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Side::Bid => 0,
            Side::Ask => 1,
        }
    }

    /// Returns the opposite side
    pub fn opposite(self) -> Self {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }

    /// True if `price` ranks strictly ahead of `other` on this side.
    ///
    /// Higher is better for bids, lower is better for asks.
    #[inline]
    pub fn improves(self, price: i64, other: i64) -> bool {
        match self {
            Side::Bid => price > other,
            Side::Ask => price < other,
        }
    }

    /// Upper-case label used by the debug dump.
    pub fn label(self) -> &'static str {
        match self {
            Side::Bid => "BID",
            Side::Ask => "ASK",
        }
    }
}
