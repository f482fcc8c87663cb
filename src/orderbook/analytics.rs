//! Derived book statistics.
//!
//! Every statistic takes a [`View`] and reads that view only, so raw,
//! collapsed and uncrossed figures are computed the same way. Collapsed sizes
//! are the aggregated group sizes, which makes VWAP agree between the raw and
//! collapsed views of the same book.
//!
//! Missing data (an empty side, an empty range, zero total size) is `None`.
//!
//! | Statistic | Definition |
//! |-----------|------------|
//! | midpoint | (best bid + best ask) / 2 |
//! | midpoint_range | (bid VWAP + ask VWAP) / 2 over a level range |
//! | spread | best ask - best bid |
//! | spread_range | ask VWAP - bid VWAP over a level range |
//! | vwap | sum(price * size) / sum(size) |
//! | imbalance | (bid size - ask size) / (bid size + ask size) at level 0 |

use crate::orderbook::BookRead;
use crate::types::{Side, View};

/// Statistics over any [`BookRead`] implementor.
///
/// ## Example
///
/// ```
/// use dense_book::{Analytics, Level, OrderBook, Side, View};
///
/// let mut book = OrderBook::new(8);
/// book.insert(Side::Bid, Level::new(100, 30, 0, 1)).unwrap();
/// book.insert(Side::Ask, Level::new(102, 10, 0, 2)).unwrap();
///
/// assert_eq!(book.midpoint(View::Raw), Some(101.0));
/// assert_eq!(book.spread(View::Raw), Some(2));
/// assert_eq!(book.imbalance(View::Raw), Some(0.5));
/// ```
pub trait Analytics: BookRead {
    /// Best bid price in `view`
    fn best_bid(&self, view: View) -> Option<i64> {
        self.price(Side::Bid, 0, view)
    }

    /// Best ask price in `view`
    fn best_ask(&self, view: View) -> Option<i64> {
        self.price(Side::Ask, 0, view)
    }

    /// True if both sides have a level and the best bid is at or above the best ask
    fn is_crossed(&self, view: View) -> bool {
        match (self.best_bid(view), self.best_ask(view)) {
            (Some(bid), Some(ask)) => bid >= ask,
            _ => false,
        }
    }

    /// Top-of-book midpoint
    fn midpoint(&self, view: View) -> Option<f64> {
        let bid = self.best_bid(view)?;
        let ask = self.best_ask(view)?;
        Some((bid as f64 + ask as f64) / 2.0)
    }

    /// Mean of the two sides' VWAP over levels `[start, end)`
    ///
    /// Not an approximation of [`midpoint`](Analytics::midpoint): it weighs
    /// every level in the range.
    fn midpoint_range(&self, start: usize, end: usize, view: View) -> Option<f64> {
        let bid = self.vwap(Side::Bid, start, end, view)?;
        let ask = self.vwap(Side::Ask, start, end, view)?;
        Some((bid + ask) / 2.0)
    }

    /// Best ask minus best bid
    ///
    /// Negative while the market is crossed; only the uncrossed view rules
    /// that out.
    ///
    /// `None` as well if the difference does not fit in an `i64`.
    fn spread(&self, view: View) -> Option<i64> {
        let bid = self.best_bid(view)?;
        let ask = self.best_ask(view)?;
        ask.checked_sub(bid)
    }

    /// Ask VWAP minus bid VWAP over levels `[start, end)`
    fn spread_range(&self, start: usize, end: usize, view: View) -> Option<f64> {
        let bid = self.vwap(Side::Bid, start, end, view)?;
        let ask = self.vwap(Side::Ask, start, end, view)?;
        Some(ask - bid)
    }

    /// Volume-weighted average price of levels `[start, min(end, count))`
    ///
    /// `None` for an empty range or a non-positive total size.
    fn vwap(&self, side: Side, start: usize, end: usize, view: View) -> Option<f64> {
        let end = end.min(self.view_depth(side, view));
        let mut value = 0.0;
        let mut volume: i128 = 0;
        for level in start..end {
            let entry = self.level(side, level, view)?;
            value += entry.price as f64 * entry.size as f64;
            volume += i128::from(entry.size);
        }
        (volume > 0).then(|| value / volume as f64)
    }

    /// VWAP over every level of `side` in `view`
    fn vwap_side(&self, side: Side, view: View) -> Option<f64> {
        self.vwap(side, 0, self.view_depth(side, view), view)
    }

    /// Normalized top-of-book size difference in `[-1, 1]`
    ///
    /// `Some(0.0)` when both top sizes are zero.
    fn imbalance(&self, view: View) -> Option<f64> {
        let bid = i128::from(self.size(Side::Bid, 0, view)?);
        let ask = i128::from(self.size(Side::Ask, 0, view)?);
        let total = bid + ask;
        if total == 0 {
            return Some(0.0);
        }
        Some((bid - ask) as f64 / total as f64)
    }
}

impl<B: BookRead + ?Sized> Analytics for B {}

// ============================================================================
// Unit Tests
// ============================================================================
