//! Debug dump of one side of a book.
//!
//! Diagnostic only, not a wire format:
//!
//! ```text
//! BID_COLLAPSED:
//! L0 -> P:100, S:15, T:1, ID:1
//! L1 -> P:99, S:20, T:3, ID:3
//! ```

use std::fmt;

use crate::orderbook::BookRead;
use crate::types::price::format_ticks;
use crate::types::{Side, View};

/// `Display` adapter listing every level of one side in one view.
pub struct Dump<'a, B: ?Sized> {
    book: &'a B,
    side: Side,
    view: View,
}

impl<'a, B: BookRead + ?Sized> Dump<'a, B> {
    pub(crate) fn new(book: &'a B, side: Side, view: View) -> Self {
        Self { book, side, view }
    }
}

impl<B: BookRead + ?Sized> fmt::Display for Dump<'_, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scale = self.book.price_scale();
        writeln!(f, "{}_{}:", self.side.label(), self.view.label())?;
        for (i, level) in self.book.levels(self.side, self.view).enumerate() {
            writeln!(
                f,
                "L{} -> P:{}, S:{}, T:{}, ID:{}",
                i,
                format_ticks(level.price, scale),
                level.size,
                level.timestamp,
                level.order_id
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::config::BookConfig;
    use crate::orderbook::{BookRead, OrderBook};
    use crate::types::{Level, Side, View};

    #[test]
    fn test_dump_collapsed() {
        let mut book = OrderBook::new(5);
        book.insert(Side::Bid, Level::new(100, 10, 1, 1)).unwrap();
        book.insert(Side::Bid, Level::new(100, 5, 2, 2)).unwrap();
        book.insert(Side::Bid, Level::new(99, 20, 3, 3)).unwrap();

        let text = book.dump(Side::Bid, View::Collapsed).to_string();
        assert_eq!(
            text,
            "BID_COLLAPSED:\nL0 -> P:100, S:15, T:1, ID:1\nL1 -> P:99, S:20, T:3, ID:3\n"
        );
    }

    #[test]
    fn test_dump_empty_side() {
        let book = OrderBook::new(2);
        let dump = book.dump(Side::Ask, View::Uncrossed);
        assert_eq!(dump.to_string(), "ASK_UNCROSS:\n");
    }

    #[test]
    fn test_dump_uses_price_scale() {
        let config = BookConfig::new(2).with_price_scale(2);
        let mut book = OrderBook::with_config(config).unwrap();
        book.insert(Side::Ask, Level::new(10_125, 3, 0, 9)).unwrap();

        assert_eq!(
            book.dump(Side::Ask, View::Raw).to_string(),
            "ASK_RAW:\nL0 -> P:101.25, S:3, T:0, ID:9\n"
        );
    }
}
