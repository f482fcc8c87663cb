//! Order book module: the owning book and the shared read surface.
//!
//! ## Components
//!
//! - [`OrderBook`]: owns a buffer and is the only mutator
//! - [`BookView`]: validated, borrowed view over any buffer with the layout
//! - [`BookRead`]: level accessors shared by both
//! - [`Analytics`]: midpoint, spread, VWAP and imbalance over any [`BookRead`]
//! - [`Dump`]: human-readable listing of one side
//!
//! ## Complexity
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | Insert / remove | O(depth) |
//! | Modify by level | O(1) |
//! | Raw / collapsed price lookup | O(1) |
//! | Collapsed size lookup | O(group size) |
//! | Id-scoped lookup | O(depth) |
//! | Uncross | O(bid prices x ask prices) |
//!
//! ## Example
//!
//! ```
//! use dense_book::orderbook::{Analytics, BookRead, OrderBook};
//! use dense_book::types::{Level, Side, View};
//!
//! let mut book = OrderBook::new(16);
//! book.insert(Side::Bid, Level::new(100, 10, 0, 1)).unwrap();
//! book.insert(Side::Ask, Level::new(102, 10, 0, 2)).unwrap();
//!
//! assert_eq!(book.best_bid(View::Raw), Some(100));
//! assert_eq!(book.midpoint(View::Collapsed), Some(101.0));
//! ```

pub mod analytics;
pub mod book;
pub mod dump;
pub mod view;

pub use analytics::Analytics;
pub use book::OrderBook;
pub use dump::Dump;
pub use view::{BookRead, BookView, Levels};
