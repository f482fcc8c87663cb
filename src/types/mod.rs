//! Core value types for the dense book
//!
//! ## Types
//!
//! - [`Side`]: Bid or Ask
//! - [`View`]: Raw, Collapsed or Uncrossed projection of a side
//! - [`Level`]: The four-field record stored in each raw slot
//! - [`Field`]: Field positions inside a slot
//!
//! ## Integer Ticks
//!
//! Prices and sizes are plain `i64` tick counts. The [`price`] module renders
//! them as decimals for display only.

mod level;
pub mod price;
mod side;
mod view;

// Re-export all types at module level
pub use level::{Field, Level};
pub use side::Side;
pub use view::View;
