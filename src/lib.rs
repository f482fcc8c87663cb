//! # Dense Book
//!
//! A dense, allocation-free limit order book for one instrument.
//!
//! ## Architecture
//!
//! The whole two-sided book lives in one contiguous `[i64]` buffer:
//! - **Raw levels**: one slot per resting order, price-time sorted per side
//! - **Collapsed pointers**: the first raw slot of each distinct price
//! - **Uncrossed pointers**: collapsed levels that do not cross the other side
//!
//! Sections are found by computed offsets ([`layout`]), never by references,
//! so a copy of the buffer can cross a thread, process or storage boundary and
//! be queried on the other side through a [`BookView`].
//!
//! ## Modules
//!
//! - **Layout**: offset calculus for every section
//! - **Engine**: mutation, collapse, uncross and compaction algorithms
//! - **OrderBook**: owning book, shared read surface, analytics, debug dump
//! - **Snapshot**: SSZ transfer format with SHA-256 digest
//!
//! ## Design Principles
//!
//! 1. **No allocation after construction**: mutations shift cells in place
//! 2. **Integer ticks**: prices and sizes are `i64`; only analytics yield `f64`
//! 3. **One absence signal**: missing levels and empty statistics are `None`
//! 4. **Explicit uncross**: the uncrossed view is rebuilt only on request

// ============================================================================
// Module declarations
// ============================================================================

/// Error type and result alias
pub mod error;

/// Book configuration
pub mod config;

/// Core value types: Side, View, Level
pub mod types;

/// Buffer layout calculus
pub mod layout;

/// Buffer algorithms: mutation, collapse, uncross, compaction
pub mod engine;

/// Owning book and read surface
pub mod orderbook;

/// SSZ transfer snapshot
pub mod snapshot;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use config::BookConfig;
pub use engine::{realize, uncross_in_place};
pub use error::{BookError, Result};
pub use layout::Layout;
pub use orderbook::{Analytics, BookRead, BookView, OrderBook};
pub use snapshot::BookSnapshot;
pub use types::{Level, Side, View};
