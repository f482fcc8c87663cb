//! Book configuration.
//!
//! ## Example
//!
//! ```
//! use dense_book::BookConfig;
//!
//! let config = BookConfig::new(32).with_price_scale(2);
//! assert!(config.validate().is_ok());
//!
//! assert!(BookConfig::new(0).validate().is_err());
//! ```

use crate::error::{BookError, Result};
use crate::layout::MAX_CAPACITY;
use crate::types::price::MAX_PRICE_SCALE;

/// Default max levels per side
pub const DEFAULT_CAPACITY: usize = 64;

/// Parameters fixed for the lifetime of an [`OrderBook`](crate::OrderBook).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookConfig {
    /// Max levels per side
    pub capacity: usize,

    /// Decimal places used to render tick prices in dumps
    pub price_scale: u32,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            price_scale: 0,
        }
    }
}

impl BookConfig {
    /// Config for `capacity` levels per side with integer price rendering
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    /// Set the dump price scale
    pub fn with_price_scale(mut self, price_scale: u32) -> Self {
        self.price_scale = price_scale;
        self
    }

    /// Check the config against the crate limits.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the capacity is outside `1..=MAX_CAPACITY` or the
    /// price scale exceeds `MAX_PRICE_SCALE`.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 || self.capacity > MAX_CAPACITY {
            return Err(BookError::InvalidConfig(format!(
                "capacity {} outside 1..={}",
                self.capacity, MAX_CAPACITY
            )));
        }
        if self.price_scale > MAX_PRICE_SCALE {
            return Err(BookError::InvalidConfig(format!(
                "price scale {} exceeds {}",
                self.price_scale, MAX_PRICE_SCALE
            )));
        }
        Ok(())
    }
}
