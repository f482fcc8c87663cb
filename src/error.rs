//! Error types for the dense order book.
//!
//! Missing levels are never errors: accessors return `None` for them. The
//! variants below cover rejected mutations, malformed buffers and snapshot
//! codec failures.

use thiserror::Error;

use crate::types::Side;

/// Result type alias for book operations.
pub type Result<T> = std::result::Result<T, BookError>;

/// Main error type for book operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookError {
    /// Insert attempted while the side already holds `capacity` levels
    #[error("{side:?} side is full (capacity {capacity})")]
    CapacityExceeded { side: Side, capacity: usize },

    /// Removal or modification referenced a level at or beyond the live depth
    #[error("level {level} out of range on {side:?} side (depth {depth})")]
    IndexOutOfRange {
        side: Side,
        level: usize,
        depth: usize,
    },

    /// Uncrossed view requested without the collapsed view
    #[error("uncrossed view requires the collapsed view")]
    InvalidViewCombination,

    /// Buffer length is not `6 + 12 * capacity`
    #[error("buffer length {0} does not match any capacity")]
    InvalidLength(usize),

    /// Header counters or stored pointers violate the layout contract
    #[error("corrupt book buffer: {0}")]
    CorruptBuffer(String),

    /// Rejected book configuration
    #[error("invalid book config: {0}")]
    InvalidConfig(String),

    /// SSZ encoding or decoding of a snapshot failed
    #[error("snapshot codec error: {0}")]
    Codec(String),
}

impl BookError {
    /// Create a corrupt-buffer error from any string-like reason.
    pub fn corrupt(reason: impl Into<String>) -> Self {
        BookError::CorruptBuffer(reason.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BookError::CapacityExceeded {
            side: Side::Bid,
            capacity: 5,
        };
        assert_eq!(err.to_string(), "Bid side is full (capacity 5)");

        let err = BookError::IndexOutOfRange {
            side: Side::Ask,
            level: 3,
            depth: 2,
        };
        assert_eq!(
            err.to_string(),
            "level 3 out of range on Ask side (depth 2)"
        );
    }

    #[test]
    fn test_corrupt_helper() {
        let err = BookError::corrupt("bad pointer");
        assert_eq!(err, BookError::CorruptBuffer("bad pointer".to_string()));
        assert_eq!(err.to_string(), "corrupt book buffer: bad pointer");
    }
}
