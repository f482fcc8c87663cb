//! Tick price conversion utilities.
//!
//! ## Overview
//!
//! The book stores prices as signed integer ticks and never does decimal
//! arithmetic itself. When a human needs to read a price, the tick count is
//! rendered with a fixed number of decimal places (the price scale).
//!
//! ## Examples
//!
//! ```
//! use dense_book::types::price::{format_ticks, to_ticks};
//!
//! // 101.25 with two decimal places is 10_125 ticks
//! let ticks = to_ticks("101.25", 2).unwrap();
//! assert_eq!(ticks, 10_125);
//!
//! assert_eq!(format_ticks(ticks, 2), "101.25");
//! ```

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Largest scale `rust_decimal` can represent.
pub const MAX_PRICE_SCALE: u32 = 28;

// ============================================================================
// Conversion Functions
// ============================================================================

/// Convert a decimal string to ticks at `scale` decimal places
///
/// # Returns
///
/// * `Some(i64)` - The tick count, rounded to the nearest tick
/// * `None` - If parsing fails, the scale is too large, or the value is out of range
///
/// # Example
///
/// ```
/// use dense_book::types::price::to_ticks;
///
/// assert_eq!(to_ticks("1.0", 8), Some(100_000_000));
/// assert_eq!(to_ticks("-0.5", 1), Some(-5));
/// assert_eq!(to_ticks("abc", 2), None);
/// ```
pub fn to_ticks(s: &str, scale: u32) -> Option<i64> {
    let decimal = Decimal::from_str(s).ok()?;
    decimal_to_ticks(decimal, scale)
}

/// Convert a Decimal to ticks at `scale` decimal places
pub fn decimal_to_ticks(d: Decimal, scale: u32) -> Option<i64> {
    if scale > MAX_PRICE_SCALE {
        return None;
    }

    let factor = Decimal::from_i128_with_scale(10i128.pow(scale), 0);
    let scaled = d.checked_mul(factor)?;
    scaled.round_dp(0).to_i64()
}

/// Convert ticks to a Decimal with `scale` decimal places
///
/// Returns `None` if the scale is too large.
pub fn ticks_to_decimal(ticks: i64, scale: u32) -> Option<Decimal> {
    if scale > MAX_PRICE_SCALE {
        return None;
    }
    Some(Decimal::new(ticks, scale))
}

/// Render ticks with exactly `scale` decimal places
///
/// Scales beyond [`MAX_PRICE_SCALE`] fall back to the raw tick count.
///
/// # Example
///
/// ```
/// use dense_book::types::price::format_ticks;
///
/// assert_eq!(format_ticks(10_050, 2), "100.50");
/// assert_eq!(format_ticks(-7, 0), "-7");
/// ```
pub fn format_ticks(ticks: i64, scale: u32) -> String {
    match ticks_to_decimal(ticks, scale) {
        Some(decimal) => decimal.to_string(),
        None => ticks.to_string(),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_ticks_basic() {
        assert_eq!(to_ticks("1", 0), Some(1));
        assert_eq!(to_ticks("1.0", 2), Some(100));
        assert_eq!(to_ticks("0.01", 2), Some(1));
        assert_eq!(to_ticks("50000.12345678", 8), Some(5_000_012_345_678));
    }

    #[test]
    fn test_to_ticks_rounds_to_nearest() {
        assert_eq!(to_ticks("1.006", 2), Some(101));
        assert_eq!(to_ticks("1.004", 2), Some(100));
    }

    #[test]
    fn test_to_ticks_edge_cases() {
        assert_eq!(to_ticks("0", 4), Some(0));
        assert_eq!(to_ticks("-2.5", 1), Some(-25));
        assert_eq!(to_ticks("", 2), None);
        assert_eq!(to_ticks("1.0", MAX_PRICE_SCALE + 1), None);
    }

    #[test]
    fn test_format_ticks() {
        assert_eq!(format_ticks(100, 0), "100");
        assert_eq!(format_ticks(100, 2), "1.00");
        assert_eq!(format_ticks(12_345, 3), "12.345");
        assert_eq!(format_ticks(-150, 2), "-1.50");
        assert_eq!(format_ticks(42, MAX_PRICE_SCALE + 1), "42");
    }

    #[test]
    fn test_roundtrip() {
        let values = ["1.00", "0.50", "101.25", "-3.75"];

        for s in values {
            let ticks = to_ticks(s, 2).unwrap();
            assert_eq!(format_ticks(ticks, 2), s, "Roundtrip failed for {}", s);
        }
    }
}
