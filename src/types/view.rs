//! View selection for book queries.

use crate::error::{BookError, Result};

/// Which projection of a side a query reads.
///
/// - `Raw`: one entry per resting order
/// - `Collapsed`: one entry per distinct price
/// - `Uncrossed`: collapsed entries that do not cross the opposite side
///
/// The uncrossed view is always built on the collapsed one, so there is no
/// way to name "uncrossed but not collapsed" with this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum View {
    #[default]
    Raw,
    Collapsed,
    Uncrossed,
}

impl View {
    /// All views, in dependency order.
    pub const ALL: [View; 3] = [View::Raw, View::Collapsed, View::Uncrossed];

    /// Build a view from the `(collapse, uncross)` flag pair used by callers
    /// that carry the selection as two booleans.
    ///
    /// # Errors
    ///
    /// `InvalidViewCombination` for `(false, true)`.
    ///
    /// # Example
    ///
    /// ```
    /// use dense_book::types::View;
    ///
    /// assert_eq!(View::from_flags(true, true).unwrap(), View::Uncrossed);
    /// assert!(View::from_flags(false, true).is_err());
    /// ```
    pub fn from_flags(collapse: bool, uncross: bool) -> Result<Self> {
        match (collapse, uncross) {
            (false, false) => Ok(View::Raw),
            (true, false) => Ok(View::Collapsed),
            (true, true) => Ok(View::Uncrossed),
            (false, true) => Err(BookError::InvalidViewCombination),
        }
    }

    /// True for views that go through a pointer array.
    #[inline]
    pub fn is_collapsed(self) -> bool {
        !matches!(self, View::Raw)
    }

    /// Suffix used by the debug dump header.
    pub fn label(self) -> &'static str {
        match self {
            View::Raw => "RAW",
            View::Collapsed => "COLLAPSED",
            View::Uncrossed => "UNCROSS",
        }
    }
}
