//! Transfer snapshot of a compacted book.
//!
//! ## SSZ Layout
//!
//! A snapshot is a fixed SSZ container:
//! - `capacity`: u64, the capacity the cells are laid out for
//! - `cells`: `List<u64, MAX_SNAPSHOT_CELLS>`, the book cells bit-cast from i64
//!
//! ## Digest
//!
//! [`BookSnapshot::digest`] is a SHA-256 over the little-endian bytes of the
//! cells. Two books with the same live levels and views compact to the same
//! cells and therefore the same digest, whatever their original capacity.

use sha2::{Digest, Sha256};
use ssz_rs::prelude::*;

use crate::error::{BookError, Result as BookResult};
use crate::layout::{Layout, MAX_CAPACITY};
use crate::orderbook::OrderBook;

/// Largest cell count a snapshot can carry
pub const MAX_SNAPSHOT_CELLS: usize = Layout::new(MAX_CAPACITY).len();

/// SSZ-encodable compacted book.
///
/// ## Example
///
/// ```
/// use dense_book::{BookRead, BookSnapshot, Level, OrderBook, Side};
///
/// let mut book = OrderBook::new(32);
/// book.insert(Side::Bid, Level::new(99, 5, 1, 1)).unwrap();
/// book.insert(Side::Ask, Level::new(101, 5, 2, 2)).unwrap();
///
/// let bytes = book.snapshot().unwrap().to_bytes().unwrap();
/// let restored = BookSnapshot::from_bytes(&bytes).unwrap().into_book().unwrap();
///
/// assert_eq!(restored.cells(), book.compact().unwrap().as_slice());
/// ```
#[derive(Debug, Clone, PartialEq, Default, SimpleSerialize)]
pub struct BookSnapshot {
    /// Capacity the cells are laid out for
    pub capacity: u64,

    /// Book cells, bit-cast from i64
    pub cells: List<u64, MAX_SNAPSHOT_CELLS>,
}

impl BookSnapshot {
    /// Wrap a book buffer.
    ///
    /// # Errors
    ///
    /// - `InvalidLength` if `cells` matches no capacity
    /// - `Codec` if it exceeds [`MAX_SNAPSHOT_CELLS`]
    pub fn from_cells(cells: &[i64]) -> BookResult<Self> {
        let layout = Layout::from_len(cells.len())?;
        let raw: Vec<u64> = cells.iter().map(|&c| c as u64).collect();
        let cells = List::<u64, MAX_SNAPSHOT_CELLS>::try_from(raw).map_err(|_| {
            BookError::Codec(format!(
                "{} cells exceed snapshot limit {}",
                layout.len(),
                MAX_SNAPSHOT_CELLS
            ))
        })?;
        Ok(Self {
            capacity: layout.capacity() as u64,
            cells,
        })
    }

    /// The book cells as i64
    pub fn to_cells(&self) -> Vec<i64> {
        self.cells.iter().map(|&c| c as i64).collect()
    }

    /// Restore an [`OrderBook`] from the snapshot.
    ///
    /// # Errors
    ///
    /// `CorruptBuffer` if the declared capacity disagrees with the cell count,
    /// or any validation error of [`OrderBook::from_cells`].
    pub fn into_book(self) -> BookResult<OrderBook> {
        let cells = self.to_cells();
        let layout = Layout::from_len(cells.len())?;
        if layout.capacity() as u64 != self.capacity {
            return Err(BookError::corrupt(format!(
                "snapshot declares capacity {} but carries {} cells",
                self.capacity,
                cells.len()
            )));
        }
        OrderBook::from_cells(cells)
    }

    /// SSZ-encode the snapshot
    pub fn to_bytes(&self) -> BookResult<Vec<u8>> {
        ssz_rs::serialize(self).map_err(|e| BookError::Codec(format!("{:?}", e)))
    }

    /// Decode an SSZ-encoded snapshot
    pub fn from_bytes(bytes: &[u8]) -> BookResult<Self> {
        ssz_rs::deserialize::<Self>(bytes).map_err(|e| BookError::Codec(format!("{:?}", e)))
    }

    /// SHA-256 over the little-endian cell bytes
    pub fn digest(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        for cell in self.cells.iter() {
            hasher.update(cell.to_le_bytes());
        }
        let result = hasher.finalize();

        let mut digest = [0u8; 32];
        digest.copy_from_slice(&result);
        digest
    }

    /// Digest as a hex string
    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
