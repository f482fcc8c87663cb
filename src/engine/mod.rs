//! Buffer algorithms.
//!
//! Everything here works on a bare `&mut [i64]` plus its [`Layout`]:
//!
//! - [`mutation`]: sorted insert, removal and in-place modification
//! - [`collapse`]: rebuild of the per-price pointer arrays
//! - [`uncross`]: rebuild of the uncrossed pointer arrays
//! - [`compact`]: repacking into a live-sized buffer
//!
//! [`Layout`]: crate::layout::Layout

pub mod collapse;
pub mod compact;
pub mod mutation;
pub mod uncross;

pub use compact::realize;
pub use uncross::uncross_in_place;
