//! # tally-sheets-core
//!
//! Core grid primitives for the tally-sheets spreadsheet engine:
//! - [`GridRange`] - Inclusive rectangular cell ranges
//! - [`SparseMatrix`] - Sparse row/column keyed storage
//! - [`merge_ranges`] - Compaction of fragmented range lists into maximal
//!   rectangles
//!
//! ## Example
//!
//! ```rust
//! use tally_sheets_core::{merge_ranges, GridRange};
//!
//! // Two adjacent fragments collapse into one rectangle.
//! let left = GridRange::new(0, 0, 2, 1).unwrap();
//! let right = GridRange::new(0, 2, 2, 3).unwrap();
//!
//! let merged = merge_ranges(&[left, right]).unwrap();
//! assert_eq!(merged, vec![GridRange::new(0, 0, 2, 3).unwrap()]);
//! ```

pub mod error;
pub mod matrix;
pub mod merge;
pub mod range;

// Re-exports for convenience
pub use error::{Error, Result};
pub use matrix::SparseMatrix;
pub use merge::merge_ranges;
pub use range::GridRange;

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;
