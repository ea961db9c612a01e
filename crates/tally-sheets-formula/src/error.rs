//! Formula value error types

use thiserror::Error;

/// Result type for formula value operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors that can occur when building or combining formula values
///
/// These are precondition violations on the Rust API surface. Spreadsheet
/// level failures (division by zero, bad coercions) are not represented
/// here; they are reified as [`crate::CellError`] values inside the value
/// model instead.
#[derive(Debug, Error)]
pub enum FormulaError {
    /// Grid rows of unequal width passed to an array constructor
    #[error("Ragged grid: row {row} has {actual} columns, expected {expected}")]
    RaggedGrid {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// Mask array dimensions do not match the source array
    #[error("Shape mismatch: mask is {mask_rows}x{mask_cols}, source is {rows}x{cols}")]
    ShapeMismatch {
        rows: usize,
        cols: usize,
        mask_rows: usize,
        mask_cols: usize,
    },

    /// Grid with no rows or no columns passed to an array constructor
    #[error("Empty grid: arrays must hold at least one cell")]
    EmptyGrid,
}
