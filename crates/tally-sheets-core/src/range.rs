//! Rectangular cell range type
//!
//! Ranges are inclusive on all four bounds and zero-based, so a single cell
//! is the range whose start and end coincide. A range of zero area cannot be
//! constructed.

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An inclusive rectangle of cells, addressed by zero-based row and column
/// indices.
///
/// Invariant: `start_row <= end_row` and `start_column <= end_column`.
/// [`GridRange::new`] rejects reversed bounds instead of normalizing them;
/// the merge algorithm treats a reversed range as a caller bug, and silently
/// swapping the bounds would hide it.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridRange {
    /// First row covered by the range
    pub start_row: u32,
    /// Last row covered by the range (inclusive)
    pub end_row: u32,
    /// First column covered by the range
    pub start_column: u16,
    /// Last column covered by the range (inclusive)
    pub end_column: u16,
}

impl GridRange {
    /// Create a new range, rejecting reversed or out-of-limit bounds
    pub fn new(start_row: u32, start_column: u16, end_row: u32, end_column: u16) -> Result<Self> {
        if start_row > end_row {
            return Err(Error::InvalidRange(format!(
                "start row {} past end row {}",
                start_row, end_row
            )));
        }
        if start_column > end_column {
            return Err(Error::InvalidRange(format!(
                "start column {} past end column {}",
                start_column, end_column
            )));
        }
        if end_row >= MAX_ROWS {
            return Err(Error::RowOutOfBounds(end_row, MAX_ROWS - 1));
        }
        if end_column >= MAX_COLS {
            return Err(Error::ColumnOutOfBounds(end_column, MAX_COLS - 1));
        }

        Ok(Self {
            start_row,
            end_row,
            start_column,
            end_column,
        })
    }

    /// Create a single-cell range
    pub fn single(row: u32, column: u16) -> Result<Self> {
        Self::new(row, column, row, column)
    }

    /// Check whether the range invariant holds
    ///
    /// Ranges built through [`GridRange::new`] always satisfy it; this exists
    /// for validating ranges assembled directly from public fields.
    pub fn is_well_formed(&self) -> bool {
        self.start_row <= self.end_row && self.start_column <= self.end_column
    }

    /// Check if a cell is within this range
    pub fn contains(&self, row: u32, column: u16) -> bool {
        row >= self.start_row
            && row <= self.end_row
            && column >= self.start_column
            && column <= self.end_column
    }

    /// Get the number of rows in the range
    pub fn row_count(&self) -> u32 {
        self.end_row - self.start_row + 1
    }

    /// Get the number of columns in the range
    pub fn col_count(&self) -> u16 {
        self.end_column - self.start_column + 1
    }

    /// Get the total number of cells in the range
    pub fn cell_count(&self) -> u64 {
        self.row_count() as u64 * self.col_count() as u64
    }

    /// Check if this range overlaps with another
    pub fn overlaps(&self, other: &GridRange) -> bool {
        self.start_row <= other.end_row
            && self.end_row >= other.start_row
            && self.start_column <= other.end_column
            && self.end_column >= other.start_column
    }

    /// Get the intersection of two ranges, if any
    pub fn intersect(&self, other: &GridRange) -> Option<GridRange> {
        if !self.overlaps(other) {
            return None;
        }

        Some(GridRange {
            start_row: self.start_row.max(other.start_row),
            end_row: self.end_row.min(other.end_row),
            start_column: self.start_column.max(other.start_column),
            end_column: self.end_column.min(other.end_column),
        })
    }

    /// Iterate over all cells in the range, rows ascending and columns
    /// ascending within each row
    pub fn cells(&self) -> GridRangeIterator {
        GridRangeIterator {
            range: *self,
            current_row: self.start_row,
            current_col: self.start_column,
            done: false,
        }
    }

    /// Convert column index to letters (0 = A, 25 = Z, 26 = AA, etc.)
    pub fn column_to_letters(col: u16) -> String {
        let mut result = String::new();
        let mut n = col as u32 + 1; // 1-based for calculation

        while n > 0 {
            n -= 1;
            let c = ((n % 26) as u8 + b'A') as char;
            result.insert(0, c);
            n /= 26;
        }

        result
    }

    /// Format as A1:B10 string
    pub fn to_a1_string(&self) -> String {
        let start = format!(
            "{}{}",
            Self::column_to_letters(self.start_column),
            self.start_row + 1
        );
        if self.start_row == self.end_row && self.start_column == self.end_column {
            start
        } else {
            format!(
                "{}:{}{}",
                start,
                Self::column_to_letters(self.end_column),
                self.end_row + 1
            )
        }
    }
}

impl fmt::Display for GridRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

/// Iterator over cells in a range
pub struct GridRangeIterator {
    range: GridRange,
    current_row: u32,
    current_col: u16,
    done: bool,
}

impl Iterator for GridRangeIterator {
    type Item = (u32, u16);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let cell = (self.current_row, self.current_col);

        // Move to next cell
        if self.current_col < self.range.end_column {
            self.current_col += 1;
        } else if self.current_row < self.range.end_row {
            self.current_col = self.range.start_column;
            self.current_row += 1;
        } else {
            self.done = true;
        }

        Some(cell)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        let rows_left = (self.range.end_row - self.current_row) as u64;
        let remaining = rows_left * self.range.col_count() as u64
            + (self.range.end_column - self.current_col) as u64
            + 1;
        (remaining as usize, Some(remaining as usize))
    }
}
