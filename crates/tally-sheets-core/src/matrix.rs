//! Sparse matrix storage
//!
//! This module provides a sparse associative store keyed by (row, column).
//! Only cells that have been explicitly set are stored, using a row-based
//! BTreeMap structure, so absence is distinct from any stored value
//! (including zero).

use std::collections::BTreeMap;

/// Sparse row-based 2D store
///
/// Design decisions:
/// - Uses BTreeMap for ordered iteration: [`SparseMatrix::for_each`] and
///   [`SparseMatrix::iter`] visit rows ascending and columns ascending
///   within a row. The range-merge histogram relies on this so that a cell's
///   upper neighbor has always been visited first.
/// - Presence in the map is the existence signal; removing an entry is
///   different from storing a sentinel value.
///
/// Structure: `BTreeMap<row_index, BTreeMap<col_index, T>>`
#[derive(Debug, Clone, Default)]
pub struct SparseMatrix<T> {
    rows: BTreeMap<u32, BTreeMap<u16, T>>,
}

impl<T> SparseMatrix<T> {
    /// Create a new empty matrix
    pub fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
        }
    }

    /// Get the value at (row, col), if present
    pub fn get(&self, row: u32, col: u16) -> Option<&T> {
        self.rows.get(&row)?.get(&col)
    }

    /// Get a mutable reference to the value at (row, col), if present
    pub fn get_mut(&mut self, row: u32, col: u16) -> Option<&mut T> {
        self.rows.get_mut(&row)?.get_mut(&col)
    }

    /// Check whether a value is present at (row, col)
    pub fn contains(&self, row: u32, col: u16) -> bool {
        self.get(row, col).is_some()
    }

    /// Store a value at (row, col), returning the previous value if any
    pub fn insert(&mut self, row: u32, col: u16, value: T) -> Option<T> {
        self.rows.entry(row).or_default().insert(col, value)
    }

    /// Remove the entry at (row, col) entirely, returning its value
    ///
    /// Emptied row maps are pruned so iteration never visits ghost rows.
    pub fn remove(&mut self, row: u32, col: u16) -> Option<T> {
        let row_map = self.rows.get_mut(&row)?;
        let value = row_map.remove(&col);
        if row_map.is_empty() {
            self.rows.remove(&row);
        }
        value
    }

    /// Number of present entries
    pub fn len(&self) -> usize {
        self.rows.values().map(|r| r.len()).sum()
    }

    /// Check if the matrix has no entries
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Remove all entries
    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Row indices that currently hold at least one entry, ascending
    pub fn row_indices(&self) -> Vec<u32> {
        self.rows.keys().copied().collect()
    }

    /// Column indices present in a row, ascending
    pub fn columns_in_row(&self, row: u32) -> Vec<u16> {
        self.rows
            .get(&row)
            .map(|r| r.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Visit every present entry, rows ascending then columns ascending
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(u32, u16, &T),
    {
        for (&row, cols) in &self.rows {
            for (&col, value) in cols {
                f(row, col, value);
            }
        }
    }

    /// Iterate over `(row, col, &value)` in the same order as
    /// [`SparseMatrix::for_each`]
    pub fn iter(&self) -> impl Iterator<Item = (u32, u16, &T)> {
        self.rows
            .iter()
            .flat_map(|(&row, cols)| cols.iter().map(move |(&col, value)| (row, col, value)))
    }
}
