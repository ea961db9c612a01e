//! 2D array values
//!
//! [`ArrayValue`] is the grid-shaped variant of the value model: a
//! rectangular block of [`Value`]s with the coordinates it was read from,
//! supporting numpy-style slicing, statistical reduction, and boolean-masked
//! picking. Like scalar values it is immutable; every operation returns a
//! new array.

use std::fmt;

use tally_sheets_core::GridRange;

use crate::error::{FormulaError, FormulaResult};
use crate::value::{CellError, RawValue, Value};

/// Where an array's values were read from, for correlating results back to
/// source cells
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArrayOrigin {
    /// Workbook unit the values came from
    pub unit_id: String,
    /// Sheet within the unit
    pub sheet_id: String,
    /// Row of the top-left source cell
    pub row: u32,
    /// Column of the top-left source cell
    pub column: u16,
}

impl ArrayOrigin {
    /// Create an origin pointing at a cell of a sheet
    pub fn new<U: Into<String>, S: Into<String>>(
        unit_id: U,
        sheet_id: S,
        row: u32,
        column: u16,
    ) -> Self {
        Self {
            unit_id: unit_id.into(),
            sheet_id: sheet_id.into(),
            row,
            column,
        }
    }
}

/// Index selection along one axis of a slice: `start`, `end` (exclusive),
/// and `step`, each optional
///
/// Defaults mirror sequence slicing: start 0, end at the axis length, step
/// 1. The selected indices are `start, start + step, ...` strictly below
/// `end`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AxisSlice {
    /// First selected index (default 0)
    pub start: Option<usize>,
    /// Exclusive upper bound (default: axis length)
    pub end: Option<usize>,
    /// Stride between selected indices (default 1; 0 is treated as 1)
    pub step: Option<usize>,
}

impl AxisSlice {
    /// Select from `start` to the end of the axis
    pub fn start_at(start: usize) -> Self {
        Self {
            start: Some(start),
            end: None,
            step: None,
        }
    }

    /// Select the half-open index range `start..end`
    pub fn span(start: usize, end: usize) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            step: None,
        }
    }

    /// Select every `step`-th index across the whole axis
    pub fn every(step: usize) -> Self {
        Self {
            start: None,
            end: None,
            step: Some(step),
        }
    }
}

/// A rectangular grid of typed values with origin metadata
///
/// Invariant: the grid is rectangular and `row_count() x column_count()`
/// always matches the stored values. The only zero-sized shape that can
/// exist is the 1x0 row produced by [`ArrayValue::pick`] with an all-false
/// mask.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayValue {
    values: Vec<Vec<Value>>,
    row_count: usize,
    column_count: usize,
    origin: ArrayOrigin,
}

impl ArrayValue {
    /// Build an array from already-typed values
    ///
    /// # Errors
    ///
    /// Rejects grids with no cells and grids whose rows differ in width.
    pub fn new(values: Vec<Vec<Value>>, origin: ArrayOrigin) -> FormulaResult<Self> {
        let row_count = values.len();
        let column_count = values.first().map(|r| r.len()).unwrap_or(0);
        if row_count == 0 || column_count == 0 {
            return Err(FormulaError::EmptyGrid);
        }
        for (row, cells) in values.iter().enumerate() {
            if cells.len() != column_count {
                return Err(FormulaError::RaggedGrid {
                    row,
                    expected: column_count,
                    actual: cells.len(),
                });
            }
        }

        Ok(Self {
            values,
            row_count,
            column_count,
            origin,
        })
    }

    /// Build an array from raw literals, classifying every cell through the
    /// value factory
    ///
    /// This is the standard on-ramp from cell reads: numeric text becomes
    /// numbers, boolean text becomes booleans, and so on.
    pub fn from_raw(rows: Vec<Vec<RawValue>>, origin: ArrayOrigin) -> FormulaResult<Self> {
        let values = rows
            .iter()
            .map(|row| row.iter().map(Value::from_raw).collect())
            .collect();
        Self::new(values, origin)
    }

    /// Internal constructor for the single-row shape, which is allowed to
    /// be empty
    fn single_row(cells: Vec<Value>, origin: ArrayOrigin) -> Self {
        Self {
            row_count: 1,
            column_count: cells.len(),
            values: vec![cells],
            origin,
        }
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// Originating coordinates
    pub fn origin(&self) -> &ArrayOrigin {
        &self.origin
    }

    /// Get the value at (row, col), if in bounds
    pub fn get(&self, row: usize, col: usize) -> Option<&Value> {
        self.values.get(row)?.get(col)
    }

    /// Iterate over all cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = &Value> {
        self.values.iter().flatten()
    }

    /// The source range these values were read from, if the origin and
    /// dimensions describe one
    pub fn source_range(&self) -> Option<GridRange> {
        if self.column_count == 0 {
            return None;
        }
        GridRange::new(
            self.origin.row,
            self.origin.column,
            self.origin.row + (self.row_count as u32 - 1),
            self.origin.column + (self.column_count as u16 - 1),
        )
        .ok()
    }

    /// Read the grid back as raw literals
    pub fn to_raw(&self) -> Vec<Vec<RawValue>> {
        self.values
            .iter()
            .map(|row| row.iter().map(Value::to_raw).collect())
            .collect()
    }

    /// Select a sub-array by row and column index ranges
    ///
    /// `None` for an axis selects everything on it. Returns `None` when a
    /// requested start index lies at or past the axis length, or when the
    /// selection holds no indices; a successful slice always has at least
    /// one cell.
    pub fn slice(&self, rows: Option<AxisSlice>, columns: Option<AxisSlice>) -> Option<ArrayValue> {
        let row_indices = resolve_axis(rows, self.row_count)?;
        let col_indices = resolve_axis(columns, self.column_count)?;

        let values: Vec<Vec<Value>> = row_indices
            .iter()
            .map(|&r| {
                col_indices
                    .iter()
                    .map(|&c| self.values[r][c].clone())
                    .collect()
            })
            .collect();

        Some(Self {
            row_count: values.len(),
            column_count: col_indices.len(),
            values,
            origin: self.origin.clone(),
        })
    }

    /// Numeric cells in row-major order
    ///
    /// Only `Number`-variant cells participate in statistics. Booleans,
    /// strings, and error cells are skipped rather than poisoning the
    /// aggregate; numeric-looking text was already classified as a number
    /// by the factory on the way in.
    fn numeric_cells(&self) -> impl Iterator<Item = f64> + '_ {
        self.cells().filter_map(|v| match v {
            Value::Number(n) => Some(*n),
            _ => None,
        })
    }

    /// Total of the numeric cells with accumulation noise stripped
    fn stripped_sum(&self) -> f64 {
        strip_error_margin(self.numeric_cells().sum())
    }

    /// Count of numeric cells
    pub fn count(&self) -> Value {
        Value::Number(self.numeric_cells().count() as f64)
    }

    /// Count of non-blank cells
    ///
    /// A cell is blank only when its display form is the empty string, so
    /// `" "`, `FALSE`, and `0` all count.
    pub fn count_a(&self) -> Value {
        let n = self.cells().filter(|v| !is_blank(v)).count();
        Value::Number(n as f64)
    }

    /// Count of blank cells
    pub fn count_blank(&self) -> Value {
        let n = self.cells().filter(|v| is_blank(v)).count();
        Value::Number(n as f64)
    }

    /// Sum of the numeric cells
    ///
    /// The total is normalized through [`strip_error_margin`], so a grid of
    /// clean decimal inputs sums to a clean decimal instead of surfacing
    /// IEEE representation noise.
    pub fn sum(&self) -> Value {
        Value::from_number(self.stripped_sum())
    }

    /// Arithmetic mean of the numeric cells; #DIV/0! when there are none
    ///
    /// The numerator is the same normalized total as [`ArrayValue::sum`];
    /// the quotient itself is not re-rounded.
    pub fn mean(&self) -> Value {
        let count = self.numeric_cells().count();
        if count == 0 {
            return Value::Error(CellError::Div0);
        }
        Value::from_number(self.stripped_sum() / count as f64)
    }

    /// Population variance of the numeric cells; #DIV/0! when there are
    /// none
    ///
    /// Divides by n, not n - 1.
    pub fn var(&self) -> Value {
        let mean = match self.mean() {
            Value::Number(m) => m,
            error => return error,
        };
        let count = self.numeric_cells().count();
        let squared: f64 = self.numeric_cells().map(|x| (x - mean) * (x - mean)).sum();
        Value::from_number(squared / count as f64)
    }

    /// Population standard deviation: the square root of [`ArrayValue::var`]
    /// over the identical numeric cell set
    pub fn std(&self) -> Value {
        match self.var() {
            Value::Number(v) => Value::Number(v.sqrt()),
            error => error,
        }
    }

    /// Element-wise numeric negation, preserving shape
    ///
    /// Numbers and booleans negate; error cells pass through unchanged;
    /// anything else becomes #VALUE! in that position. Booleans are
    /// deliberately treated as numeric (1/0, so `TRUE` negates to -1)
    /// rather than erroring, following the same coercion rule the
    /// aggregates use for them.
    pub fn negate(&self) -> Value {
        let values = self
            .values
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| match cell {
                        Value::Number(n) => Value::Number(-n),
                        Value::Boolean(true) => Value::Number(-1.0),
                        Value::Boolean(false) => Value::Number(0.0),
                        Value::Error(e) => Value::Error(*e),
                        _ => Value::Error(CellError::Value),
                    })
                    .collect()
            })
            .collect();

        Value::Array(Self {
            values,
            row_count: self.row_count,
            column_count: self.column_count,
            origin: self.origin.clone(),
        })
    }

    /// Select the cells where the mask is truthy, flattened into one row
    ///
    /// A mask cell selects when it is `TRUE` or the number 1; every other
    /// value, including other non-zero numbers and truthy-looking text,
    /// does not. Cells come out in the source's row-major scan order. An
    /// all-false mask produces a 1x0 array.
    ///
    /// # Errors
    ///
    /// The mask must have the same dimensions as the source array.
    pub fn pick(&self, mask: &ArrayValue) -> FormulaResult<ArrayValue> {
        if mask.row_count != self.row_count || mask.column_count != self.column_count {
            return Err(FormulaError::ShapeMismatch {
                rows: self.row_count,
                cols: self.column_count,
                mask_rows: mask.row_count,
                mask_cols: mask.column_count,
            });
        }

        let picked = self
            .cells()
            .zip(mask.cells())
            .filter(|(_, m)| is_mask_truthy(m))
            .map(|(v, _)| v.clone())
            .collect();

        Ok(Self::single_row(picked, self.origin.clone()))
    }
}

impl fmt::Display for ArrayValue {
    /// Formats in array-literal syntax: `{1,2;3,4}`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, row) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ";")?;
            }
            for (j, cell) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{}", cell)?;
            }
        }
        write!(f, "}}")
    }
}

/// Blank means an empty display form; only the empty string qualifies among
/// the representable variants
fn is_blank(value: &Value) -> bool {
    matches!(value, Value::String(s) if s.is_empty())
}

/// Round to 12 significant digits to strip accumulated floating-point noise
///
/// Chained f64 additions pick up representation error (0.1 + 0.2 is not
/// 0.3), so totals built from clean decimal cell values would otherwise
/// surface with trailing noise digits. 12 significant digits is enough to
/// absorb the error margin while leaving real data untouched.
fn strip_error_margin(n: f64) -> f64 {
    if n == 0.0 || !n.is_finite() {
        return n;
    }
    format!("{:.11e}", n).parse().unwrap_or(n)
}

fn is_mask_truthy(value: &Value) -> bool {
    match value {
        Value::Boolean(b) => *b,
        Value::Number(n) => *n == 1.0,
        _ => false,
    }
}

/// Resolve an axis selector to concrete indices
fn resolve_axis(param: Option<AxisSlice>, len: usize) -> Option<Vec<usize>> {
    let slice = param.unwrap_or_default();
    let start = slice.start.unwrap_or(0);
    if start >= len {
        return None;
    }
    let end = slice.end.unwrap_or(len).min(len);
    let step = slice.step.unwrap_or(1).max(1);

    let indices: Vec<usize> = (start..end).step_by(step).collect();
    if indices.is_empty() {
        return None;
    }
    Some(indices)
}
