//! # tally-sheets-formula
//!
//! Typed value model for tally-sheets formula evaluation.
//!
//! This crate provides:
//! - [`Value`] - Tagged cell values (numbers, booleans, strings, errors,
//!   arrays) with a total classification factory
//! - [`ArrayValue`] - 2D grids of values with slicing, statistics, and
//!   masked picking
//! - [`CellError`] - Spreadsheet error codes reified as values
//!
//! ## Example
//!
//! ```rust
//! use tally_sheets_formula::{ArrayOrigin, ArrayValue, Value};
//!
//! let array = ArrayValue::from_raw(
//!     vec![
//!         vec![1.into(), 2.into(), 3.into()],
//!         vec![4.into(), "5".into(), true.into()],
//!     ],
//!     ArrayOrigin::default(),
//! )
//! .unwrap();
//!
//! // "5" was classified as a number on the way in; the boolean was not.
//! assert_eq!(array.sum(), Value::Number(15.0));
//! ```

pub mod array;
pub mod error;
pub mod value;

pub use array::{ArrayOrigin, ArrayValue, AxisSlice};
pub use error::{FormulaError, FormulaResult};
pub use value::{CellError, RawValue, Value};
