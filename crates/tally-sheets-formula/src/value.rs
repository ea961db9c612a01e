//! Typed cell values for formula evaluation
//!
//! [`Value`] is the tagged value model the evaluation layer computes with: a
//! closed set of variants (number, boolean, string, error, array), built
//! from raw cell literals by a total factory and immutable once built.
//! Operators never mutate their inputs; they return new values.

use std::fmt;

use crate::array::{ArrayOrigin, ArrayValue};

/// Spreadsheet error values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellError {
    /// #DIV/0! - Division by zero
    Div0,
    /// #VALUE! - Wrong type of argument or operand
    Value,
    /// #NUM! - Invalid numeric value
    Num,
    /// #NAME? - Unrecognized formula name
    Name,
    /// #N/A - Value not available
    Na,
    /// #REF! - Invalid cell reference
    Ref,
    /// #CALC! - Calculation error
    Calc,
}

impl CellError {
    /// Get the display string for this error
    pub fn as_str(&self) -> &'static str {
        match self {
            CellError::Div0 => "#DIV/0!",
            CellError::Value => "#VALUE!",
            CellError::Num => "#NUM!",
            CellError::Name => "#NAME?",
            CellError::Na => "#N/A",
            CellError::Ref => "#REF!",
            CellError::Calc => "#CALC!",
        }
    }

    /// Parse an error string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "#DIV/0!" => Some(CellError::Div0),
            "#VALUE!" => Some(CellError::Value),
            "#NUM!" => Some(CellError::Num),
            "#NAME?" => Some(CellError::Name),
            "#N/A" => Some(CellError::Na),
            "#REF!" => Some(CellError::Ref),
            "#CALC!" => Some(CellError::Calc),
            _ => None,
        }
    }
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A raw cell literal, as read from storage or produced by the interpreter
///
/// This is the input side of the value factory: untyped spreadsheet data
/// before any classification has happened.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// Numeric literal (may be non-finite; the factory reifies NaN/infinity
    /// into error values)
    Number(f64),
    /// Boolean literal
    Boolean(bool),
    /// Text literal, possibly holding a boolean, number, or array in
    /// spreadsheet syntax
    Text(String),
    /// Nested grid of literals (outer Vec is rows)
    Array(Vec<Vec<RawValue>>),
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        RawValue::Boolean(b)
    }
}

impl From<i32> for RawValue {
    fn from(n: i32) -> Self {
        RawValue::Number(n as f64)
    }
}

impl From<i64> for RawValue {
    fn from(n: i64) -> Self {
        RawValue::Number(n as f64)
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

/// A typed, immutable value produced by the factory and consumed by the
/// evaluation layer
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Finite numeric value
    Number(f64),
    /// Boolean value (TRUE/FALSE)
    Boolean(bool),
    /// String value
    String(String),
    /// Error value (#VALUE!, #DIV/0!, etc.)
    Error(CellError),
    /// 2D grid of values
    Array(ArrayValue),
}

impl Value {
    /// Classify a raw literal into a typed value
    ///
    /// The factory is total: every input maps to some variant, and anything
    /// unrecognized degrades to [`Value::String`]. Classification order for
    /// text is boolean, then number, then array literal, then string.
    pub fn from_raw(raw: &RawValue) -> Value {
        match raw {
            RawValue::Number(n) => Self::from_number(*n),
            RawValue::Boolean(b) => Value::Boolean(*b),
            RawValue::Text(s) => Self::from_text(s),
            RawValue::Array(rows) => {
                match ArrayValue::from_raw(rows.clone(), ArrayOrigin::default()) {
                    Ok(array) => Value::Array(array),
                    // Ragged or empty nested literals cannot form a grid
                    Err(_) => Value::Error(CellError::Value),
                }
            }
        }
    }

    /// Build a numeric value, reifying NaN and infinities as #NUM!
    pub fn from_number(n: f64) -> Value {
        if n.is_finite() {
            Value::Number(n)
        } else {
            Value::Error(CellError::Num)
        }
    }

    /// Classify a text literal
    pub fn from_text(s: &str) -> Value {
        if s.eq_ignore_ascii_case("true") {
            return Value::Boolean(true);
        }
        if s.eq_ignore_ascii_case("false") {
            return Value::Boolean(false);
        }
        if let Some(n) = parse_full_number(s) {
            return Value::Number(n);
        }
        if let Some(array) = parse_array_literal(s) {
            return Value::Array(array);
        }
        Value::String(s.to_string())
    }

    /// Check if this is a numeric value
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    /// Check if this is a boolean value
    pub fn is_boolean(&self) -> bool {
        matches!(self, Value::Boolean(_))
    }

    /// Check if this is a string value
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Check if this is an error value
    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    /// Check if this is an array value
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Try to coerce the value to a number
    ///
    /// Numbers yield themselves, booleans 1/0, and strings their fully
    /// parsed numeric form. Everything else is not coercible.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Boolean(true) => Some(1.0),
            Value::Boolean(false) => Some(0.0),
            Value::String(s) => parse_full_number(s),
            _ => None,
        }
    }

    /// Try to coerce the value to a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            Value::Number(n) => Some(*n != 0.0),
            Value::String(s) => {
                if s.eq_ignore_ascii_case("true") {
                    Some(true)
                } else if s.eq_ignore_ascii_case("false") {
                    Some(false)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Get the string slice if this is a string value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the error code if this is an error value
    pub fn as_error(&self) -> Option<CellError> {
        match self {
            Value::Error(e) => Some(*e),
            _ => None,
        }
    }

    /// Read the value back as a raw literal
    pub fn to_raw(&self) -> RawValue {
        match self {
            Value::Number(n) => RawValue::Number(*n),
            Value::Boolean(b) => RawValue::Boolean(*b),
            Value::String(s) => RawValue::Text(s.clone()),
            Value::Error(e) => RawValue::Text(e.as_str().to_string()),
            Value::Array(a) => RawValue::Array(a.to_raw()),
        }
    }

    /// Get the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Boolean(_) => "boolean",
            Value::String(_) => "string",
            Value::Error(_) => "error",
            Value::Array(_) => "array",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => {
                // Format like a spreadsheet: no trailing zeros for integers
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::Boolean(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            Value::String(s) => write!(f, "{}", s),
            Value::Error(e) => write!(f, "{}", e),
            Value::Array(a) => write!(f, "{}", a),
        }
    }
}

/// Parse a string that is entirely a finite numeric literal
///
/// No trimming: `" 100"` is text, not a number. `f64` parsing accepts
/// `inf`/`nan` spellings, which classify as non-finite and are rejected
/// here, leaving decimal and exponential forms like `"2.34"` and `"1e2"`.
fn parse_full_number(s: &str) -> Option<f64> {
    let n: f64 = s.parse().ok()?;
    n.is_finite().then_some(n)
}

/// Parse an array literal of the form `{ a, b ; c, d }`
///
/// Rows are separated by `;`, cells by `,`, with arbitrary whitespace and
/// newlines around cells. Each cell text is classified through the factory
/// again. Ragged rows are padded on the right with empty-string cells.
fn parse_array_literal(s: &str) -> Option<ArrayValue> {
    let inner = s.trim().strip_prefix('{')?.strip_suffix('}')?;

    let mut rows: Vec<Vec<Value>> = inner
        .split(';')
        .map(|row| row.split(',').map(|cell| Value::from_text(cell.trim())).collect())
        .collect();

    let width = rows.iter().map(|r| r.len()).max()?;
    for row in &mut rows {
        row.resize(width, Value::String(String::new()));
    }

    ArrayValue::new(rows, ArrayOrigin::default()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_factory_booleans() {
        for raw in ["true", "false", "TRUE", "FALSE", "True"] {
            assert!(Value::from_raw(&raw.into()).is_boolean(), "{raw}");
        }
        assert_eq!(Value::from_raw(&true.into()), Value::Boolean(true));
        assert_eq!(Value::from_raw(&false.into()), Value::Boolean(false));
    }

    #[test]
    fn test_factory_numbers() {
        assert_eq!(Value::from_raw(&1.into()), Value::Number(1.0));
        assert_eq!(Value::from_raw(&0.into()), Value::Number(0.0));
        assert_eq!(Value::from_raw(&(-1).into()), Value::Number(-1.0));
        assert_eq!(Value::from_raw(&"1".into()), Value::Number(1.0));
        assert_eq!(Value::from_raw(&"1e2".into()), Value::Number(100.0));
        assert_eq!(Value::from_raw(&"2.34".into()), Value::Number(2.34));
        assert_eq!(Value::from_raw(&"-3".into()), Value::Number(-3.0));
    }

    #[test]
    fn test_factory_non_finite_is_error() {
        assert_eq!(Value::from_raw(&f64::NAN.into()), Value::Error(CellError::Num));
        assert_eq!(
            Value::from_raw(&f64::INFINITY.into()),
            Value::Error(CellError::Num)
        );
        assert_eq!(
            Value::from_raw(&f64::NEG_INFINITY.into()),
            Value::Error(CellError::Num)
        );
    }

    #[test]
    fn test_factory_strings() {
        assert!(Value::from_raw(&"test".into()).is_string());
        assert!(Value::from_raw(&" ".into()).is_string());
        // No trimming on the numeric check
        assert!(Value::from_raw(&" 100".into()).is_string());
        // Non-finite spellings stay text
        assert!(Value::from_raw(&"inf".into()).is_string());
        assert!(Value::from_raw(&"NaN".into()).is_string());
    }

    #[test]
    fn test_factory_array_literal() {
        let value = Value::from_raw(&"{1,2,3;4,5,6}".into());
        assert!(value.is_array());
        match value {
            Value::Array(a) => {
                assert_eq!(a.row_count(), 2);
                assert_eq!(a.column_count(), 3);
                assert_eq!(a.get(1, 2), Some(&Value::Number(6.0)));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_factory_array_literal_whitespace() {
        let value = Value::from_text(
            "{
                1 , 2;
                4 , 5
            }",
        );
        match value {
            Value::Array(a) => {
                assert_eq!(
                    a.to_raw(),
                    vec![
                        vec![RawValue::Number(1.0), RawValue::Number(2.0)],
                        vec![RawValue::Number(4.0), RawValue::Number(5.0)],
                    ]
                );
            }
            other => panic!("expected array, got {other:?}"),
        }
    }

    #[test]
    fn test_factory_precedence() {
        // Boolean text beats the numeric and array checks, numeric text
        // beats the array check.
        assert!(Value::from_text("true").is_boolean());
        assert!(Value::from_text("1e2").is_number());
        assert!(Value::from_text("{true,1}").is_array());
        assert!(Value::from_text("{unclosed").is_string());
    }

    #[test]
    fn test_coercion() {
        assert_eq!(Value::Number(2.5).as_number(), Some(2.5));
        assert_eq!(Value::Boolean(true).as_number(), Some(1.0));
        assert_eq!(Value::Boolean(false).as_number(), Some(0.0));
        assert_eq!(Value::String("100".into()).as_number(), Some(100.0));
        assert_eq!(Value::String("test".into()).as_number(), None);
        assert_eq!(Value::Error(CellError::Div0).as_number(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Number(8.0).to_string(), "8");
        assert_eq!(Value::Number(1.23).to_string(), "1.23");
        assert_eq!(Value::Boolean(false).to_string(), "FALSE");
        assert_eq!(Value::Error(CellError::Div0).to_string(), "#DIV/0!");
        assert_eq!(Value::String(String::new()).to_string(), "");
    }

    #[test]
    fn test_cell_error_round_trip() {
        assert_eq!(CellError::from_str("#VALUE!"), Some(CellError::Value));
        assert_eq!(CellError::from_str("#n/a"), Some(CellError::Na));
        assert_eq!(CellError::from_str("nope"), None);
    }
}
