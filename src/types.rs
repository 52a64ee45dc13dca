//! Core data model types.
//!
//! A [`Table`] is what the ingestion layer produces and what the lookup engine consumes: an
//! ordered list of rows where row 0 is the header row. Cells are [`Value`]s.

use std::fmt;

/// A single cell value in a [`Table`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing/empty cell.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float (Excel numbers and date serials land here).
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
}

impl Value {
    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` for null cells and empty strings.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Utf8(s) => s.is_empty(),
            _ => false,
        }
    }
}

/// Canonical textual form of a cell.
///
/// This is the single stringification rule used for key normalization, CSV export and previews.
/// Integral floats print without a fractional part (`1.0` → `1`), so a number read from a
/// workbook and the same number typed into a CSV produce the same key. Null renders as `""`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Float64(v) if v.is_nan() => f.write_str("NaN"),
            Value::Float64(v) if v.is_infinite() => {
                f.write_str(if *v > 0.0 { "Infinity" } else { "-Infinity" })
            }
            Value::Float64(v) => write!(f, "{v}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Utf8(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Utf8(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Utf8(s)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// In-memory table.
///
/// Row 0 is the header row; rows `1..` are the body. Rows are ragged: a body row may be shorter
/// than the header, and a blank spreadsheet row is stored as an empty `Vec`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    /// Row-major cell storage, header first.
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create a table from rows (header first).
    pub fn new(rows: Vec<Vec<Value>>) -> Self {
        Self { rows }
    }

    /// Build a table from rows of anything convertible into [`Value`].
    ///
    /// Handy for tests and for callers that already hold plain strings.
    pub fn from_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = C>,
        C: Into<Value>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    /// `true` when the table has no rows at all (not even a header).
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Total number of rows, header included.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// The header row, or an empty slice for an empty table.
    pub fn header(&self) -> &[Value] {
        self.rows.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Body rows (everything after the header).
    pub fn body(&self) -> &[Vec<Value>] {
        self.rows.get(1..).unwrap_or(&[])
    }

    /// Number of zero-length body rows.
    pub fn blank_row_count(&self) -> usize {
        self.body().iter().filter(|r| r.is_empty()).count()
    }

    /// A cosmetic preview: the header plus the first `rows` body rows, each cut or padded with
    /// nulls to exactly `cols` cells. Both limits are clamped to at least 1.
    pub fn preview(&self, rows: usize, cols: usize) -> Table {
        let rows = rows.max(1);
        let cols = cols.max(1);
        let out = self
            .rows
            .iter()
            .take(rows + 1)
            .map(|row| {
                let mut cells: Vec<Value> = row.iter().take(cols).cloned().collect();
                cells.resize(cols, Value::Null);
                cells
            })
            .collect();
        Table::new(out)
    }
}

impl fmt::Display for Table {
    /// Plain-text rendering: cells separated by ` | `, one row per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            let line = row
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" | ");
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
