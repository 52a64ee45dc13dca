//! CSV ingestion implementation.

use std::io::Read;
use std::path::Path;

use crate::error::LookupResult;
use crate::types::{Table, Value};

/// Options for reading delimited text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvReadOptions {
    /// Field delimiter (default `,`).
    pub delimiter: u8,
    /// Parse integers, floats and `true`/`false` instead of keeping every cell as text.
    pub infer_types: bool,
}

impl Default for CsvReadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            infer_types: false,
        }
    }
}

impl CsvReadOptions {
    /// Tab-separated values.
    pub fn tsv() -> Self {
        Self {
            delimiter: b'\t',
            ..Self::default()
        }
    }
}

/// A reader builder configured for tables: no header handling, ragged rows allowed.
pub fn reader_builder(options: &CsvReadOptions) -> csv::ReaderBuilder {
    let mut b = csv::ReaderBuilder::new();
    b.has_headers(false).flexible(true).delimiter(options.delimiter);
    b
}

/// Read a CSV file into a [`Table`].
///
/// Rules:
///
/// - The first record is the header row; nothing is validated against it.
/// - Records may have any length.
/// - Empty fields become [`Value::Null`]; a record with only empty fields becomes a blank row.
/// - Cells are text unless [`CsvReadOptions::infer_types`] is set.
pub fn read_csv_from_path(path: impl AsRef<Path>, options: &CsvReadOptions) -> LookupResult<Table> {
    let mut rdr = reader_builder(options).from_path(path)?;
    read_csv_from_reader(&mut rdr, options)
}

/// Read CSV data from an existing reader.
pub fn read_csv_from_reader<R: Read>(
    rdr: &mut csv::Reader<R>,
    options: &CsvReadOptions,
) -> LookupResult<Table> {
    let mut rows: Vec<Vec<Value>> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let mut row: Vec<Value> = record
            .iter()
            .enumerate()
            .map(|(i, raw)| {
                // Excel-exported CSVs often start with a UTF-8 BOM.
                let raw = if rows.is_empty() && i == 0 {
                    raw.strip_prefix('\u{feff}').unwrap_or(raw)
                } else {
                    raw
                };
                parse_cell(raw, options.infer_types)
            })
            .collect();
        if row.iter().all(Value::is_null) {
            row.clear();
        }
        rows.push(row);
    }
    Ok(Table::new(rows))
}

fn parse_cell(raw: &str, infer_types: bool) -> Value {
    if raw.is_empty() {
        return Value::Null;
    }
    if !infer_types {
        return Value::Utf8(raw.to_owned());
    }
    infer_value(raw)
}

fn infer_value(raw: &str) -> Value {
    let t = raw.trim();
    if t.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if t.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }

    // Keep identifiers like "007" or "1e5x" as text; only plain decimal numbers convert.
    let digits = t.strip_prefix('-').unwrap_or(t);
    let leading_zero = digits.len() > 1 && digits.starts_with('0') && !digits.starts_with("0.");
    let numeric_chars = !digits.is_empty()
        && digits.starts_with(|c: char| c.is_ascii_digit())
        && digits.chars().all(|c| c.is_ascii_digit() || c == '.');
    if numeric_chars && !leading_zero {
        if let Ok(i) = t.parse::<i64>() {
            return Value::Int64(i);
        }
        if let Ok(f) = t.parse::<f64>() {
            return Value::Float64(f);
        }
    }
    Value::Utf8(raw.to_owned())
}
