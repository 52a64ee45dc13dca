#![cfg(feature = "excel")]

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};

use crate::error::LookupResult;
use crate::types::{Table, Value};

/// Read one sheet of a workbook (`.xlsx`, `.xls`, `.xlsm`, `.xlsb`, `.ods`) into a [`Table`].
///
/// Behavior:
/// - Reads `sheet_name` if provided; otherwise the first sheet in the workbook
/// - Row 0 of the table (the header) is the first row of the sheet's used range
/// - Column 0 is always column `A`: when the used range starts further right, rows are padded
///   with leading nulls so column letters keep their spreadsheet meaning
/// - Rows whose cells are all empty become blank (zero-length) rows
/// - A workbook without sheets yields an empty table
pub fn read_excel_from_path(path: impl AsRef<Path>, sheet_name: Option<&str>) -> LookupResult<Table> {
    let mut workbook = open_workbook_auto(path)?;

    let sheet = match sheet_name {
        Some(name) => name.to_string(),
        None => match workbook.sheet_names().first() {
            Some(first) => first.clone(),
            None => return Ok(Table::default()),
        },
    };

    let range = workbook.worksheet_range(&sheet)?;
    Ok(range_to_table(&range))
}

/// Sheet names of a workbook, in workbook order.
pub fn excel_sheet_names(path: impl AsRef<Path>) -> LookupResult<Vec<String>> {
    let workbook = open_workbook_auto(path)?;
    Ok(workbook.sheet_names().to_vec())
}

pub(crate) fn range_to_table(range: &Range<Data>) -> Table {
    let Some((_, col0)) = range.start() else {
        return Table::default();
    };

    let mut rows: Vec<Vec<Value>> = Vec::with_capacity(range.height());
    for cells in range.rows() {
        if cells.iter().all(|c| matches!(c, Data::Empty)) {
            rows.push(Vec::new());
            continue;
        }
        let mut row: Vec<Value> = Vec::with_capacity(col0 as usize + cells.len());
        row.resize(col0 as usize, Value::Null);
        row.extend(cells.iter().map(cell_to_value));
        rows.push(row);
    }
    Table::new(rows)
}

fn cell_to_value(c: &Data) -> Value {
    match c {
        Data::Empty => Value::Null,
        Data::Int(i) => Value::Int64(*i),
        Data::Float(f) => Value::Float64(*f),
        Data::Bool(b) => Value::Bool(*b),
        Data::String(s) => Value::Utf8(s.clone()),
        // Date cells keep their serial number, like an unformatted cell read.
        Data::DateTime(dt) => Value::Float64(dt.as_f64()),
        Data::DateTimeIso(s) => Value::Utf8(s.clone()),
        Data::DurationIso(s) => Value::Utf8(s.clone()),
        Data::Error(_) => Value::Utf8(c.to_string()),
    }
}
