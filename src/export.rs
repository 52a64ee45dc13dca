//! CSV export for result tables.
//!
//! Cells are written with their canonical text (null → empty field). Fields containing a comma,
//! quote or line break are quoted and embedded quotes doubled; rows are separated by CRLF. A row
//! with no text at all (zero cells, or a single empty cell) is an empty line.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::LookupResult;
use crate::types::{Table, Value};

fn writer_builder() -> csv::WriterBuilder {
    let mut b = csv::WriterBuilder::new();
    b.has_headers(false)
        .flexible(true)
        .terminator(csv::Terminator::CRLF)
        .quote_style(csv::QuoteStyle::Necessary);
    b
}

// The csv writer refuses empty records and quotes a lone empty field as `""`.
fn is_empty_line(row: &[Value]) -> bool {
    match row {
        [] => true,
        [only] => only.to_string().is_empty(),
        _ => false,
    }
}

/// Write `table` as CSV into `writer`, one CRLF-terminated record per row.
pub fn write_csv<W: Write>(table: &Table, mut writer: W) -> LookupResult<()> {
    let mut runs = table.rows.split(|row| is_empty_line(row)).peekable();
    while let Some(run) = runs.next() {
        if !run.is_empty() {
            let mut wtr = writer_builder().from_writer(&mut writer);
            for row in run {
                wtr.write_record(row.iter().map(ToString::to_string))?;
            }
            wtr.flush()?;
        }
        if runs.peek().is_some() {
            writer.write_all(b"\r\n")?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Render `table` as a CSV string: rows joined by CRLF, no trailing line break.
pub fn to_csv_string(table: &Table) -> LookupResult<String> {
    let mut buf: Vec<u8> = Vec::new();
    write_csv(table, &mut buf)?;
    if buf.ends_with(b"\r\n") {
        buf.truncate(buf.len() - 2);
    }
    String::from_utf8(buf).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e).into())
}

/// Write `table` as CSV to a file at `path`.
pub fn write_csv_to_path(table: &Table, path: impl AsRef<Path>) -> LookupResult<()> {
    let file = File::create(path)?;
    write_csv(table, BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::{to_csv_string, write_csv};
    use crate::types::{Table, Value};

    #[test]
    fn plain_cells_are_unquoted() {
        let t = Table::from_rows(vec![vec!["ID", "Val"], vec!["p1", "x"]]);
        assert_eq!(to_csv_string(&t).unwrap(), "ID,Val\r\np1,x");
    }

    #[test]
    fn special_cells_are_quoted_and_escaped() {
        let t = Table::from_rows(vec![vec!["a,b", "say \"hi\"", "two\nlines", "plain"]]);
        assert_eq!(
            to_csv_string(&t).unwrap(),
            "\"a,b\",\"say \"\"hi\"\"\",\"two\nlines\",plain"
        );
    }

    #[test]
    fn non_string_cells_use_canonical_text() {
        let t = Table::new(vec![vec![
            Value::Null,
            Value::Float64(3.0),
            Value::Float64(2.5),
            Value::Bool(false),
            Value::Int64(-1),
        ]]);
        assert_eq!(to_csv_string(&t).unwrap(), ",3,2.5,false,-1");
    }

    #[test]
    fn ragged_rows_are_allowed() {
        let t = Table::from_rows(vec![vec!["a", "b", "c"], vec!["1"]]);
        assert_eq!(to_csv_string(&t).unwrap(), "a,b,c\r\n1");
    }

    #[test]
    fn blank_rows_are_empty_lines() {
        let t = Table::new(vec![
            vec![Value::from("a")],
            Vec::new(),
            vec![Value::from("b")],
            Vec::new(),
            Vec::new(),
            vec![Value::from("c")],
        ]);
        assert_eq!(to_csv_string(&t).unwrap(), "a\r\n\r\nb\r\n\r\n\r\nc");

        let mut buf = Vec::new();
        write_csv(&Table::new(vec![Vec::new(), vec![Value::from("x")]]), &mut buf).unwrap();
        assert_eq!(buf, b"\r\nx\r\n");
    }

    #[test]
    fn single_empty_cell_is_an_empty_line_not_quotes() {
        let t = Table::new(vec![
            vec![Value::from("B")],
            vec![Value::Null],
            vec![Value::from("")],
        ]);
        assert_eq!(to_csv_string(&t).unwrap(), "B\r\n\r\n");
        // Two empty cells still need their delimiter.
        let t = Table::new(vec![vec![Value::Null, Value::Null]]);
        assert_eq!(to_csv_string(&t).unwrap(), ",");
    }
}
