use std::time::{SystemTime, UNIX_EPOCH};

use sheet_vlookup::export::{to_csv_string, write_csv, write_csv_to_path};
use sheet_vlookup::ingestion::csv::{read_csv_from_path, read_csv_from_reader, reader_builder, CsvReadOptions};
use sheet_vlookup::ingestion::{load_table_from_path, LoadOptions};
use sheet_vlookup::processing::lookup_tables;
use sheet_vlookup::settings::LookupSettings;
use sheet_vlookup::types::{Table, Value};

fn text_rows(table: &Table) -> Vec<Vec<String>> {
    table
        .rows
        .iter()
        .map(|r| r.iter().map(ToString::to_string).collect())
        .collect()
}

#[test]
fn export_round_trips_through_a_csv_reader() {
    let table = Table::from_rows(vec![
        vec!["ID", "Name", "Note"],
        vec!["p1", "Aero Max, 2", "said \"hi\""],
        vec!["p2", "multi\nline", "plain"],
        vec!["p3", "crlf\r\ninside", " padded "],
    ]);

    let csv = to_csv_string(&table).unwrap();
    let opts = CsvReadOptions::default();
    let mut rdr = reader_builder(&opts).from_reader(csv.as_bytes());
    let back = read_csv_from_reader(&mut rdr, &opts).unwrap();

    assert_eq!(text_rows(&back), text_rows(&table));
}

#[test]
fn rows_are_joined_with_crlf_without_trailing_terminator() {
    let table = Table::from_rows(vec![vec!["a"], vec!["b"], vec!["c"]]);
    assert_eq!(to_csv_string(&table).unwrap(), "a\r\nb\r\nc");

    let mut buf = Vec::new();
    write_csv(&table, &mut buf).unwrap();
    assert_eq!(buf, b"a\r\nb\r\nc\r\n");
}

#[test]
fn empty_table_is_empty_string() {
    assert_eq!(to_csv_string(&Table::default()).unwrap(), "");
}

#[test]
fn null_and_empty_cells_export_as_empty_fields() {
    let table = Table::new(vec![vec![Value::from("x"), Value::Null, Value::from("")]]);
    assert_eq!(to_csv_string(&table).unwrap(), "x,,");
}

#[test]
fn joined_fixture_exports_to_file() {
    let source = load_table_from_path("tests/fixtures/products.csv", &LoadOptions::default()).unwrap();
    let lookup = load_table_from_path("tests/fixtures/orders.csv", &LoadOptions::default()).unwrap();
    let settings = LookupSettings {
        return_columns: "B-D".to_string(),
        ..Default::default()
    };
    let out = lookup_tables(&source, &lookup, &settings).unwrap();

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let path = std::env::temp_dir().join(format!("sheet-vlookup-export-{nanos}.csv"));
    write_csv_to_path(&out.table, &path).unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.starts_with("ProductID,Product Name,Category,Unit Price\r\n"));
    assert!(raw.contains("prod-002,\"Aero Max, 2\",Software,5.00\r\n"));

    let back = read_csv_from_path(&path, &CsvReadOptions::default()).unwrap();
    let _ = std::fs::remove_file(&path);
    assert_eq!(text_rows(&back), text_rows(&out.table));
}

#[test]
fn blank_rows_in_a_file_are_empty_lines() {
    let table = Table::new(vec![
        vec![Value::from("ID"), Value::from("V")],
        Vec::new(),
        vec![Value::Null],
        vec![Value::from("p1"), Value::from("x")],
    ]);

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let path = std::env::temp_dir().join(format!("sheet-vlookup-blank-rows-{nanos}.csv"));
    write_csv_to_path(&table, &path).unwrap();
    let raw = std::fs::read_to_string(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(raw, "ID,V\r\n\r\n\r\np1,x\r\n");
    assert!(!raw.contains("\"\""));
}
