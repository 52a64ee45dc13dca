use sheet_vlookup::ingestion::csv::{read_csv_from_path, read_csv_from_reader, reader_builder, CsvReadOptions};
use sheet_vlookup::ingestion::{load_table_from_path, LoadOptions, TableFormat};
use sheet_vlookup::types::Value;

#[test]
fn read_csv_from_path_happy_path() {
    let table = read_csv_from_path("tests/fixtures/products.csv", &CsvReadOptions::default()).unwrap();

    assert_eq!(table.row_count(), 7);
    assert_eq!(table.header()[0], Value::from("ID"));
    assert_eq!(
        table.rows[1],
        vec![
            Value::from("PROD-001"),
            Value::from("Quantum Pro 1"),
            Value::from("Accessories"),
            Value::from("19.99"),
            Value::from("Innovate Inc."),
        ]
    );
    // Quoted field with an embedded comma.
    assert_eq!(table.rows[2][1], Value::from("Aero Max, 2"));
}

#[test]
fn all_empty_record_becomes_blank_row() {
    let table = read_csv_from_path("tests/fixtures/products.csv", &CsvReadOptions::default()).unwrap();
    assert!(table.rows[3].is_empty());
    assert_eq!(table.blank_row_count(), 1);
}

#[test]
fn empty_field_is_null_and_whitespace_is_kept() {
    let table = read_csv_from_path("tests/fixtures/products.csv", &CsvReadOptions::default()).unwrap();
    assert_eq!(table.rows[4][4], Value::Null);
    assert_eq!(table.rows[6][0], Value::from(" prod-004 "));
}

#[test]
fn ragged_records_are_allowed() {
    let input = "a,b,c\n1\n2,3,4,5\n";
    let opts = CsvReadOptions::default();
    let mut rdr = reader_builder(&opts).from_reader(input.as_bytes());

    let table = read_csv_from_reader(&mut rdr, &opts).unwrap();
    assert_eq!(table.rows[1].len(), 1);
    assert_eq!(table.rows[2].len(), 4);
}

#[test]
fn type_inference_is_opt_in() {
    let input = "id,qty,price,ok\n007,3,2.50,true\n";
    let text = CsvReadOptions::default();
    let mut rdr = reader_builder(&text).from_reader(input.as_bytes());
    let table = read_csv_from_reader(&mut rdr, &text).unwrap();
    assert_eq!(table.rows[1][1], Value::from("3"));

    let typed = CsvReadOptions {
        infer_types: true,
        ..Default::default()
    };
    let mut rdr = reader_builder(&typed).from_reader(input.as_bytes());
    let table = read_csv_from_reader(&mut rdr, &typed).unwrap();
    assert_eq!(
        table.rows[1],
        vec![
            Value::from("007"),
            Value::Int64(3),
            Value::Float64(2.5),
            Value::Bool(true),
        ]
    );
    // Header cells stay text.
    assert_eq!(table.rows[0][1], Value::from("qty"));
}

#[test]
fn leading_bom_is_stripped() {
    let input = "\u{feff}ID,Name\nP1,x\n";
    let opts = CsvReadOptions::default();
    let mut rdr = reader_builder(&opts).from_reader(input.as_bytes());
    let table = read_csv_from_reader(&mut rdr, &opts).unwrap();
    assert_eq!(table.rows[0][0], Value::from("ID"));
}

#[test]
fn tsv_is_detected_by_extension() {
    let table = load_table_from_path("tests/fixtures/orders.tsv", &LoadOptions::default()).unwrap();
    assert_eq!(table.rows[1], vec![Value::from("PROD-003"), Value::from("2"), Value::from("High")]);

    let forced = LoadOptions {
        format: Some(TableFormat::Csv),
        csv: CsvReadOptions::tsv(),
        ..Default::default()
    };
    let again = load_table_from_path("tests/fixtures/orders.tsv", &forced).unwrap();
    assert_eq!(again, table);
}

#[test]
fn missing_file_is_an_io_error() {
    let err = read_csv_from_path("tests/fixtures/does_not_exist.csv", &CsvReadOptions::default())
        .unwrap_err();
    assert!(err.to_string().contains("csv error"));
}
