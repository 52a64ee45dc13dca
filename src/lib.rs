//! `sheet-vlookup` enriches the rows of one spreadsheet table (the *lookup* table) with columns
//! from another (the *source* table), the way a spreadsheet `VLOOKUP` does, but over whole tables.
//!
//! The primary entrypoint is [`processing::lookup_tables`], which takes two in-memory
//! [`types::Table`]s and a [`settings::LookupSettings`] and returns the result table plus run
//! statistics. Tables usually come from [`ingestion::load_table_from_path`].
//!
//! ## What you can load
//!
//! **File formats (auto-detected by extension):**
//!
//! - **CSV**: `.csv`, `.txt`
//! - **TSV**: `.tsv`, `.tab`
//! - **Excel/workbooks** (requires the Cargo feature `excel`, on by default): `.xlsx`, `.xls`,
//!   `.xlsm`, `.xlsb`, `.ods`
//!
//! Every format loads into the same shape: a list of rows, header first, where each cell is a
//! [`types::Value`]. Blank rows are kept as empty rows and missing cells are
//! [`types::Value::Null`].
//!
//! ## Quick example: files in, CSV out
//!
//! ```no_run
//! use sheet_vlookup::export::write_csv_to_path;
//! use sheet_vlookup::ingestion::{load_table_from_path, LoadOptions};
//! use sheet_vlookup::processing::{lookup_tables, MatchFilterMode};
//! use sheet_vlookup::settings::LookupSettings;
//!
//! # fn main() -> Result<(), sheet_vlookup::LookupError> {
//! let source = load_table_from_path("products.xlsx", &LoadOptions::default())?;
//! let lookup = load_table_from_path("orders.csv", &LoadOptions::default())?;
//!
//! let settings = LookupSettings {
//!     return_columns: "B-D".to_string(),
//!     match_filter_mode: MatchFilterMode::Found,
//!     ..Default::default()
//! };
//! let outcome = lookup_tables(&source, &lookup, &settings)?;
//! println!("{}", outcome.summary());
//! write_csv_to_path(&outcome.table, "matched.csv")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## In-memory example
//!
//! ```rust
//! use sheet_vlookup::processing::{lookup_tables, NOT_FOUND};
//! use sheet_vlookup::settings::LookupSettings;
//! use sheet_vlookup::types::{Table, Value};
//!
//! let source = Table::from_rows(vec![vec!["ID", "Val"], vec!["p1", "x"], vec!["p1", "y"]]);
//! let lookup = Table::from_rows(vec![vec!["ID"], vec![" P1 "], vec!["p9"]]);
//!
//! let out = lookup_tables(&source, &lookup, &LookupSettings::default()).unwrap();
//! assert_eq!(out.table.rows[1], vec![Value::from(" P1 "), Value::from("x")]);
//! assert_eq!(out.table.rows[2], vec![Value::from("p9"), Value::from(NOT_FOUND)]);
//! assert_eq!(out.stats.records_processed, 2);
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: loading CSV/TSV/Excel files into tables, plus ingestion observers
//! - [`types`]: the in-memory [`types::Table`] and [`types::Value`] cell type
//! - [`processing`]: column references, key cleaning, the first-match index and the join
//! - [`execution`]: the same join with lookup rows matched in parallel chunks
//! - [`export`]: CSV rendering of result tables
//! - [`settings`]: user-facing configuration and its JSON persistence
//! - [`samples`]: reproducible demo data
//! - [`error`]: the crate's error type

pub mod error;
pub mod execution;
pub mod export;
pub mod ingestion;
pub mod processing;
pub mod samples;
pub mod settings;
pub mod types;

pub use error::{LookupError, LookupResult, TableRole};
