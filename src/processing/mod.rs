//! The lookup engine.
//!
//! The processing layer operates on [`crate::types::Table`] values produced by ingestion (or
//! built in memory). It is a pure function of its inputs: no I/O, no shared state.
//!
//! - [`columns`]: column references (`"3"`, `"C"`, `"B,D-F"`) → 0-based indices
//! - [`clean`]: key normalization ([`CleaningOptions`])
//! - [`index`]: first-match [`LookupIndex`] over the source key column
//! - [`join`](mod@join): the enrichment join and its result/summary types
//!
//! ## Example
//!
//! ```rust
//! use sheet_vlookup::processing::{
//!     join, CleaningOptions, LookupColumns, LookupOptions, MatchFilterMode, OutputOptions,
//! };
//! use sheet_vlookup::types::Table;
//!
//! let source = Table::from_rows(vec![
//!     vec!["ID", "Product Name", "Unit Price"],
//!     vec!["PROD-001", "Quantum Pro", "19.99"],
//!     vec!["PROD-002", "Aero Max", "5.00"],
//! ]);
//! let lookup = Table::from_rows(vec![vec!["ProductID"], vec!["prod-002"], vec!["PROD-404"]]);
//!
//! let columns = LookupColumns::resolve("A", "A", "B-C").unwrap();
//! let options = LookupOptions {
//!     cleaning: CleaningOptions { trim: true, ignore_special: false, case_sensitive: false },
//!     output: OutputOptions { include_all_lookup_columns: false },
//!     filter: MatchFilterMode::Found,
//! };
//!
//! let out = join(&source, &lookup, &columns, &options);
//! assert_eq!(out.emitted_rows(), 1);
//! assert_eq!(out.summary(), "1 of 2 records from the lookup file resulted in a match.");
//! ```

pub mod clean;
pub mod columns;
pub mod index;
pub mod join;

pub use clean::{normalize, CleaningOptions};
pub use columns::{column_letters, resolve_range, resolve_single, MAX_COLUMN_INDEX};
pub use index::LookupIndex;
pub use join::{
    join, lookup_tables, result_header, summary_message, LookupColumns, LookupOptions,
    LookupOutcome, LookupStats, MatchFilterMode, OutputOptions, NOT_FOUND,
};
