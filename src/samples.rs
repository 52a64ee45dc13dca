//! Reproducible demo data: a product catalogue (source) and an order list (lookup).
//!
//! The *perfect* variant is a clean one-to-one pairing. The *standard* variant carries the
//! irregularities real spreadsheets have, so a run over it exercises blank rows, blank cells and
//! unmatched keys.

use std::path::{Path, PathBuf};

use chrono::{Days, Local, NaiveDate};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::error::LookupResult;
use crate::export::write_csv_to_path;
use crate::types::{Table, Value};

/// Header of the generated source table.
pub const SOURCE_HEADER: [&str; 7] = [
    "ID",
    "Product Name",
    "Category",
    "Unit Price",
    "Stock Level",
    "Supplier",
    "Date Added",
];

/// Header of the generated lookup table.
pub const LOOKUP_HEADER: [&str; 3] = ["ProductID", "Quantity Needed", "Urgency"];

/// Worksheet name used for generated workbooks.
pub const SHEET_NAME: &str = "SampleData";

const CATEGORIES: [&str; 5] = ["Electronics", "Accessories", "Software", "Peripherals", "Components"];
const SUPPLIERS: [&str; 5] = ["TechCorp", "Innovate Inc.", "Gadgetron", "Supply Co", "Global Parts"];
const URGENCIES: [&str; 3] = ["High", "Medium", "Low"];
const NAMES: [&str; 10] = [
    "Quantum", "Aero", "Hyper", "Stellar", "Nova", "Omega", "Alpha", "Delta", "Orion", "Pulsar",
];
const MODELS: [&str; 10] = ["Pro", "Max", "XT", "Core", "Mini", "Plus", "HD", "4K", "Stealth", "Prime"];

/// Table index at which the standard variant inserts a blank source row.
const BLANK_ROW_AT: usize = 7;
/// (row, column) of the source cell the standard variant blanks out (the supplier column).
const BLANK_CELL_AT: (usize, usize) = (11, 5);

/// Options for [`generate_sample_data`].
#[derive(Debug, Clone)]
pub struct SampleOptions {
    /// Body rows in each table (before the standard variant's blank row).
    pub row_count: usize,
    /// Generate the clean variant.
    pub perfect: bool,
    /// RNG seed; `None` draws one from the OS.
    pub seed: Option<u64>,
    /// "Date Added" values fall within the 365 days up to and including this date.
    pub reference_date: NaiveDate,
}

impl Default for SampleOptions {
    fn default() -> Self {
        Self {
            row_count: 20,
            perfect: false,
            seed: None,
            reference_date: Local::now().date_naive(),
        }
    }
}

/// A generated source/lookup pair.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleData {
    pub source: Table,
    pub lookup: Table,
}

/// Generate a source/lookup pair.
///
/// Source ids are `PROD-001`, `PROD-002`, … For the standard variant the lookup table draws
/// `row_count - 4` of them, adds `PROD-888` and `PROD-999`, and fills the remaining rows with
/// `PROD-8xx` ids that do not exist in the source.
///
/// ```rust
/// use sheet_vlookup::samples::{generate_sample_data, SampleOptions};
///
/// let opts = SampleOptions { seed: Some(7), perfect: true, ..Default::default() };
/// let data = generate_sample_data(&opts);
/// assert_eq!(data.source.body().len(), 20);
/// assert_eq!(data.lookup.body().len(), 20);
/// ```
pub fn generate_sample_data(options: &SampleOptions) -> SampleData {
    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let n = options.row_count;

    let mut source_rows = vec![SOURCE_HEADER.iter().map(|&h| Value::from(h)).collect::<Vec<_>>()];
    let mut source_ids = Vec::with_capacity(n);
    for i in 1..=n {
        let id = product_id(i);
        let price = (rng.gen_range(10.0..1500.0_f64) * 100.0).round() / 100.0;
        let stock = rng.gen_range(0..500_i64);
        let days_back = rng.gen_range(0..365_u64);
        let added = options
            .reference_date
            .checked_sub_days(Days::new(days_back))
            .unwrap_or(options.reference_date);

        source_rows.push(vec![
            Value::from(id.as_str()),
            Value::from(format!("{} {} {i}", NAMES[i % NAMES.len()], MODELS[i % MODELS.len()])),
            Value::from(CATEGORIES[i % CATEGORIES.len()]),
            Value::Float64(price),
            Value::Int64(stock),
            Value::from(SUPPLIERS[i % SUPPLIERS.len()]),
            Value::from(added.format("%Y-%m-%d").to_string()),
        ]);
        source_ids.push(id);
    }

    if !options.perfect {
        source_rows.insert(BLANK_ROW_AT.min(source_rows.len()), Vec::new());
        let (r, c) = BLANK_CELL_AT;
        if let Some(cell) = source_rows.get_mut(r).and_then(|row| row.get_mut(c)) {
            *cell = Value::Null;
        }
    }

    let mut lookup_ids = source_ids;
    lookup_ids.shuffle(&mut rng);
    if !options.perfect {
        lookup_ids.truncate(n.saturating_sub(4));
        lookup_ids.push("PROD-888".to_string());
        lookup_ids.push("PROD-999".to_string());
        lookup_ids.shuffle(&mut rng);
    }

    let mut lookup_rows = vec![LOOKUP_HEADER.iter().map(|&h| Value::from(h)).collect::<Vec<_>>()];
    for i in 0..n {
        let id = lookup_ids
            .get(i)
            .cloned()
            .unwrap_or_else(|| product_id(800 + i));
        lookup_rows.push(vec![
            Value::from(id),
            Value::Int64(rng.gen_range(1..=50_i64)),
            Value::from(URGENCIES[i % URGENCIES.len()]),
        ]);
    }

    SampleData {
        source: Table::new(source_rows),
        lookup: Table::new(lookup_rows),
    }
}

fn product_id(n: usize) -> String {
    format!("PROD-{n:03}")
}

/// File format for [`write_sample_files`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    Csv,
    /// Requires the `samples` feature.
    Xlsx,
}

impl SampleFormat {
    pub fn extension(self) -> &'static str {
        match self {
            SampleFormat::Csv => "csv",
            SampleFormat::Xlsx => "xlsx",
        }
    }
}

/// Write `table` to a workbook with a single worksheet named [`SHEET_NAME`].
///
/// Null cells are left empty; numbers and booleans keep their cell type.
#[cfg(feature = "samples")]
pub fn write_sample_xlsx(table: &Table, path: impl AsRef<Path>) -> LookupResult<()> {
    use rust_xlsxwriter::{Workbook, XlsxError};

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (r, row) in table.rows.iter().enumerate() {
        let r = u32::try_from(r).map_err(|_| XlsxError::RowColumnLimitError)?;
        for (c, cell) in row.iter().enumerate() {
            let c = u16::try_from(c).map_err(|_| XlsxError::RowColumnLimitError)?;
            match cell {
                Value::Null => {}
                Value::Int64(v) => {
                    worksheet.write_number(r, c, *v as f64)?;
                }
                Value::Float64(v) => {
                    worksheet.write_number(r, c, *v)?;
                }
                Value::Bool(b) => {
                    worksheet.write_boolean(r, c, *b)?;
                }
                Value::Utf8(s) => {
                    worksheet.write_string(r, c, s)?;
                }
            }
        }
    }

    workbook.save(path.as_ref())?;
    Ok(())
}

/// Write the four sample files into `dir`:
/// `sample_{source,lookup}_{standard,perfect}.<ext>`.
///
/// `base` supplies the row count, seed and reference date; both variants are generated from it.
/// Returns the written paths.
pub fn write_sample_files(
    dir: impl AsRef<Path>,
    format: SampleFormat,
    base: &SampleOptions,
) -> LookupResult<Vec<PathBuf>> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(4);
    for (variant, perfect) in [("standard", false), ("perfect", true)] {
        let data = generate_sample_data(&SampleOptions {
            perfect,
            ..base.clone()
        });
        for (role, table) in [("source", &data.source), ("lookup", &data.lookup)] {
            let path = dir.join(format!("sample_{role}_{variant}.{}", format.extension()));
            write_table(table, &path, format)?;
            written.push(path);
        }
    }
    Ok(written)
}

fn write_table(table: &Table, path: &Path, format: SampleFormat) -> LookupResult<()> {
    match format {
        SampleFormat::Csv => write_csv_to_path(table, path),
        #[cfg(feature = "samples")]
        SampleFormat::Xlsx => write_sample_xlsx(table, path),
        #[cfg(not(feature = "samples"))]
        SampleFormat::Xlsx => Err(crate::error::LookupError::UnsupportedFormat {
            message: "xlsx sample output not enabled (enable cargo feature 'samples')".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::NaiveDate;

    use super::*;
    use crate::processing::{lookup_tables, NOT_FOUND};
    use crate::settings::LookupSettings;

    fn opts(perfect: bool) -> SampleOptions {
        SampleOptions {
            row_count: 20,
            perfect,
            seed: Some(42),
            reference_date: NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
        }
    }

    fn ids(table: &Table, col: usize) -> Vec<String> {
        table
            .body()
            .iter()
            .filter_map(|r| r.get(col))
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn same_seed_same_data() {
        assert_eq!(generate_sample_data(&opts(false)), generate_sample_data(&opts(false)));
        let other = SampleOptions {
            seed: Some(43),
            ..opts(false)
        };
        assert_ne!(generate_sample_data(&opts(false)), generate_sample_data(&other));
    }

    #[test]
    fn perfect_variant_is_a_permutation_of_source_ids() {
        let data = generate_sample_data(&opts(true));
        assert_eq!(data.source.body().len(), 20);
        assert_eq!(data.source.blank_row_count(), 0);

        let source: HashSet<_> = ids(&data.source, 0).into_iter().collect();
        let lookup: HashSet<_> = ids(&data.lookup, 0).into_iter().collect();
        assert_eq!(source, lookup);
        assert!(source.contains("PROD-001") && source.contains("PROD-020"));
    }

    #[test]
    fn standard_variant_has_blank_row_blank_cell_and_strays() {
        let data = generate_sample_data(&opts(false));
        assert_eq!(data.source.rows[0].len(), SOURCE_HEADER.len());
        assert!(data.source.rows[BLANK_ROW_AT].is_empty());
        assert_eq!(data.source.rows[11][5], Value::Null);
        assert_eq!(data.source.body().len(), 21);

        let lookup = ids(&data.lookup, 0);
        assert_eq!(lookup.len(), 20);
        for stray in ["PROD-888", "PROD-999", "PROD-818", "PROD-819"] {
            assert!(lookup.iter().any(|id| id == stray), "missing {stray}");
        }
    }

    #[test]
    fn standard_variant_joins_with_four_misses() {
        let data = generate_sample_data(&opts(false));
        let out = lookup_tables(&data.source, &data.lookup, &LookupSettings::default()).unwrap();
        assert_eq!(out.stats.records_processed, 20);
        assert_eq!(out.stats.matched, 16);
        let misses = out
            .table
            .body()
            .iter()
            .filter(|r| r[1] == Value::from(NOT_FOUND))
            .count();
        assert_eq!(misses, 4);
    }

    #[test]
    fn dates_fall_in_the_year_before_reference() {
        let o = opts(true);
        let data = generate_sample_data(&o);
        let earliest = o.reference_date - chrono::Days::new(364);
        for date in ids(&data.source, 6) {
            let d = NaiveDate::parse_from_str(&date, "%Y-%m-%d").unwrap();
            assert!(d >= earliest && d <= o.reference_date, "{d}");
        }
    }

    #[test]
    fn tiny_row_counts_do_not_panic() {
        for n in 0..6 {
            let data = generate_sample_data(&SampleOptions {
                row_count: n,
                ..opts(false)
            });
            assert_eq!(data.lookup.body().len(), n);
        }
    }

    #[test]
    fn writes_four_csv_files() {
        let dir = std::env::temp_dir().join(format!(
            "sheet_vlookup_samples_{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        let paths = write_sample_files(&dir, SampleFormat::Csv, &opts(false)).unwrap();
        assert_eq!(paths.len(), 4);
        assert!(paths.iter().all(|p| p.exists()));
        assert!(dir.join("sample_lookup_perfect.csv").exists());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
