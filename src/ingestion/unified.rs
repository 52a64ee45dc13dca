//! Unified table loading.
//!
//! Most callers should use [`load_table_from_path`], which reads a spreadsheet file into an
//! in-memory [`crate::types::Table`].
//!
//! - If [`LoadOptions::format`] is `None`, the format is inferred from the file extension.
//! - If an [`super::observability::IngestionObserver`] is provided, success/failure/alerts are
//!   reported to it.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::{LookupError, LookupResult, TableRole};
use crate::types::Table;

use super::csv::{self, CsvReadOptions};
use super::observability::{IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats};

/// Supported table formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// Comma-separated values (delimiter from [`CsvReadOptions`]).
    Csv,
    /// Tab-separated values.
    Tsv,
    /// Spreadsheet/workbook formats (feature-gated behind `excel`).
    Excel,
}

impl TableFormat {
    /// Parse a format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" | "txt" => Some(Self::Csv),
            "tsv" | "tab" => Some(Self::Tsv),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Some(Self::Excel),
            _ => None,
        }
    }
}

/// Which worksheet of a workbook to read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SheetSelection {
    /// The first sheet (default).
    #[default]
    First,
    /// A sheet by name.
    Named(String),
}

/// Options controlling [`load_table_from_path`].
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct LoadOptions {
    /// If `None`, infer the format from the file extension.
    pub format: Option<TableFormat>,
    /// Excel-specific sheet choice.
    pub sheet: SheetSelection,
    /// CSV/TSV-specific options. For [`TableFormat::Tsv`] the delimiter is forced to a tab.
    pub csv: CsvReadOptions,
    /// Side of the lookup this table feeds; only used to label observer events.
    pub role: Option<TableRole>,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn IngestionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: IngestionSeverity,
}

impl fmt::Debug for LoadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadOptions")
            .field("format", &self.format)
            .field("sheet", &self.sheet)
            .field("csv", &self.csv)
            .field("role", &self.role)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            format: None,
            sheet: SheetSelection::default(),
            csv: CsvReadOptions::default(),
            role: None,
            observer: None,
            alert_at_or_above: IngestionSeverity::Critical,
        }
    }
}

impl LoadOptions {
    /// Same options, labelled as the given side of the lookup.
    pub fn for_role(&self, role: TableRole) -> Self {
        Self {
            role: Some(role),
            ..self.clone()
        }
    }
}

/// Load a table from `path`.
///
/// When an observer is configured, this reports `on_success` with the table shape, or
/// `on_failure` (plus `on_alert` at or above `options.alert_at_or_above`) with a computed
/// severity.
///
/// ```no_run
/// use sheet_vlookup::ingestion::{load_table_from_path, LoadOptions, SheetSelection};
///
/// # fn main() -> Result<(), sheet_vlookup::LookupError> {
/// let opts = LoadOptions {
///     sheet: SheetSelection::Named("Products".to_string()),
///     ..Default::default()
/// };
/// let source = load_table_from_path("products.xlsx", &opts)?;
/// println!("rows={}", source.row_count());
/// # Ok(())
/// # }
/// ```
pub fn load_table_from_path(path: impl AsRef<Path>, options: &LoadOptions) -> LookupResult<Table> {
    let path = path.as_ref();
    let format = match options.format {
        Some(f) => f,
        None => infer_format_from_path(path)?,
    };

    let ctx = IngestionContext {
        path: path.to_path_buf(),
        format,
        role: options.role,
    };

    let result = match format {
        TableFormat::Csv => csv::read_csv_from_path(path, &options.csv),
        TableFormat::Tsv => csv::read_csv_from_path(
            path,
            &CsvReadOptions {
                delimiter: b'\t',
                ..options.csv
            },
        ),
        TableFormat::Excel => load_excel_dispatch(path, &options.sheet),
    };

    if let Some(obs) = options.observer.as_ref() {
        match &result {
            Ok(table) => obs.on_success(
                &ctx,
                IngestionStats {
                    rows: table.row_count(),
                    blank_rows: table.blank_row_count(),
                    width: table.rows.iter().map(Vec::len).max().unwrap_or(0),
                },
            ),
            Err(e) => {
                let sev = severity_for_error(e);
                obs.on_failure(&ctx, sev, e);
                if sev >= options.alert_at_or_above {
                    obs.on_alert(&ctx, sev, e);
                }
            }
        }
    }

    result
}

fn severity_for_error(e: &LookupError) -> IngestionSeverity {
    match e {
        LookupError::Io(_) => IngestionSeverity::Critical,
        LookupError::Csv(err) => match err.kind() {
            ::csv::ErrorKind::Io(_) => IngestionSeverity::Critical,
            _ => IngestionSeverity::Error,
        },
        #[cfg(feature = "excel")]
        LookupError::Excel(calamine::Error::Io(_)) => IngestionSeverity::Critical,
        _ => IngestionSeverity::Error,
    }
}

fn infer_format_from_path(path: &Path) -> LookupResult<TableFormat> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| LookupError::UnsupportedFormat {
            message: format!("cannot infer format: path has no extension ({})", path.display()),
        })?;

    TableFormat::from_extension(ext).ok_or_else(|| LookupError::UnsupportedFormat {
        message: format!(
            "cannot infer format from extension '{ext}' for path ({})",
            path.display()
        ),
    })
}

fn load_excel_dispatch(path: &Path, sheet: &SheetSelection) -> LookupResult<Table> {
    #[cfg(feature = "excel")]
    {
        let name = match sheet {
            SheetSelection::First => None,
            SheetSelection::Named(name) => Some(name.as_str()),
        };
        super::excel::read_excel_from_path(path, name)
    }

    #[cfg(not(feature = "excel"))]
    {
        let _ = (path, sheet);
        Err(LookupError::UnsupportedFormat {
            message: "excel ingestion not enabled (enable cargo feature 'excel')".to_string(),
        })
    }
}
