use thiserror::Error;

/// Convenience result type used across the crate.
pub type LookupResult<T> = Result<T, LookupError>;

/// Which input table an error or event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableRole {
    /// The reference table whose rows are matched against.
    Source,
    /// The table whose rows are enriched.
    Lookup,
}

impl std::fmt::Display for TableRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableRole::Source => f.write_str("source"),
            TableRole::Lookup => f.write_str("lookup"),
        }
    }
}

/// Error type returned by ingestion, lookup, export and settings functions.
///
/// Per-row anomalies (blank rows, short rows, unmatched keys) are data, not errors; nothing here
/// is raised once row processing has started.
#[derive(Debug, Error)]
pub enum LookupError {
    /// A column identifier did not resolve (non-positive number, non-letter text, malformed or
    /// reversed range). Raised before any row is processed.
    #[error("invalid column reference for {field}: '{input}'")]
    InvalidColumn { field: &'static str, input: String },

    /// One of the input tables has no rows at all.
    #[error("the {role} table is empty; load both a source and a lookup table")]
    InputMissing { role: TableRole },

    /// A match filter mode string was not one of `all`, `found`, `notfound`.
    #[error("invalid match filter mode '{0}' (expected all, found or notfound)")]
    InvalidMode(String),

    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read/write error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[cfg(feature = "excel")]
    /// Excel read error (feature-gated behind `excel`).
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    #[cfg(feature = "samples")]
    /// Excel write error (feature-gated behind `samples`).
    #[error("xlsx write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// Settings could not be (de)serialized.
    #[error("settings error: {0}")]
    Settings(#[from] serde_json::Error),

    /// The worker pool for parallel joins could not be created.
    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// The input format is unknown or not enabled in this build.
    #[error("unsupported format: {message}")]
    UnsupportedFormat { message: String },
}
