//! The VLOOKUP-style enrichment join.
//!
//! For each lookup row, the value in the lookup value column is normalized and looked up in a
//! [`LookupIndex`] over the source table's key column. Matches copy the return columns from the
//! first source row with that key; misses are marked [`NOT_FOUND`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LookupError, LookupResult, TableRole};
use crate::settings::LookupSettings;
use crate::types::{Table, Value};

use super::clean::{normalize, CleaningOptions};
use super::columns::{column_letters, resolve_range, resolve_single};
use super::index::LookupIndex;

/// Marker written into every return column of an unmatched row.
pub const NOT_FOUND: &str = "Not Found";

/// Which lookup rows make it into the result table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchFilterMode {
    /// Every lookup row, matched or not.
    #[default]
    All,
    /// Only rows that found a match.
    Found,
    /// Only rows that did not find a match.
    NotFound,
}

impl MatchFilterMode {
    fn keeps(self, matched: bool) -> bool {
        match self {
            MatchFilterMode::All => true,
            MatchFilterMode::Found => matched,
            MatchFilterMode::NotFound => !matched,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MatchFilterMode::All => "all",
            MatchFilterMode::Found => "found",
            MatchFilterMode::NotFound => "notfound",
        }
    }
}

impl fmt::Display for MatchFilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchFilterMode {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(MatchFilterMode::All),
            "found" => Ok(MatchFilterMode::Found),
            "notfound" => Ok(MatchFilterMode::NotFound),
            _ => Err(LookupError::InvalidMode(s.to_string())),
        }
    }
}

/// Controls the shape of result rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputOptions {
    /// Copy the whole lookup row (instead of just the lookup value) in front of the returned
    /// values.
    pub include_all_lookup_columns: bool,
}

/// Resolved (0-based) columns for a join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupColumns {
    /// Column in the lookup table holding the value to look up.
    pub lookup_value: usize,
    /// Column in the source table used as the match key.
    pub key: usize,
    /// Source columns copied into matched rows, ascending.
    pub returns: Vec<usize>,
}

impl LookupColumns {
    /// Resolve the three user-facing column specs.
    ///
    /// Fails with [`LookupError::InvalidColumn`] on the first spec that does not resolve; no
    /// table is touched.
    pub fn resolve(lookup_value: &str, key: &str, returns: &str) -> LookupResult<Self> {
        let lookup_value = resolve_single(lookup_value).ok_or_else(|| LookupError::InvalidColumn {
            field: "lookup value column",
            input: lookup_value.to_string(),
        })?;
        let key = resolve_single(key).ok_or_else(|| LookupError::InvalidColumn {
            field: "key column",
            input: key.to_string(),
        })?;
        let returns = resolve_range(returns).ok_or_else(|| LookupError::InvalidColumn {
            field: "return columns",
            input: returns.to_string(),
        })?;
        Ok(Self {
            lookup_value,
            key,
            returns,
        })
    }
}

/// Everything besides the columns that influences a join.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LookupOptions {
    pub cleaning: CleaningOptions,
    pub output: OutputOptions,
    pub filter: MatchFilterMode,
}

/// Per-run counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LookupStats {
    /// Non-blank lookup rows examined, whether or not they were emitted.
    pub records_processed: usize,
    /// Rows that found a source match.
    pub matched: usize,
    /// Rows that did not.
    pub unmatched: usize,
}

impl LookupStats {
    pub(crate) fn record(&mut self, matched: bool) {
        self.records_processed += 1;
        if matched {
            self.matched += 1;
        } else {
            self.unmatched += 1;
        }
    }

    pub(crate) fn merge(&mut self, other: LookupStats) {
        self.records_processed += other.records_processed;
        self.matched += other.matched;
        self.unmatched += other.unmatched;
    }
}

/// Result of a join: the result table (header first) and run statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupOutcome {
    pub table: Table,
    pub stats: LookupStats,
    /// The filter the table was built with; drives [`Self::summary`].
    pub filter: MatchFilterMode,
}

impl LookupOutcome {
    /// Number of emitted body rows.
    pub fn emitted_rows(&self) -> usize {
        self.table.body().len()
    }

    /// Human-readable one-line summary of the run.
    pub fn summary(&self) -> String {
        summary_message(self.filter, self.emitted_rows(), self.stats.records_processed)
    }
}

/// Summary sentence shown after a run; wording depends on the filter mode.
pub fn summary_message(mode: MatchFilterMode, emitted: usize, processed: usize) -> String {
    match mode {
        MatchFilterMode::Found => format!(
            "{emitted} of {processed} records from the lookup file resulted in a match."
        ),
        MatchFilterMode::NotFound => format!(
            "{emitted} of {processed} records from the lookup file could not be found in the source file."
        ),
        MatchFilterMode::All => format!(
            "{processed} records from the lookup file were processed, showing all results."
        ),
    }
}

/// Header row of the result table.
///
/// Return columns take their source header, or `Column <letters>` when it is missing or empty.
pub fn result_header(
    source: &Table,
    lookup: &Table,
    columns: &LookupColumns,
    output: &OutputOptions,
) -> Vec<Value> {
    let source_header = source.header();
    let lookup_header = lookup.header();

    let mut header = if output.include_all_lookup_columns {
        lookup_header.to_vec()
    } else {
        vec![header_label(lookup_header, columns.lookup_value)]
    };
    header.extend(columns.returns.iter().map(|&c| header_label(source_header, c)));
    header
}

fn header_label(header: &[Value], col: usize) -> Value {
    match header.get(col) {
        Some(v) if !v.is_blank() => v.clone(),
        _ => Value::Utf8(format!("Column {}", column_letters(col))),
    }
}

/// Outcome of matching one lookup row.
#[derive(Debug)]
pub(crate) struct RowMatch {
    pub matched: bool,
    /// `None` when the filter mode drops the row.
    pub row: Option<Vec<Value>>,
}

/// Match one lookup row against the index. Returns `None` for blank rows, which are not records.
pub(crate) fn match_row(
    index: &LookupIndex<'_>,
    row: &[Value],
    columns: &LookupColumns,
    options: &LookupOptions,
) -> Option<RowMatch> {
    if row.is_empty() {
        return None;
    }

    let original = row.get(columns.lookup_value).unwrap_or(&Value::Null);
    let matched_row = normalize(original, &options.cleaning).and_then(|key| index.get(&key));
    let matched = matched_row.is_some();

    if !options.filter.keeps(matched) {
        return Some(RowMatch { matched, row: None });
    }

    let mut out = if options.output.include_all_lookup_columns {
        row.to_vec()
    } else {
        vec![original.clone()]
    };
    match matched_row {
        Some(source_row) => out.extend(columns.returns.iter().map(|&c| match source_row.get(c) {
            Some(v) if !v.is_null() => v.clone(),
            _ => Value::Utf8(String::new()),
        })),
        None => out.extend(columns.returns.iter().map(|_| Value::from(NOT_FOUND))),
    }

    Some(RowMatch {
        matched,
        row: Some(out),
    })
}

/// Join `lookup` against `source`.
///
/// Rows are processed in order; blank lookup rows are skipped and not counted. Only the first
/// source row for a key is ever matched. Returned cells are copied verbatim; only the key and
/// lookup value are normalized.
///
/// ```rust
/// use sheet_vlookup::processing::{join, LookupColumns, LookupOptions};
/// use sheet_vlookup::types::{Table, Value};
///
/// let source = Table::from_rows(vec![vec!["ID", "Val"], vec!["p1", "x"], vec!["p1", "y"]]);
/// let lookup = Table::from_rows(vec![vec!["ID"], vec!["P1"]]);
/// let columns = LookupColumns::resolve("A", "A", "B").unwrap();
///
/// let out = join(&source, &lookup, &columns, &LookupOptions::default());
/// assert_eq!(out.table.rows[1], vec![Value::from("P1"), Value::from("x")]);
/// assert_eq!(out.stats.records_processed, 1);
/// ```
pub fn join(
    source: &Table,
    lookup: &Table,
    columns: &LookupColumns,
    options: &LookupOptions,
) -> LookupOutcome {
    let index = LookupIndex::build(source, columns.key, &options.cleaning);

    let mut rows = vec![result_header(source, lookup, columns, &options.output)];
    let mut stats = LookupStats::default();
    for row in lookup.body() {
        let Some(hit) = match_row(&index, row, columns, options) else {
            continue;
        };
        stats.record(hit.matched);
        if let Some(out) = hit.row {
            rows.push(out);
        }
    }

    LookupOutcome {
        table: Table::new(rows),
        stats,
        filter: options.filter,
    }
}

/// One-call entry point: check inputs, resolve `settings`, then [`join`].
///
/// Fails with [`LookupError::InputMissing`] if either table has no rows, or
/// [`LookupError::InvalidColumn`] if a column spec does not resolve. No partial result is
/// produced on failure.
pub fn lookup_tables(
    source: &Table,
    lookup: &Table,
    settings: &LookupSettings,
) -> LookupResult<LookupOutcome> {
    check_inputs(source, lookup)?;
    let (columns, options) = settings.resolve()?;
    Ok(join(source, lookup, &columns, &options))
}

pub(crate) fn check_inputs(source: &Table, lookup: &Table) -> LookupResult<()> {
    if source.is_empty() {
        return Err(LookupError::InputMissing {
            role: TableRole::Source,
        });
    }
    if lookup.is_empty() {
        return Err(LookupError::InputMissing {
            role: TableRole::Lookup,
        });
    }
    Ok(())
}
