//! First-match index over the source table.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::types::{Table, Value};

use super::clean::{normalize, CleaningOptions};

/// Maps a normalized key to the first source row carrying it.
///
/// Built once per join and never mutated afterwards. Rows are borrowed from the source table.
#[derive(Debug)]
pub struct LookupIndex<'a> {
    rows: &'a [Vec<Value>],
    keys: HashMap<String, usize>,
}

impl<'a> LookupIndex<'a> {
    /// Index `source` by `key_column`.
    ///
    /// - The header row is not indexed.
    /// - Zero-length (blank) rows are skipped; rows that are merely too short read a missing key.
    /// - Keys that normalize to missing or to the empty string are skipped.
    /// - The first occurrence of a key wins; later duplicates are ignored.
    pub fn build(source: &'a Table, key_column: usize, cleaning: &CleaningOptions) -> Self {
        let mut keys = HashMap::new();
        for (pos, row) in source.rows.iter().enumerate().skip(1) {
            if row.is_empty() {
                continue;
            }
            let cell = row.get(key_column).unwrap_or(&Value::Null);
            let Some(key) = normalize(cell, cleaning) else {
                continue;
            };
            if key.is_empty() {
                continue;
            }
            if let Entry::Vacant(slot) = keys.entry(key) {
                slot.insert(pos);
            }
        }
        Self {
            rows: &source.rows,
            keys,
        }
    }

    /// The matched source row for an already-normalized key.
    ///
    /// The empty key never matches.
    pub fn get(&self, key: &str) -> Option<&'a [Value]> {
        let rows = self.rows;
        self.position(key).map(|pos| rows[pos].as_slice())
    }

    /// Row number (in the source table, header = 0) of the matched row.
    pub fn position(&self, key: &str) -> Option<usize> {
        if key.is_empty() {
            return None;
        }
        self.keys.get(key).copied()
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
