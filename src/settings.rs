//! Persisted lookup configuration.
//!
//! [`LookupSettings`] is the user-facing form of a join configuration (raw column specs plus
//! switches). [`SettingsStore`] keeps it in a JSON key-value file under [`SETTINGS_KEY`], next to
//! whatever else the file already holds.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::error::LookupResult;
use crate::processing::{
    CleaningOptions, LookupColumns, LookupOptions, MatchFilterMode, OutputOptions,
};

/// Key under which settings are stored.
pub const SETTINGS_KEY: &str = "vlookupSettings";

/// A complete, unresolved join configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LookupSettings {
    /// Lookup-table column holding the values to look up (`"A"`, `"1"`).
    pub lookup_value_column: String,
    /// Source-table key column.
    pub key_column: String,
    /// Source columns to return (`"B"`, `"B,D-F"`).
    pub return_columns: String,
    pub trim: bool,
    pub ignore_special: bool,
    pub case_sensitive: bool,
    pub include_all_lookup_columns: bool,
    pub match_filter_mode: MatchFilterMode,
}

impl Default for LookupSettings {
    fn default() -> Self {
        let cleaning = CleaningOptions::default();
        Self {
            lookup_value_column: "A".to_string(),
            key_column: "A".to_string(),
            return_columns: "B".to_string(),
            trim: cleaning.trim,
            ignore_special: cleaning.ignore_special,
            case_sensitive: cleaning.case_sensitive,
            include_all_lookup_columns: false,
            match_filter_mode: MatchFilterMode::All,
        }
    }
}

impl LookupSettings {
    /// Resolve the column specs and package the switches for the engine.
    pub fn resolve(&self) -> LookupResult<(LookupColumns, LookupOptions)> {
        let columns = LookupColumns::resolve(
            &self.lookup_value_column,
            &self.key_column,
            &self.return_columns,
        )?;
        Ok((columns, self.options()))
    }

    /// The non-column part of the configuration.
    pub fn options(&self) -> LookupOptions {
        LookupOptions {
            cleaning: CleaningOptions {
                trim: self.trim,
                ignore_special: self.ignore_special,
                case_sensitive: self.case_sensitive,
            },
            output: OutputOptions {
                include_all_lookup_columns: self.include_all_lookup_columns,
            },
            filter: self.match_filter_mode,
        }
    }
}

/// JSON file holding a top-level object; settings live under [`SETTINGS_KEY`].
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load stored settings. A missing file or missing key yields `Ok(None)`.
    pub fn load(&self) -> LookupResult<Option<LookupSettings>> {
        let mut entries = self.read_entries()?;
        match entries.remove(SETTINGS_KEY) {
            Some(v) => Ok(Some(serde_json::from_value(v)?)),
            None => Ok(None),
        }
    }

    /// Store `settings`, keeping any other keys already in the file.
    pub fn save(&self, settings: &LookupSettings) -> LookupResult<()> {
        let mut entries = self.read_entries()?;
        entries.insert(SETTINGS_KEY.to_string(), serde_json::to_value(settings)?);
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&entries)?)?;
        Ok(())
    }

    /// Remove stored settings. Returns whether anything was removed.
    pub fn clear(&self) -> LookupResult<bool> {
        let mut entries = self.read_entries()?;
        if entries.remove(SETTINGS_KEY).is_none() {
            return Ok(false);
        }
        fs::write(&self.path, serde_json::to_string_pretty(&entries)?)?;
        Ok(true)
    }

    fn read_entries(&self) -> LookupResult<Map<String, JsonValue>> {
        match fs::read_to_string(&self.path) {
            Ok(s) if s.trim().is_empty() => Ok(Map::new()),
            Ok(s) => Ok(serde_json::from_str(&s)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Map::new()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::LookupSettings;
    use crate::processing::MatchFilterMode;

    #[test]
    fn serializes_with_camel_case_keys() {
        let s = LookupSettings {
            match_filter_mode: MatchFilterMode::NotFound,
            ..Default::default()
        };
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["lookupValueColumn"], "A");
        assert_eq!(json["includeAllLookupColumns"], false);
        assert_eq!(json["matchFilterMode"], "notfound");
    }

    #[test]
    fn missing_fields_take_defaults() {
        let s: LookupSettings = serde_json::from_str(r#"{"returnColumns":"C-E"}"#).unwrap();
        assert_eq!(s.return_columns, "C-E");
        assert_eq!(s.key_column, "A");
        assert!(s.trim);
    }

    #[test]
    fn resolve_builds_engine_config() {
        let s = LookupSettings {
            lookup_value_column: "2".to_string(),
            key_column: "c".to_string(),
            return_columns: "D,F-G".to_string(),
            case_sensitive: true,
            ..Default::default()
        };
        let (columns, options) = s.resolve().unwrap();
        assert_eq!(columns.lookup_value, 1);
        assert_eq!(columns.key, 2);
        assert_eq!(columns.returns, vec![3, 5, 6]);
        assert!(options.cleaning.case_sensitive);
        assert_eq!(options.filter, MatchFilterMode::All);
    }

    #[test]
    fn resolve_fails_on_bad_column_list() {
        let s = LookupSettings {
            return_columns: "B,-".to_string(),
            ..Default::default()
        };
        assert!(s.resolve().is_err());
    }
}
