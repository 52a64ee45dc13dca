//! Key normalization applied to the key column and the lookup value column.

use serde::{Deserialize, Serialize};

use crate::types::Value;

/// Controls how cells are turned into match keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningOptions {
    /// Strip leading/trailing whitespace.
    pub trim: bool,
    /// Drop every character that is not an ASCII letter or digit.
    pub ignore_special: bool,
    /// When `false`, keys are ASCII-lowercased.
    pub case_sensitive: bool,
}

impl Default for CleaningOptions {
    fn default() -> Self {
        Self {
            trim: true,
            ignore_special: false,
            case_sensitive: false,
        }
    }
}

/// Normalize a cell into a match key.
///
/// Null stays `None`. Anything else is stringified with [`Value`]'s `Display`, then trimmed,
/// then stripped of special characters, then case-folded, each step only if enabled and always
/// in that order. The result may be an empty string; callers decide what an empty key means.
pub fn normalize(value: &Value, options: &CleaningOptions) -> Option<String> {
    if value.is_null() {
        return None;
    }
    Some(normalize_str(&value.to_string(), options))
}

/// The string half of [`normalize`], for keys that are already text.
pub fn normalize_str(raw: &str, options: &CleaningOptions) -> String {
    let mut s = if options.trim { raw.trim() } else { raw }.to_owned();
    if options.ignore_special {
        s.retain(|c| c.is_ascii_alphanumeric());
    }
    if !options.case_sensitive {
        s.make_ascii_lowercase();
    }
    s
}

#[cfg(test)]
mod tests {
    use super::{normalize, normalize_str, CleaningOptions};
    use crate::types::Value;

    fn opts(trim: bool, ignore_special: bool, case_sensitive: bool) -> CleaningOptions {
        CleaningOptions {
            trim,
            ignore_special,
            case_sensitive,
        }
    }

    #[test]
    fn null_stays_missing() {
        assert_eq!(normalize(&Value::Null, &CleaningOptions::default()), None);
    }

    #[test]
    fn non_strings_use_canonical_text() {
        let o = opts(true, false, false);
        assert_eq!(normalize(&Value::Float64(42.0), &o).as_deref(), Some("42"));
        assert_eq!(normalize(&Value::Int64(42), &o).as_deref(), Some("42"));
        assert_eq!(normalize(&Value::Bool(true), &o).as_deref(), Some("true"));
    }

    #[test]
    fn each_step_is_switchable() {
        let raw = "  Prod-001 ";
        assert_eq!(normalize_str(raw, &opts(false, false, true)), "  Prod-001 ");
        assert_eq!(normalize_str(raw, &opts(true, false, true)), "Prod-001");
        assert_eq!(normalize_str(raw, &opts(false, true, true)), "Prod001");
        assert_eq!(normalize_str(raw, &opts(true, true, false)), "prod001");
    }

    #[test]
    fn case_folding_is_ascii_only() {
        assert_eq!(normalize_str("ÄBC", &opts(false, false, false)), "Äbc");
    }

    #[test]
    fn strip_special_drops_non_ascii_and_whitespace() {
        assert_eq!(normalize_str(" a b\tc-é ", &opts(false, true, true)), "abc");
        assert_eq!(normalize_str("--", &opts(true, true, false)), "");
    }

    #[test]
    fn normalization_is_idempotent() {
        let samples = ["  Mixed Case-01 ", "\tTAB\n", "a.b.c", "ÄÖü 9", "", "   "];
        for case_sensitive in [true, false] {
            for trim in [true, false] {
                for ignore_special in [true, false] {
                    let o = opts(trim, ignore_special, case_sensitive);
                    for s in samples {
                        let once = normalize_str(s, &o);
                        assert_eq!(normalize_str(&once, &o), once, "input={s:?} opts={o:?}");
                    }
                }
            }
        }
    }
}
