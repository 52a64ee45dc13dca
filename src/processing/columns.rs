//! Column references: `"3"`, `"C"`, `"AA"` and lists/ranges like `"B,D-F,H"`.
//!
//! Numbers are 1-based, letters are spreadsheet columns; everything resolves to a 0-based index.

/// Resolve a single column identifier to a 0-based index.
///
/// - A positive integer `n` resolves to `n - 1`; `0` and negatives do not resolve.
/// - One or more ASCII letters (case-insensitive) resolve as a spreadsheet column:
///   `A` → 0, `Z` → 25, `AA` → 26.
/// - Anything else (including empty input) returns `None`.
pub fn resolve_single(input: &str) -> Option<usize> {
    let part = input.trim().to_ascii_uppercase();
    if part.is_empty() {
        return None;
    }

    if let Ok(n) = part.parse::<i64>() {
        return if n >= 1 { usize::try_from(n - 1).ok() } else { None };
    }

    if !part.bytes().all(|b| b.is_ascii_uppercase()) {
        return None;
    }

    // Bijective base-26: no zero digit, so accumulate 1..=26 per letter.
    let mut acc: usize = 0;
    for b in part.bytes() {
        acc = acc
            .checked_mul(26)?
            .checked_add(usize::from(b - b'A') + 1)?;
    }
    Some(acc - 1)
}

/// Last column a worksheet can have (`XFD`). Range ends beyond it do not resolve.
pub const MAX_COLUMN_INDEX: usize = 16_383;

/// Resolve a comma-separated list of column identifiers and inclusive `start-end` ranges.
///
/// Returns the indices ascending and without duplicates. Empty input yields `Some(vec![])`.
/// If any component fails to resolve, a range ends before it starts, or a range ends past
/// [`MAX_COLUMN_INDEX`], the whole call returns `None`.
pub fn resolve_range(input: &str) -> Option<Vec<usize>> {
    if input.trim().is_empty() {
        return Some(Vec::new());
    }

    let mut out: Vec<usize> = Vec::new();
    for part in input.split(',') {
        let part = part.trim();
        match part.split_once('-') {
            Some((start, end)) => {
                let start = resolve_single(start)?;
                let end = resolve_single(end)?;
                if end < start || end > MAX_COLUMN_INDEX {
                    return None;
                }
                out.extend(start..=end);
            }
            None => out.push(resolve_single(part)?),
        }
    }

    out.sort_unstable();
    out.dedup();
    Some(out)
}

/// Spreadsheet letters for a 0-based column index: 0 → `A`, 25 → `Z`, 26 → `AA`, 702 → `AAA`.
pub fn column_letters(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        n -= 1;
        letters.push(b'A' + (n % 26) as u8);
        n /= 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}
