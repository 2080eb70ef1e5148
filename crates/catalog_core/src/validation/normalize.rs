//! Whitespace normalization for user-supplied names.

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Trims surrounding whitespace and collapses every internal whitespace run
/// (spaces, tabs, newlines) into one space.
///
/// Total and idempotent: `normalize(normalize(s)) == normalize(s)`.
pub fn normalize(raw: &str) -> String {
    WHITESPACE_RE.replace_all(raw.trim(), " ").into_owned()
}

/// Normalizes optional input, mapping absent values to the empty string.
pub fn normalize_opt(raw: Option<&str>) -> String {
    raw.map(normalize).unwrap_or_default()
}

/// Returns whether a value is absent or blank once normalized.
pub fn is_blank(raw: Option<&str>) -> bool {
    raw.map_or(true, |value| value.trim().is_empty())
}
