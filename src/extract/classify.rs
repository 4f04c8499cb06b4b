//! Row-label heuristics and cell coercions used by the quarter scan.
//!
//! Each function looks at one string and nothing else.

use crate::mapping::Mappings;
use once_cell::sync::Lazy;
use regex::Regex;

static NUMERIC_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-\d.,%\s]+$").expect("valid numeric label regex"));

static DECIMAL_DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d").expect("valid digit regex"));

static NON_ALNUM_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid snake regex"));

/// Placeholder a spreadsheet uses for "no value".
pub const DASH_PLACEHOLDER: &str = "-";

const STRIPPED_SYMBOLS: &[char] = &[',', '$', '€', '£', '¥', '%'];

/// An ALL-CAPS, digit-free, non-empty label starts a new category block,
/// unless the mappings list it as a data row.
pub fn is_category_header(label: &str, mappings: &Mappings) -> bool {
    let t = label.trim();
    if t.is_empty() || mappings.is_header_exception(t) {
        return false;
    }
    !DECIMAL_DIGIT.is_match(t) && t.to_uppercase() == t
}

/// Stray total/calculation lines whose "label" is just a number.
pub fn is_numeric_label(label: &str) -> bool {
    NUMERIC_LABEL.is_match(label)
}

pub fn is_blank_value(value: &str) -> bool {
    value.is_empty() || value == DASH_PLACEHOLDER
}

/// Lowercase, collapse runs of anything outside `[a-z0-9]` to `_`, trim underscores.
pub fn to_snake(s: &str) -> String {
    let lower = s.trim().to_lowercase();
    NON_ALNUM_RUN
        .replace_all(&lower, "_")
        .trim_matches('_')
        .to_string()
}

/// Category token for a header label, after the alias table.
pub fn category_name(label: &str, mappings: &Mappings) -> String {
    mappings.category_alias(to_snake(label))
}

/// `Q3'25` → `q3_25`
pub fn normalize_quarter(quarter: &str) -> String {
    quarter.to_lowercase().replace('\'', "_")
}

/// Strip thousands separators, currency and percent signs, then parse.
/// `12%` is 12.0, not 0.12.
pub fn parse_target(value: &str) -> Option<f64> {
    let cleaned: String = value.chars().filter(|c| !STRIPPED_SYMBOLS.contains(c)).collect();
    cleaned.trim().parse::<f64>().ok()
}
