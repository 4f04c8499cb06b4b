use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static MONTH_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z]{3,4})[-/']?([0-9]{2}|[0-9]{4})$").expect("valid month regex")
});

fn month_number(abbr: &str) -> Option<u32> {
    let m = match abbr.to_ascii_lowercase().as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" | "sept" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(m)
}

/// Normalise a month label such as `Jul-25`, `Jul/25`, `Jul'25`, `Sept2025` to `YYYY-MM`.
/// Two-digit years are taken as 20YY. Text that does not look like a month comes back trimmed
/// but otherwise unchanged.
pub fn normalize_month_label(raw: &str) -> String {
    let s = raw.trim();
    let Some(caps) = MONTH_LABEL.captures(s) else {
        return s.to_string();
    };
    let (Some(month), Ok(mut year)) = (month_number(&caps[1]), caps[2].parse::<u32>()) else {
        return s.to_string();
    };
    if year < 100 {
        year += 2000;
    }
    format!("{}-{:02}", year, month)
}

/// First day of the month named by a `YYYY-MM` string.
pub fn month_start(yyyy_mm: &str) -> Option<NaiveDate> {
    let (y, m) = yyyy_mm.split_once('-')?;
    if y.is_empty() || !y.bytes().all(|b| b.is_ascii_digit()) || m.len() != 2 {
        return None;
    }
    NaiveDate::from_ymd_opt(y.parse().ok()?, m.parse().ok()?, 1)
}
