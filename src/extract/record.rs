use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::fmt;

/// Whether a month column holds forecast or actual figures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FcstActual {
    Forecast,
    Actual,
    /// Marker that is neither; carried through lowercased (possibly empty).
    Other(String),
}

impl FcstActual {
    /// Classify a row-0 marker cell (`Fcst`, `Actual`, `Actuals`, ...).
    pub fn from_marker(marker: &str) -> Self {
        let lower = marker.trim().to_lowercase();
        if lower.starts_with("fcst") {
            FcstActual::Forecast
        } else if lower.starts_with("act") {
            FcstActual::Actual
        } else {
            FcstActual::Other(lower)
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FcstActual::Forecast => "forecast",
            FcstActual::Actual => "actual",
            FcstActual::Other(s) => s,
        }
    }
}

impl fmt::Display for FcstActual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FcstActual {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.as_str())
    }
}

/// One observation in the long output table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LongRecord {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Target", serialize_with = "serialize_target")]
    pub target: f64,
    #[serde(rename = "Channel")]
    pub channel: String,
    #[serde(rename = "Quarter")]
    pub quarter: String,
    #[serde(rename = "Fcst_Actual")]
    pub fcst_actual: FcstActual,
    pub category: String,
}

/// Column order of the long CSV.
pub const LONG_HEADERS: [&str; 6] = [
    "Date",
    "Target",
    "Channel",
    "Quarter",
    "Fcst_Actual",
    "category",
];

/// Integral values keep a trailing `.0`; NaN is an empty cell.
pub fn format_target(v: f64) -> String {
    if v.is_nan() {
        String::new()
    } else if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 {
        format!("{:.1}", v)
    } else {
        format!("{}", v)
    }
}

fn serialize_target<S: Serializer>(v: &f64, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&format_target(*v))
}
