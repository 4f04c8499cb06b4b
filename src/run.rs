// src/run.rs
use anyhow::Result;
use std::{fmt, path::PathBuf, time::Instant};
use tracing::info;

use crate::{
    error::ExtractError,
    extract::{extract_quarter, LongRecord},
    mapping::Mappings,
    table::{load_wide_csv, WideTable},
    write::write_long_csv,
};

/// Everything one conversion needs.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub in_csv: PathBuf,
    pub quarters: Vec<String>,
    pub out_csv: PathBuf,
    pub mappings: Mappings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub out_csv: PathBuf,
    pub rows: usize,
    /// Records per requested quarter, in request order.
    pub per_quarter: Vec<(String, usize)>,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quarters: Vec<&str> = self.per_quarter.iter().map(|(q, _)| q.as_str()).collect();
        write!(
            f,
            "Success ! Wrote {} with {} rows across quarters: {}",
            self.out_csv.display(),
            self.rows,
            quarters.join(", ")
        )
    }
}

/// Split a `Q3'25,Q4'25` style argument, dropping blanks and keeping order.
pub fn parse_quarter_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(String::from)
        .collect()
}

/// Extract every requested quarter in order and concatenate the results.
/// The first quarter that fails aborts the lot.
pub fn extract_all(
    table: &WideTable,
    quarters: &[String],
    mappings: &Mappings,
) -> Result<(Vec<LongRecord>, Vec<(String, usize)>), ExtractError> {
    let mut all = Vec::new();
    let mut per_quarter = Vec::with_capacity(quarters.len());
    for q in quarters {
        let part = extract_quarter(table, q, mappings)?;
        info!(quarter = %q, records = part.len(), "extracted");
        per_quarter.push((q.clone(), part.len()));
        all.extend(part);
    }
    Ok((all, per_quarter))
}

/// Load → extract → write. Nothing is written unless every quarter extracts.
pub fn run(cfg: &RunConfig) -> Result<RunSummary> {
    let start = Instant::now();
    let table = load_wide_csv(&cfg.in_csv)?;
    let (records, per_quarter) = extract_all(&table, &cfg.quarters, &cfg.mappings)?;
    write_long_csv(&cfg.out_csv, &records)?;
    info!(rows = records.len(), elapsed = ?start.elapsed(), "run complete");

    Ok(RunSummary {
        out_csv: cfg.out_csv.clone(),
        rows: records.len(),
        per_quarter,
    })
}
