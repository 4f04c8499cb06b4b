// src/table.rs
use anyhow::{bail, Context, Result};
use csv::ReaderBuilder;
use std::{collections::HashMap, fs::File, io::Read, path::Path};
use tracing::{debug, info};

/// The wide forecast sheet, every cell kept as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WideTable {
    /// Column names from the header row, with blanks named `Unnamed: <i>` and repeats suffixed
    /// `.1`, `.2`, ... so every name is unique.
    pub headers: Vec<String>,
    /// Body rows, each padded to `headers.len()` cells. Blank cells are empty strings.
    pub rows: Vec<Vec<String>>,
}

impl WideTable {
    /// Build a table from a raw header row and body rows, applying the same header
    /// naming and padding rules as the CSV loader.
    pub fn new(raw_headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let headers = dedupe_headers(raw_headers);
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut r| {
                r.resize(width.max(r.len()), String::new());
                r
            })
            .collect();
        WideTable { headers, rows }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell text at (`row`, `col`), or `""` when out of range.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// The row-label text for body row `row` (first column).
    pub fn label(&self, row: usize) -> &str {
        self.cell(row, 0)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Open `path` and load it as a [`WideTable`].
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_wide_csv<P: AsRef<Path>>(path: P) -> Result<WideTable> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open input CSV: {:?}", path.as_ref()))?;
    let table = read_wide_csv(file)
        .with_context(|| format!("Failed to parse input CSV: {:?}", path.as_ref()))?;
    info!(
        columns = table.headers.len(),
        rows = table.rows.len(),
        "loaded wide table"
    );
    Ok(table)
}

/// Parse CSV text into a [`WideTable`]. The first record is the header row.
pub fn read_wide_csv<R: Read>(reader: R) -> Result<WideTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true) // short rows are padded below, long rows are rejected
        .from_reader(reader);

    let mut raw_headers: Option<Vec<String>> = None;
    let mut rows: Vec<Vec<String>> = Vec::new();

    for (idx, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("CSV parse error at record {}", idx))?;
        let line = record.position().map(|p| p.line()).unwrap_or(idx as u64 + 1);

        if record.len() == 1 && record.get(0) == Some("") {
            continue;
        }

        match raw_headers.as_ref().map(Vec::len) {
            None => {
                let mut cols: Vec<String> = record.iter().map(|s| s.to_string()).collect();
                if let Some(first) = cols.first_mut() {
                    if let Some(stripped) = first.strip_prefix('\u{feff}') {
                        *first = stripped.to_string();
                    }
                }
                raw_headers = Some(cols);
            }
            Some(width) => {
                if record.len() > width {
                    bail!(
                        "expected {} fields in line {}, saw {}",
                        width,
                        line,
                        record.len()
                    );
                }
                rows.push(record.iter().map(|s| s.to_string()).collect());
            }
        }
    }

    let Some(raw_headers) = raw_headers else {
        bail!("input has no header row");
    };
    debug!(raw = ?raw_headers, "header row");
    Ok(WideTable::new(raw_headers, rows))
}

/// Name blank headers `Unnamed: <i>` and suffix repeats with `.1`, `.2`, ...
/// A suffixed name that is already taken gets suffixed again (`a.1` → `a.1.1`).
fn dedupe_headers(raw: Vec<String>) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::with_capacity(raw.len());

    for (i, name) in raw.into_iter().enumerate() {
        let mut col = if name.is_empty() {
            format!("Unnamed: {}", i)
        } else {
            name
        };
        let mut cur = counts.get(&col).copied().unwrap_or(0);
        while cur > 0 {
            counts.insert(col.clone(), cur + 1);
            col = format!("{}.{}", col, cur);
            cur = counts.get(&col).copied().unwrap_or(0);
        }
        counts.insert(col.clone(), cur + 1);
        out.push(col);
    }
    out
}
