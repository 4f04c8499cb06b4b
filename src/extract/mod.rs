// src/extract/mod.rs
pub mod classify;
pub mod month;
pub mod record;

use chrono::NaiveDate;
use tracing::{debug, trace};

use crate::error::ExtractError;
use crate::mapping::Mappings;
use crate::table::WideTable;
use classify::{
    category_name, is_blank_value, is_category_header, is_numeric_label, normalize_quarter,
    parse_target,
};
use month::{month_start, normalize_month_label};

pub use record::{FcstActual, LongRecord, LONG_HEADERS};

/// Body row holding the Fcst/Actual marker per month column.
const MARKER_ROW: usize = 0;
/// Body row holding the month label per month column.
const MONTH_ROW: usize = 1;
/// First body row that can be a category header or data row.
const FIRST_DATA_ROW: usize = 2;

/// The three month columns `<token>`, `<token>.1`, `<token>.2` of one quarter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuarterColumns {
    pub token: String,
    pub names: [String; 3],
    pub indices: [usize; 3],
}

impl QuarterColumns {
    pub fn names_for(token: &str) -> [String; 3] {
        [
            token.to_string(),
            format!("{}.1", token),
            format!("{}.2", token),
        ]
    }

    /// Every header that has its `.1` and `.2` siblings, in column order.
    pub fn discover(table: &WideTable) -> Vec<Self> {
        table
            .headers
            .iter()
            .skip(1)
            .filter_map(|h| Self::locate(table, h).ok())
            .collect()
    }

    /// Find the quarter's columns, failing on the first one that is absent.
    pub fn locate(table: &WideTable, token: &str) -> Result<Self, ExtractError> {
        let names = Self::names_for(token);
        let mut indices = [0usize; 3];
        for (slot, name) in indices.iter_mut().zip(names.iter()) {
            *slot = table
                .column_index(name)
                .ok_or_else(|| ExtractError::MissingColumn {
                    quarter: token.to_string(),
                    column: name.clone(),
                })?;
        }
        Ok(QuarterColumns {
            token: token.to_string(),
            names,
            indices,
        })
    }
}

/// Per-month-column header info read from the two reserved rows.
#[derive(Debug, Clone)]
struct MonthSlot {
    column: String,
    fcst_actual: FcstActual,
    /// Normalised `YYYY-MM` text, or the raw label when it did not normalise.
    label: String,
    date: Option<NaiveDate>,
}

impl MonthSlot {
    fn read(table: &WideTable, name: &str, col: usize) -> Self {
        let label = normalize_month_label(table.cell(MONTH_ROW, col));
        MonthSlot {
            column: name.to_string(),
            fcst_actual: FcstActual::from_marker(table.cell(MARKER_ROW, col)),
            date: month_start(&label),
            label,
        }
    }
}

/// Scan state: the category the next data row belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ScanState {
    NoCategory,
    InCategory(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SkipReason {
    BeforeFirstCategory,
    NoValues,
    NotAChannel,
    ExcludedChannel,
}

/// What one body row means for the quarter being scanned.
#[derive(Debug, PartialEq)]
enum RowKind<'a> {
    Header(String),
    Data { channel: &'a str, values: [&'a str; 3] },
    Skip(SkipReason),
}

fn classify_row<'a>(
    label: &'a str,
    values: [&'a str; 3],
    state: &ScanState,
    mappings: &'a Mappings,
) -> RowKind<'a> {
    if is_category_header(label, mappings) {
        return RowKind::Header(category_name(label, mappings));
    }
    if *state == ScanState::NoCategory {
        return RowKind::Skip(SkipReason::BeforeFirstCategory);
    }
    if values.iter().all(|v| is_blank_value(v)) {
        return RowKind::Skip(SkipReason::NoValues);
    }
    if label.is_empty() || is_numeric_label(label) {
        return RowKind::Skip(SkipReason::NotAChannel);
    }
    let channel = mappings.channel_for(label);
    if mappings.is_excluded_channel(channel) {
        return RowKind::Skip(SkipReason::ExcludedChannel);
    }
    RowKind::Data { channel, values }
}

/// Extract every record of one quarter from the wide table.
///
/// Rows are scanned top to bottom starting after the two reserved header rows; ALL-CAPS labels
/// switch the current category and data rows emit up to one record per month column.
#[tracing::instrument(level = "debug", skip(table, mappings))]
pub fn extract_quarter(
    table: &WideTable,
    quarter: &str,
    mappings: &Mappings,
) -> Result<Vec<LongRecord>, ExtractError> {
    let cols = QuarterColumns::locate(table, quarter)?;
    if table.len() < FIRST_DATA_ROW {
        return Err(ExtractError::MissingHeaderRows {
            quarter: quarter.to_string(),
            found: table.len(),
        });
    }

    let slots: Vec<MonthSlot> = cols
        .names
        .iter()
        .zip(cols.indices)
        .map(|(name, col)| MonthSlot::read(table, name, col))
        .collect();
    let quarter_norm = normalize_quarter(quarter);
    debug!(
        months = ?slots.iter().map(|s| s.label.as_str()).collect::<Vec<_>>(),
        quarter = %quarter_norm,
        "quarter header rows"
    );

    let (_, records) = (FIRST_DATA_ROW..table.len()).try_fold(
        (ScanState::NoCategory, Vec::new()),
        |(state, mut out), row| {
            let label = table.label(row).trim();
            let values = cols.indices.map(|c| table.cell(row, c).trim());

            let next = match classify_row(label, values, &state, mappings) {
                RowKind::Header(category) => {
                    debug!(row, %category, "category");
                    ScanState::InCategory(category)
                }
                RowKind::Skip(reason) => {
                    trace!(row, label, ?reason, "skip row");
                    state
                }
                RowKind::Data { channel, values } => {
                    if let ScanState::InCategory(category) = &state {
                        emit_row(
                            &mut out,
                            &slots,
                            values,
                            channel,
                            category,
                            quarter,
                            &quarter_norm,
                        )?;
                    }
                    state
                }
            };
            Ok::<_, ExtractError>((next, out))
        },
    )?;

    debug!(quarter, records = records.len(), "quarter extracted");
    Ok(records)
}

/// Push one record per non-blank, numeric month value of a data row.
fn emit_row(
    out: &mut Vec<LongRecord>,
    slots: &[MonthSlot],
    values: [&str; 3],
    channel: &str,
    category: &str,
    quarter: &str,
    quarter_norm: &str,
) -> Result<(), ExtractError> {
    for (slot, value) in slots.iter().zip(values) {
        if is_blank_value(value) {
            continue;
        }
        let date = slot.date.ok_or_else(|| ExtractError::BadMonthLabel {
            quarter: quarter.to_string(),
            column: slot.column.clone(),
            label: slot.label.clone(),
        })?;
        let Some(target) = parse_target(value) else {
            trace!(channel, value, column = %slot.column, "unparsable value");
            continue;
        };
        out.push(LongRecord {
            date,
            target,
            channel: channel.to_string(),
            quarter: quarter_norm.to_string(),
            fcst_actual: slot.fcst_actual.clone(),
            category: category.to_string(),
        });
    }
    Ok(())
}
