//! Fatal extraction errors.
//!
//! Row-level problems (unparsable values, placeholder cells) never surface here; they are skipped
//! during the scan. Anything in this enum stops the whole run.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("quarter {quarter}: expected column '{column}' not found in input")]
    MissingColumn { quarter: String, column: String },

    #[error("quarter {quarter}: need the Fcst/Actual and month label rows, table has {found} body row(s)")]
    MissingHeaderRows { quarter: String, found: usize },

    #[error("quarter {quarter}: month label '{label}' in column '{column}' is not a recognisable month")]
    BadMonthLabel {
        quarter: String,
        column: String,
        label: String,
    },
}
