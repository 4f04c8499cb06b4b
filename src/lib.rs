pub mod error;
pub mod extract;
pub mod mapping;
pub mod run;
pub mod table;
pub mod write;

pub use error::ExtractError;
pub use extract::{extract_quarter, FcstActual, LongRecord, QuarterColumns};
pub use mapping::Mappings;
pub use run::{run, RunConfig, RunSummary};
pub use table::{load_wide_csv, WideTable};
