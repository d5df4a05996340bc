//! Report assembly for validation runs.
//!
//! - **bundle**: ordered named tables plus the summary, written as CSV files
//!   and `summary.json`
//! - **sheet**: sheet-name sanitizing, length capping and uniqueness

pub mod bundle;
pub mod sheet;

pub use bundle::{NamedTable, ReportBundle, SUMMARY_FILE, write_bundle};
pub use sheet::{MAX_SHEET_NAME_LEN, SheetNamer, sanitize_sheet_name};
