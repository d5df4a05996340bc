//! Survey export ingestion.
//!
//! Loads one input table (CSV or spreadsheet) into a Polars DataFrame with
//! every field kept as text, and provides the AnyValue helpers the rest of
//! the pipeline uses to read cells.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use canje_ingest::{read_table, ReadOptions};
//!
//! let df = read_table(Path::new("encuestas.xlsx"), &ReadOptions::default())?;
//! ```

mod error;
mod polars_utils;
mod reader;

// === Error Types ===
pub use error::{IngestError, Result};

// === Reading ===
pub use reader::{InputFormat, ReadOptions, read_csv, read_table, read_workbook};

// === Cell helpers ===
pub use polars_utils::{
    any_to_opt_string, any_to_string, column_names, format_numeric, is_blank_value,
};
