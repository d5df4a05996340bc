//! Normalization of survey cell text.
//!
//! - **numeric**: locale-ambiguous amounts and plain counts
//! - **datetime**: day-first survey timestamps

pub mod datetime;
pub mod numeric;

pub use datetime::{day_of_month, parse_day_first};
pub use numeric::{parse_count, to_num};
