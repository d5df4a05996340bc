//! Survey record set transformation.
//!
//! - **normalization**: numeric text and timestamp normalization
//! - **columns**: deduplication, field drops, derived and constant fields,
//!   conditional category rewrites, exclusions and fills
//! - **frame**: DataFrame access helpers

pub mod columns;
pub mod frame;
pub mod normalization;

pub use columns::{
    apply_exclusions, dedupe_by_id, derive_photo_flag, drop_fields, fill_missing,
    insert_constant_field, insert_day_of_month, rewrite_category,
};
pub use frame::{column_strings, has_column, require_fields};
pub use normalization::{parse_count, to_num};
