//! Validation pipeline for promotional-redemption survey exports.
//!
//! [`process`] takes a record set and a [`RuleTable`](canje_model::RuleTable)
//! and returns the report bundle. It holds no state between calls.

pub mod pipeline;
pub mod steps;

pub use pipeline::{ProcessOutput, process, process_with};
pub use steps::{StepState, TransformPipeline, TransformStep};
