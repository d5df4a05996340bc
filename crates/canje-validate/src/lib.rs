//! Partition rule evaluation and outcome merging.
//!
//! - **engine**: splits records by discriminator and applies threshold predicates
//! - **merge**: unions violations into per-record status and reason

pub mod engine;
pub mod merge;

pub use engine::{PartitionResult, RuleEngine};
pub use merge::{MergedResult, merge_outcomes, reasons_by_id};
