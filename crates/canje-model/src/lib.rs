//! Data model for promotional-redemption validation.
//!
//! - **rules**: rule tables (variant configuration expressed as data)
//! - **presets**: the built-in Polo and Ticket Sorteo tables
//! - **outcome**: statuses, violations and the run summary
//! - **error**: the error taxonomy shared by every pipeline stage

pub mod error;
pub mod outcome;
pub mod presets;
pub mod rules;

pub use error::{CanjeError, Result};
pub use outcome::{
    PartitionErrorCount, REASON_DELIMITER, REASON_FIELD, STATUS_FIELD, Status, Summary, Violation,
};
pub use presets::{Variant, polo_rules, ticket_sorteo_rules};
pub use rules::{
    CategoryRewrite, ConstantFieldRule, DayOfMonthRule, ExclusionRule, PartitionRule,
    PhotoFlagRule, RuleTable, Selector, ThresholdPredicate,
};
