//! Rule tables describing one promotion variant.
//!
//! A [`RuleTable`] is pure data: field names, column edits, partitions and
//! their threshold predicates. The engine never branches on the variant, so a
//! new promotion is added by writing a new table (or a JSON file) rather than
//! new code.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{CanjeError, Result};

/// Complete configuration of one validation pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleTable {
    /// Machine name (e.g. "polo").
    pub name: String,
    /// Human-readable name shown in summaries.
    pub label: String,
    /// Unique survey identifier.
    pub id_field: String,
    /// Field whose value selects the partition of a record.
    pub discriminator_field: String,
    /// Promotional item count.
    pub count_field: String,
    /// Purchase amount (locale-ambiguous text).
    pub amount_field: String,
    /// Photo evidence link, included in the error report when present.
    #[serde(default)]
    pub evidence_field: Option<String>,
    /// Fields removed right after deduplication.
    #[serde(default)]
    pub drop_fields: Vec<String>,
    #[serde(default)]
    pub day_of_month: Option<DayOfMonthRule>,
    #[serde(default)]
    pub constant_fields: Vec<ConstantFieldRule>,
    #[serde(default)]
    pub photo_flag: Option<PhotoFlagRule>,
    #[serde(default)]
    pub category_rewrites: Vec<CategoryRewrite>,
    #[serde(default)]
    pub exclusions: Vec<ExclusionRule>,
    /// Partitions in declared order; reasons are concatenated in this order.
    pub partitions: Vec<PartitionRule>,
    pub result_sheet: String,
    pub errors_sheet: String,
}

/// Derives a day-of-month field from a timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayOfMonthRule {
    pub timestamp_field: String,
    /// The derived field is inserted immediately before this one.
    pub anchor_field: String,
    pub output_field: String,
}

/// Inserts a fixed-value field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstantFieldRule {
    pub field: String,
    pub value: String,
    /// Both `anchor_field` and `before_field` must exist for the field to be
    /// positioned; otherwise it is appended last.
    pub anchor_field: String,
    pub before_field: String,
}

/// Rewrites a "SI"/"NO" flag from the presence of an evidence link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoFlagRule {
    pub flag_field: String,
    pub evidence_field: String,
}

/// Conditional rewrite of a categorical field, scoped by discriminator value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRewrite {
    pub field: String,
    /// Discriminator value (trimmed) that scopes the rewrite.
    pub when_equals: String,
    pub default_value: String,
    /// Compared case- and whitespace-insensitively against the prior value.
    pub override_token: String,
    pub override_value: String,
}

/// Removes rows before partitioning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionRule {
    pub field: String,
    /// Exclude rows where the field is blank.
    #[serde(default)]
    pub blank: bool,
    /// Exclude rows whose trimmed value equals one of these.
    #[serde(default)]
    pub values: Vec<String>,
}

impl ExclusionRule {
    /// Returns true when a cell value excludes its row.
    pub fn excludes(&self, value: Option<&str>) -> bool {
        let trimmed = value.map(str::trim).unwrap_or("");
        if trimmed.is_empty() {
            return self.blank;
        }
        self.values.iter().any(|v| v.trim() == trimmed)
    }
}

/// How a partition selects records by discriminator value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum Selector {
    Equals(String),
    NotEquals(String),
}

impl Selector {
    /// Matches a discriminator value after trimming.
    pub fn matches(&self, value: Option<&str>) -> bool {
        let trimmed = value.map(str::trim).unwrap_or("");
        match self {
            Selector::Equals(expected) => trimmed == expected.trim(),
            Selector::NotEquals(expected) => trimmed != expected.trim(),
        }
    }
}

/// A named subset of records with its own threshold predicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartitionRule {
    pub name: String,
    pub selector: Selector,
    /// Value written into blank count cells of this partition before
    /// evaluation.
    #[serde(default)]
    pub missing_count_default: Option<i64>,
    /// Output sheet holding the filtered view of this partition.
    pub sheet: String,
    pub predicates: Vec<ThresholdPredicate>,
}

/// `(count == count) AND (amount < amount_below)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdPredicate {
    pub count: i64,
    pub amount_below: f64,
    pub reason: String,
}

impl ThresholdPredicate {
    pub fn new(count: i64, amount_below: f64, reason: impl Into<String>) -> Self {
        Self {
            count,
            amount_below,
            reason: reason.into(),
        }
    }

    /// A missing operand never matches.
    pub fn matches(&self, count: Option<i64>, amount: Option<f64>) -> bool {
        match (count, amount) {
            (Some(count), Some(amount)) => count == self.count && amount < self.amount_below,
            _ => false,
        }
    }
}

impl PartitionRule {
    /// Returns the first predicate matching the operands, in declared order.
    pub fn first_violation(
        &self,
        count: Option<i64>,
        amount: Option<f64>,
    ) -> Option<&ThresholdPredicate> {
        self.predicates.iter().find(|p| p.matches(count, amount))
    }
}

impl RuleTable {
    /// Fields whose absence aborts the run.
    pub fn required_fields(&self) -> Vec<&str> {
        vec![self.id_field.as_str(), self.discriminator_field.as_str()]
    }

    /// Looks up a partition by name.
    pub fn partition(&self, name: &str) -> Option<&PartitionRule> {
        self.partitions.iter().find(|p| p.name == name)
    }

    /// Checks the table for structural problems.
    pub fn validate(&self) -> Result<()> {
        let fail = |reason: String| {
            Err(CanjeError::InvalidRules {
                table: self.name.clone(),
                reason,
            })
        };

        if self.name.trim().is_empty() {
            return fail("name is empty".to_string());
        }
        for (label, field) in [
            ("id_field", &self.id_field),
            ("discriminator_field", &self.discriminator_field),
            ("count_field", &self.count_field),
            ("amount_field", &self.amount_field),
        ] {
            if field.trim().is_empty() {
                return fail(format!("{label} is empty"));
            }
        }
        for required in self.required_fields() {
            if self.drop_fields.iter().any(|f| f == required) {
                return fail(format!("drop_fields removes required field '{required}'"));
            }
        }
        if self.partitions.is_empty() {
            return fail("no partitions declared".to_string());
        }

        let mut names = BTreeSet::new();
        for partition in &self.partitions {
            if !names.insert(partition.name.as_str()) {
                return fail(format!("duplicate partition '{}'", partition.name));
            }
            if partition.predicates.is_empty() {
                return fail(format!("partition '{}' has no predicates", partition.name));
            }
            for predicate in &partition.predicates {
                if !predicate.amount_below.is_finite() {
                    return fail(format!(
                        "partition '{}' has a non-finite threshold",
                        partition.name
                    ));
                }
            }
        }
        Ok(())
    }
}
