//! Rule engine evaluating partition threshold predicates.
//!
//! Records are split into the partitions declared by a [`RuleTable`] by
//! matching the discriminator field against each partition's selector. Every
//! record of a partition is checked against the partition's predicates in
//! declared order; the first match produces a [`Violation`].

use canje_model::{PartitionRule, Result, RuleTable, Violation};
use canje_transform::frame::{
    filtered, insert_before, require_fields, text_column, trimmed_or_missing,
};
use canje_transform::{fill_missing, has_column, parse_count, to_num};
use polars::prelude::DataFrame;
use tracing::{debug, warn};

/// Evaluation of one partition.
#[derive(Debug, Clone)]
pub struct PartitionResult {
    pub name: String,
    /// Output sheet for the filtered view.
    pub sheet: String,
    /// Membership mask over the evaluated frame.
    pub mask: Vec<bool>,
    /// The partition's records, all fields, input order.
    pub frame: DataFrame,
    /// Violations in record order.
    pub violations: Vec<Violation>,
}

impl PartitionResult {
    pub fn record_count(&self) -> usize {
        self.frame.height()
    }

    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }
}

/// Rule engine bound to one rule table.
#[derive(Debug, Clone)]
pub struct RuleEngine {
    table: RuleTable,
}

impl RuleEngine {
    pub fn new(table: RuleTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    /// Membership mask of a partition over the frame.
    pub fn partition_mask(&self, df: &DataFrame, partition: &PartitionRule) -> Result<Vec<bool>> {
        let discriminator = trimmed_or_missing(df, &self.table.discriminator_field)?;
        Ok(discriminator
            .iter()
            .map(|value| partition.selector.matches(value.as_deref()))
            .collect())
    }

    /// Writes each partition's default count into its blank count cells.
    ///
    /// Must run before [`RuleEngine::evaluate`] so the defaults take part in
    /// predicate matching. An absent count field is missing for every row: it
    /// is created empty immediately before the amount field (or last) and
    /// then filled like any blank column.
    ///
    /// # Returns
    ///
    /// Number of cells filled across partitions.
    pub fn fill_missing_counts(&self, df: &mut DataFrame) -> Result<usize> {
        let defaults = self
            .table
            .partitions
            .iter()
            .any(|p| p.missing_count_default.is_some());
        if defaults && !has_column(df, &self.table.count_field) {
            warn!(field = %self.table.count_field, "count field absent, partition defaults apply to every row");
            let empty = text_column(&self.table.count_field, vec![None; df.height()]);
            insert_before(df, empty, Some(&self.table.amount_field))?;
        }

        let mut filled = 0;
        for partition in &self.table.partitions {
            let Some(default) = partition.missing_count_default else {
                continue;
            };
            let mask = self.partition_mask(df, partition)?;
            let count = fill_missing(df, &self.table.count_field, &default.to_string(), &mask)?;
            if count > 0 {
                debug!(partition = %partition.name, filled = count, "count defaults applied");
            }
            filled += count;
        }
        Ok(filled)
    }

    /// Evaluates every partition in declared order.
    pub fn evaluate(&self, df: &DataFrame) -> Result<Vec<PartitionResult>> {
        require_fields(
            df,
            &[
                self.table.id_field.as_str(),
                self.table.discriminator_field.as_str(),
            ],
        )?;
        let ids = trimmed_or_missing(df, &self.table.id_field)?;
        let counts: Vec<Option<i64>> = trimmed_or_missing(df, &self.table.count_field)?
            .iter()
            .map(|value| value.as_deref().and_then(parse_count))
            .collect();
        let amounts: Vec<Option<f64>> = trimmed_or_missing(df, &self.table.amount_field)?
            .iter()
            .map(|value| value.as_deref().and_then(to_num))
            .collect();

        let mut results = Vec::with_capacity(self.table.partitions.len());
        for partition in &self.table.partitions {
            let mask = self.partition_mask(df, partition)?;
            let mut violations = Vec::new();
            for (idx, selected) in mask.iter().enumerate() {
                if !*selected {
                    continue;
                }
                let Some(predicate) = partition.first_violation(counts[idx], amounts[idx]) else {
                    continue;
                };
                let id = ids[idx].clone().unwrap_or_default();
                if id.is_empty() {
                    warn!(partition = %partition.name, row = idx, "violation on record without ID");
                }
                violations.push(Violation {
                    id,
                    partition: partition.name.clone(),
                    reason: predicate.reason.clone(),
                });
            }

            let frame = filtered(df, &mask)?;
            debug!(
                partition = %partition.name,
                records = frame.height(),
                violations = violations.len(),
                "partition evaluated"
            );
            results.push(PartitionResult {
                name: partition.name.clone(),
                sheet: partition.sheet.clone(),
                mask,
                frame,
                violations,
            });
        }
        Ok(results)
    }
}
