//! Column transformation stage with ordered step execution.
//!
//! Each step implements [`TransformStep`] and reads its parameters from the
//! [`RuleTable`]. The default order is:
//!
//! 1. **dedupe** - drop repeated IDs, first occurrence wins
//! 2. **drop_fields** - remove the table's drop list
//! 3. **day_of_month** - derive the day field before its anchor
//! 4. **constant_fields** - insert fixed-value fields
//! 5. **photo_flag** - rewrite the photo flag from the evidence link
//! 6. **category_rewrites** - conditional category rewrites
//! 7. **exclusions** - remove excluded rows
//! 8. **count_defaults** - fill blank counts per partition default

use canje_model::{Result, RuleTable};
use canje_transform::{
    apply_exclusions, dedupe_by_id, derive_photo_flag, drop_fields, insert_constant_field,
    insert_day_of_month, rewrite_category,
};
use canje_validate::RuleEngine;
use polars::prelude::DataFrame;
use tracing::debug;

/// A single transformation applied to the record set in place.
pub trait TransformStep: Send + Sync {
    fn execute(&self, rules: &RuleTable, df: &mut DataFrame, state: &mut StepState)
    -> Result<()>;

    /// Name used in logs and in [`StepState::executed_steps`].
    fn step_name(&self) -> &str;

    /// Whether the rule table leaves nothing for this step to do.
    fn should_skip(&self, _rules: &RuleTable) -> bool {
        false
    }
}

/// Counters shared across steps.
#[derive(Debug, Default)]
pub struct StepState {
    pub duplicates_removed: usize,
    pub dropped_fields: Vec<String>,
    pub excluded_rows: usize,
    pub counts_filled: usize,
    pub executed_steps: Vec<String>,
}

/// An ordered list of transform steps.
pub struct TransformPipeline {
    steps: Vec<Box<dyn TransformStep>>,
}

impl Default for TransformPipeline {
    fn default() -> Self {
        Self::new()
            .add_step(Box::new(DedupeStep))
            .add_step(Box::new(DropFieldsStep))
            .add_step(Box::new(DayOfMonthStep))
            .add_step(Box::new(ConstantFieldsStep))
            .add_step(Box::new(PhotoFlagStep))
            .add_step(Box::new(CategoryRewriteStep))
            .add_step(Box::new(ExclusionStep))
            .add_step(Box::new(CountDefaultStep))
    }
}

impl TransformPipeline {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    pub fn add_step(mut self, step: Box<dyn TransformStep>) -> Self {
        self.steps.push(step);
        self
    }

    /// Execute all steps in order.
    pub fn execute(&self, rules: &RuleTable, df: &mut DataFrame) -> Result<StepState> {
        let mut state = StepState::default();
        for step in &self.steps {
            if step.should_skip(rules) {
                continue;
            }
            step.execute(rules, df, &mut state)?;
            debug!(step = step.step_name(), rows = df.height(), columns = df.width(), "step complete");
            state.executed_steps.push(step.step_name().to_string());
        }
        Ok(state)
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.step_name()).collect()
    }
}

pub struct DedupeStep;

impl TransformStep for DedupeStep {
    fn execute(&self, rules: &RuleTable, df: &mut DataFrame, state: &mut StepState) -> Result<()> {
        state.duplicates_removed = dedupe_by_id(df, &rules.id_field)?;
        Ok(())
    }

    fn step_name(&self) -> &str {
        "dedupe"
    }
}

pub struct DropFieldsStep;

impl TransformStep for DropFieldsStep {
    fn execute(&self, rules: &RuleTable, df: &mut DataFrame, state: &mut StepState) -> Result<()> {
        state.dropped_fields = drop_fields(df, &rules.drop_fields)?;
        Ok(())
    }

    fn step_name(&self) -> &str {
        "drop_fields"
    }

    fn should_skip(&self, rules: &RuleTable) -> bool {
        rules.drop_fields.is_empty()
    }
}

pub struct DayOfMonthStep;

impl TransformStep for DayOfMonthStep {
    fn execute(&self, rules: &RuleTable, df: &mut DataFrame, _state: &mut StepState) -> Result<()> {
        if let Some(rule) = &rules.day_of_month {
            let parsed = insert_day_of_month(df, rule)?;
            debug!(field = %rule.output_field, parsed, "day of month derived");
        }
        Ok(())
    }

    fn step_name(&self) -> &str {
        "day_of_month"
    }

    fn should_skip(&self, rules: &RuleTable) -> bool {
        rules.day_of_month.is_none()
    }
}

pub struct ConstantFieldsStep;

impl TransformStep for ConstantFieldsStep {
    fn execute(&self, rules: &RuleTable, df: &mut DataFrame, _state: &mut StepState) -> Result<()> {
        for rule in &rules.constant_fields {
            let positioned = insert_constant_field(df, rule)?;
            debug!(field = %rule.field, positioned, "constant field inserted");
        }
        Ok(())
    }

    fn step_name(&self) -> &str {
        "constant_fields"
    }

    fn should_skip(&self, rules: &RuleTable) -> bool {
        rules.constant_fields.is_empty()
    }
}

pub struct PhotoFlagStep;

impl TransformStep for PhotoFlagStep {
    fn execute(&self, rules: &RuleTable, df: &mut DataFrame, _state: &mut StepState) -> Result<()> {
        if let Some(rule) = &rules.photo_flag {
            let flagged = derive_photo_flag(df, rule)?;
            debug!(field = %rule.flag_field, flagged, "photo flag derived");
        }
        Ok(())
    }

    fn step_name(&self) -> &str {
        "photo_flag"
    }

    fn should_skip(&self, rules: &RuleTable) -> bool {
        rules.photo_flag.is_none()
    }
}

pub struct CategoryRewriteStep;

impl TransformStep for CategoryRewriteStep {
    fn execute(&self, rules: &RuleTable, df: &mut DataFrame, _state: &mut StepState) -> Result<()> {
        for rule in &rules.category_rewrites {
            let rewritten = rewrite_category(df, &rules.discriminator_field, rule)?;
            debug!(field = %rule.field, rewritten, "category rewritten");
        }
        Ok(())
    }

    fn step_name(&self) -> &str {
        "category_rewrites"
    }

    fn should_skip(&self, rules: &RuleTable) -> bool {
        rules.category_rewrites.is_empty()
    }
}

pub struct ExclusionStep;

impl TransformStep for ExclusionStep {
    fn execute(&self, rules: &RuleTable, df: &mut DataFrame, state: &mut StepState) -> Result<()> {
        state.excluded_rows = apply_exclusions(df, &rules.exclusions)?;
        Ok(())
    }

    fn step_name(&self) -> &str {
        "exclusions"
    }

    fn should_skip(&self, rules: &RuleTable) -> bool {
        rules.exclusions.is_empty()
    }
}

pub struct CountDefaultStep;

impl TransformStep for CountDefaultStep {
    fn execute(&self, rules: &RuleTable, df: &mut DataFrame, state: &mut StepState) -> Result<()> {
        state.counts_filled = RuleEngine::new(rules.clone()).fill_missing_counts(df)?;
        Ok(())
    }

    fn step_name(&self) -> &str {
        "count_defaults"
    }

    fn should_skip(&self, rules: &RuleTable) -> bool {
        rules
            .partitions
            .iter()
            .all(|p| p.missing_count_default.is_none())
    }
}
