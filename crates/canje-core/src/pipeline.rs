//! The validation pipeline: one record set and one rule table in, the report
//! bundle out.

use canje_model::{PartitionErrorCount, Result, RuleTable, Summary};
use canje_report::{NamedTable, ReportBundle};
use canje_transform::require_fields;
use canje_validate::{MergedResult, PartitionResult, RuleEngine, merge_outcomes};
use polars::prelude::DataFrame;
use tracing::{info, info_span};

use crate::steps::{StepState, TransformPipeline};

/// Everything one run produces.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub bundle: ReportBundle,
    /// Transform steps that ran, in order.
    pub executed_steps: Vec<String>,
}

impl ProcessOutput {
    pub fn summary(&self) -> &Summary {
        &self.bundle.summary
    }
}

/// Runs the default pipeline.
///
/// Fails only when the rule table is invalid or a required field is absent;
/// rule violations are reported through the result table.
pub fn process(records: DataFrame, rules: &RuleTable) -> Result<ProcessOutput> {
    process_with(records, rules, &TransformPipeline::default())
}

/// Runs the pipeline with a custom transform stage.
pub fn process_with(
    mut records: DataFrame,
    rules: &RuleTable,
    transforms: &TransformPipeline,
) -> Result<ProcessOutput> {
    let run_span = info_span!("process", variant = %rules.name);
    let _run_guard = run_span.enter();

    rules.validate()?;
    require_fields(&records, &rules.required_fields())?;
    let input_rows = records.height();

    let state = info_span!("transform").in_scope(|| transforms.execute(rules, &mut records))?;
    info!(
        input_rows,
        rows = records.height(),
        duplicates_removed = state.duplicates_removed,
        excluded_rows = state.excluded_rows,
        "transform complete"
    );

    let engine = RuleEngine::new(rules.clone());
    let partitions = info_span!("evaluate").in_scope(|| engine.evaluate(&records))?;

    let merged = info_span!("merge").in_scope(|| merge_outcomes(&records, rules, &partitions))?;
    info!(
        total = merged.table.height(),
        ok = merged.total_ok,
        error = merged.total_error,
        "outcomes merged"
    );

    let bundle = info_span!("assemble").in_scope(|| assemble(rules, merged, partitions, &state));
    Ok(ProcessOutput {
        bundle,
        executed_steps: state.executed_steps,
    })
}

fn assemble(
    rules: &RuleTable,
    merged: MergedResult,
    partitions: Vec<PartitionResult>,
    state: &StepState,
) -> ReportBundle {
    let summary = Summary {
        variant: rules.name.clone(),
        total_rows: merged.table.height(),
        total_ok: merged.total_ok,
        total_error: merged.total_error,
        partition_errors: partitions
            .iter()
            .map(|partition| PartitionErrorCount {
                partition: partition.name.clone(),
                errors: partition.violation_count(),
            })
            .collect(),
        excluded_rows: state.excluded_rows,
        duplicates_removed: state.duplicates_removed,
    };
    let views = partitions
        .into_iter()
        .map(|partition| NamedTable {
            name: partition.sheet,
            frame: partition.frame,
        })
        .collect();
    ReportBundle::assemble(
        NamedTable {
            name: rules.result_sheet.clone(),
            frame: merged.table,
        },
        NamedTable {
            name: rules.errors_sheet.clone(),
            frame: merged.errors,
        },
        views,
        summary,
    )
}
