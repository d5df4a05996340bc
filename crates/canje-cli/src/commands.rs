use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use canje_core::process;
use canje_ingest::{ReadOptions, any_to_string, read_table};
use canje_model::{REASON_FIELD, RuleTable, Variant};
use canje_report::write_bundle;
use comfy_table::Table;
use tracing::{info, info_span, trace};

use crate::cli::{RulesArgs, ValidateArgs};
use crate::logging::redact_value;
use crate::types::ValidateResult;

/// One row per built-in variant.
pub fn variants_table() -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Variant", "Label", "Partitions", "Description"]);
    for variant in Variant::ALL {
        let rules = variant.rule_table();
        let partitions = rules
            .partitions
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            variant.name().to_string(),
            rules.label,
            partitions,
            variant.description().to_string(),
        ]);
    }
    table
}

pub fn run_rules(args: &RulesArgs) -> Result<String> {
    let rules = Variant::from(args.variant).rule_table();
    serde_json::to_string_pretty(&rules).context("serialize rule table")
}

/// Loads a rule table from a JSON file.
pub fn load_rules(path: &Path) -> Result<RuleTable> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("read rules {}", path.display()))?;
    let rules: RuleTable = serde_json::from_str(&text)
        .with_context(|| format!("parse rules {}", path.display()))?;
    rules
        .validate()
        .with_context(|| format!("check rules {}", path.display()))?;
    Ok(rules)
}

pub fn run_validate(args: &ValidateArgs) -> Result<ValidateResult> {
    let rules = match &args.rules {
        Some(path) => load_rules(path)?,
        None => Variant::from(args.variant).rule_table(),
    };
    let run_span = info_span!("validate", variant = %rules.name, input = %args.input.display());
    let _run_guard = run_span.enter();

    let options = ReadOptions {
        sheet: args.sheet.clone(),
        separator: args.separator,
    };
    let records = info_span!("ingest")
        .in_scope(|| read_table(&args.input, &options))
        .with_context(|| format!("read {}", args.input.display()))?;

    let output = process(records, &rules)
        .with_context(|| format!("validate {}", args.input.display()))?;
    if let Some(errors) = output.bundle.sheets.get(1) {
        trace_failures(&errors.frame, &rules);
    }

    let (output_dir, written) = if args.dry_run {
        info!("dry run, no files written");
        (None, Vec::new())
    } else {
        let dir = args
            .output_dir
            .clone()
            .unwrap_or_else(|| default_output_dir(&args.input));
        let written = info_span!("output")
            .in_scope(|| write_bundle(&output.bundle, &dir))
            .with_context(|| format!("write report to {}", dir.display()))?;
        (Some(dir), written)
    };

    Ok(ValidateResult {
        input: args.input.clone(),
        label: rules.label.clone(),
        output_dir,
        written,
        output,
        show_errors: args.show_errors,
    })
}

/// `<dir>/<stem>_validado` next to the input file.
pub fn default_output_dir(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "encuestas".to_string());
    input
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(format!("{stem}_validado"))
}

fn trace_failures(errors: &polars::prelude::DataFrame, rules: &RuleTable) {
    if !tracing::enabled!(tracing::Level::TRACE) {
        return;
    }
    let (Ok(ids), Ok(reasons)) = (errors.column(&rules.id_field), errors.column(REASON_FIELD))
    else {
        return;
    };
    for idx in 0..errors.height() {
        let id = ids.get(idx).map(any_to_string).unwrap_or_default();
        let reason = reasons.get(idx).map(any_to_string).unwrap_or_default();
        trace!(id = %redact_value(&id), reason = %reason, "record failed");
    }
}
