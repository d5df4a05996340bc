//! `canje validate` against survey exports on disk.

use std::fs;
use std::path::Path;

use canje_cli::cli::{RulesArgs, ValidateArgs, VariantArg};
use canje_cli::commands::{load_rules, run_rules, run_validate};
use canje_model::presets::{
    AMOUNT_FIELD, DYNAMIC_FIELD, EMPLOYEE_FIELD, FOCO_VALUE, ID_FIELD, MONTO_VALUE,
    POLO_COUNT_FIELD, TIMESTAMP_FIELD,
};
use canje_model::Variant;
use insta::assert_snapshot;

fn write_export(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("encuestas.csv");
    let mut text = format!(
        "{ID_FIELD};{TIMESTAMP_FIELD};{EMPLOYEE_FIELD};{DYNAMIC_FIELD};{POLO_COUNT_FIELD};{AMOUNT_FIELD}\n"
    );
    text.push_str(&format!("101;15/01/2026 09:00:00;Ana;{FOCO_VALUE};1;15,50\n"));
    text.push_str(&format!("102;15/01/2026 09:10:00;Ana;{FOCO_VALUE};1;25\n"));
    text.push_str(&format!("103;16/01/2026 11:00:00;Luis;{MONTO_VALUE};0;150\n"));
    text.push_str(&format!("103;16/01/2026 11:00:00;Luis;{MONTO_VALUE};0;150\n"));
    fs::write(&path, text).unwrap();
    path
}

fn args(input: std::path::PathBuf, output_dir: Option<std::path::PathBuf>) -> ValidateArgs {
    ValidateArgs {
        input,
        variant: VariantArg::Polo,
        rules: None,
        sheet: None,
        separator: b';',
        output_dir,
        dry_run: false,
        show_errors: 5,
    }
}

#[test]
fn validate_writes_bundle() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_export(dir.path());
    let out = dir.path().join("salida");

    let result = run_validate(&args(input, Some(out.clone()))).unwrap();
    let summary = result.output.summary();

    assert_eq!(summary.total_rows, 3);
    assert_eq!(summary.total_error, 2);
    assert_eq!(summary.duplicates_removed, 1);
    assert_eq!(result.output_dir.as_deref(), Some(out.as_path()));
    let files: Vec<String> = result
        .written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_snapshot!(
        files.join("\n"),
        @r"
    01_RESULTADO.csv
    02_ERRORES.csv
    03_FOCO_FILTRADO.csv
    04_MONTO_FILTRADO.csv
    summary.json
    "
    );
    assert!(out.join("02_ERRORES.csv").exists());
}

#[test]
fn dry_run_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_export(dir.path());
    let mut args = args(input, None);
    args.dry_run = true;

    let result = run_validate(&args).unwrap();

    assert!(result.output_dir.is_none());
    assert!(result.written.is_empty());
    assert!(!dir.path().join("encuestas_validado").exists());
    assert_eq!(result.errors_sheet().map(|df| df.height()), Some(2));
}

#[test]
fn missing_field_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("incompleto.csv");
    fs::write(&input, format!("{ID_FIELD};Otro\n1;x\n")).unwrap();

    let err = run_validate(&args(input, None)).unwrap_err();

    let message = format!("{err:#}");
    assert!(message.contains(&format!("required field '{DYNAMIC_FIELD}' not found in input")));
}

#[test]
fn dumped_rules_load_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ticket.json");
    let json = run_rules(&RulesArgs {
        variant: VariantArg::TicketSorteo,
    })
    .unwrap();
    fs::write(&path, json).unwrap();

    let rules = load_rules(&path).unwrap();

    assert_eq!(rules, Variant::TicketSorteo.rule_table());
}
