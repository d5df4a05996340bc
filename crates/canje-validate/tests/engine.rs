//! Partition evaluation and outcome merging against the built-in rule tables.

use canje_model::presets::{
    AMOUNT_FIELD, DYNAMIC_FIELD, FOCO_VALUE, ID_FIELD, MONTO_VALUE, PHOTO_LINK_FIELD,
    POLO_COUNT_FIELD, TICKET_COUNT_FIELD, TICKET_FLAG_FIELD,
};
use canje_model::{REASON_FIELD, STATUS_FIELD, polo_rules, ticket_sorteo_rules};
use canje_validate::{RuleEngine, merge_outcomes};
use polars::prelude::*;

fn polo_frame(rows: &[(&str, &str, Option<&str>, Option<&str>)]) -> DataFrame {
    DataFrame::new(vec![
        Column::new(ID_FIELD.into(), rows.iter().map(|r| r.0).collect::<Vec<_>>()),
        Column::new(DYNAMIC_FIELD.into(), rows.iter().map(|r| r.1).collect::<Vec<_>>()),
        Column::new(POLO_COUNT_FIELD.into(), rows.iter().map(|r| r.2).collect::<Vec<_>>()),
        Column::new(AMOUNT_FIELD.into(), rows.iter().map(|r| r.3).collect::<Vec<_>>()),
    ])
    .unwrap()
}

fn strings(df: &DataFrame, name: &str) -> Vec<Option<String>> {
    df.column(name)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect()
}

#[test]
fn foco_threshold() {
    let df = polo_frame(&[
        ("1", FOCO_VALUE, Some("1"), Some("15")),
        ("2", FOCO_VALUE, Some("1"), Some("25")),
    ]);

    let results = RuleEngine::new(polo_rules()).evaluate(&df).unwrap();

    assert_eq!(results[0].name, "FOCO");
    assert_eq!(results[0].violations.len(), 1);
    assert_eq!(results[0].violations[0].id, "1");
    assert_eq!(
        results[0].violations[0].reason,
        "FOCO: entregó 1 polo con monto < 20"
    );
    assert_eq!(results[1].record_count(), 0);
}

#[test]
fn monto_threshold_with_zero_polos() {
    let df = polo_frame(&[
        ("1", MONTO_VALUE, Some("0"), Some("150")),
        ("2", MONTO_VALUE, Some("0"), Some("250")),
        ("3", MONTO_VALUE, None, Some("10")),
    ]);

    let results = RuleEngine::new(polo_rules()).evaluate(&df).unwrap();
    let monto = &results[1];

    assert_eq!(monto.record_count(), 3);
    assert_eq!(monto.violations.len(), 1);
    assert_eq!(monto.violations[0].reason, "MONTO: polos=0 con monto < 200");
}

#[test]
fn locale_amounts_are_normalized() {
    let df = polo_frame(&[
        ("1", MONTO_VALUE, Some("2"), Some("S/ 1.234,56")),
        ("2", MONTO_VALUE, Some("2"), Some("299,90")),
    ]);

    let results = RuleEngine::new(polo_rules()).evaluate(&df).unwrap();
    let ids: Vec<_> = results[1].violations.iter().map(|v| v.id.as_str()).collect();

    assert_eq!(ids, vec!["2"]);
}

#[test]
fn partitions_are_disjoint() {
    let df = polo_frame(&[
        ("1", FOCO_VALUE, Some("1"), Some("5")),
        ("2", MONTO_VALUE, Some("1"), Some("5")),
        ("3", "Otra", Some("1"), Some("5")),
    ]);

    let results = RuleEngine::new(polo_rules()).evaluate(&df).unwrap();

    for idx in 0..df.height() {
        let members = results.iter().filter(|r| r.mask[idx]).count();
        assert!(members <= 1);
    }
    assert_eq!(results.iter().map(|r| r.record_count()).sum::<usize>(), 2);
}

#[test]
fn ticket_count_defaults_before_evaluation() {
    let mut df = DataFrame::new(vec![
        Column::new(ID_FIELD.into(), vec!["10", "11"]),
        Column::new(TICKET_FLAG_FIELD.into(), vec!["SI", "NO"]),
        Column::new(TICKET_COUNT_FIELD.into(), vec![None::<&str>, None]),
        Column::new(AMOUNT_FIELD.into(), vec!["150", "150"]),
    ])
    .unwrap();
    let engine = RuleEngine::new(ticket_sorteo_rules());

    let filled = engine.fill_missing_counts(&mut df).unwrap();
    let results = engine.evaluate(&df).unwrap();

    assert_eq!(filled, 1);
    assert_eq!(
        strings(&df, TICKET_COUNT_FIELD),
        vec![Some("1".to_string()), None]
    );
    assert_eq!(results[0].violations.len(), 1);
    assert_eq!(
        results[0].violations[0].reason,
        "TICKET: cantidad=1 con monto < 200"
    );
}

#[test]
fn merge_marks_every_record() {
    let mut df = polo_frame(&[
        ("1", FOCO_VALUE, Some("1"), Some("15")),
        ("2", MONTO_VALUE, Some("1"), Some("500")),
        ("3", MONTO_VALUE, Some("2"), Some("100")),
    ]);
    df.with_column(Column::new(
        PHOTO_LINK_FIELD.into(),
        vec![Some("https://fotos/1.jpg"), None, Some("https://fotos/3.jpg")],
    ))
    .unwrap();
    let rules = polo_rules();
    let results = RuleEngine::new(rules.clone()).evaluate(&df).unwrap();

    let merged = merge_outcomes(&df, &rules, &results).unwrap();

    assert_eq!(merged.total_ok + merged.total_error, df.height());
    assert_eq!(merged.total_error, 2);
    assert_eq!(
        strings(&merged.table, STATUS_FIELD),
        vec![
            Some("ERROR".to_string()),
            Some("OK".to_string()),
            Some("ERROR".to_string())
        ]
    );
    assert_eq!(
        strings(&merged.table, REASON_FIELD)[1],
        Some(String::new())
    );
    let names = merged.table.get_column_names_str();
    assert_eq!(names[names.len() - 2..], [STATUS_FIELD, REASON_FIELD]);
    assert_eq!(merged.errors.height(), 2);
    assert_eq!(
        merged.errors.get_column_names_str(),
        vec![
            ID_FIELD,
            DYNAMIC_FIELD,
            POLO_COUNT_FIELD,
            AMOUNT_FIELD,
            STATUS_FIELD,
            REASON_FIELD,
            PHOTO_LINK_FIELD
        ]
    );
    assert_eq!(
        strings(&merged.errors, PHOTO_LINK_FIELD),
        vec![
            Some("https://fotos/1.jpg".to_string()),
            Some("https://fotos/3.jpg".to_string())
        ]
    );
}

#[test]
fn ticket_count_column_absent_defaults_for_partition() {
    let mut df = DataFrame::new(vec![
        Column::new(ID_FIELD.into(), vec!["20", "21"]),
        Column::new(TICKET_FLAG_FIELD.into(), vec!["SI", "NO"]),
        Column::new(AMOUNT_FIELD.into(), vec!["150", "150"]),
    ])
    .unwrap();
    let engine = RuleEngine::new(ticket_sorteo_rules());

    let filled = engine.fill_missing_counts(&mut df).unwrap();
    let results = engine.evaluate(&df).unwrap();

    assert_eq!(filled, 1);
    assert_eq!(
        df.get_column_names_str(),
        vec![ID_FIELD, TICKET_FLAG_FIELD, TICKET_COUNT_FIELD, AMOUNT_FIELD]
    );
    assert_eq!(
        strings(&df, TICKET_COUNT_FIELD),
        vec![Some("1".to_string()), None]
    );
    assert_eq!(results[0].violations.len(), 1);
    assert_eq!(
        results[0].violations[0].reason,
        "TICKET: cantidad=1 con monto < 200"
    );
}

#[test]
fn missing_discriminator_is_reported() {
    let df = DataFrame::new(vec![Column::new(ID_FIELD.into(), vec!["1"])]).unwrap();

    let err = RuleEngine::new(polo_rules()).evaluate(&df).unwrap_err();

    assert!(err.to_string().contains(DYNAMIC_FIELD));
}
