//! Union of partition violations into per-record outcomes.

use std::collections::BTreeMap;

use canje_model::{
    REASON_DELIMITER, REASON_FIELD, Result, RuleTable, STATUS_FIELD, Status,
};
use canje_transform::frame::{
    filtered, insert_before, project_existing, text_column, trimmed_or_missing,
};
use polars::prelude::DataFrame;
use tracing::warn;

use crate::engine::PartitionResult;

/// The record set with outcomes attached, plus the error report.
#[derive(Debug, Clone)]
pub struct MergedResult {
    /// Every record, with the status and reason fields last.
    pub table: DataFrame,
    /// ERROR records projected onto ID, discriminator, count, amount,
    /// status, reason and, when present, the evidence link.
    pub errors: DataFrame,
    pub total_ok: usize,
    pub total_error: usize,
}

/// Collects violation reasons per ID, in partition then record order.
///
/// Violations on records without an ID cannot be attributed and are skipped.
pub fn reasons_by_id(partitions: &[PartitionResult]) -> BTreeMap<String, Vec<String>> {
    let mut reasons: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for partition in partitions {
        for violation in &partition.violations {
            if violation.id.is_empty() {
                warn!(partition = %partition.name, reason = %violation.reason, "violation without ID left out of outcomes");
                continue;
            }
            reasons
                .entry(violation.id.clone())
                .or_default()
                .push(violation.reason.clone());
        }
    }
    reasons
}

/// Attaches `estado` and `motivo` to every record and builds the error report.
///
/// A record is ERROR when its ID appears in any partition's violations; the
/// reason concatenates every violation reason for that ID.
pub fn merge_outcomes(
    df: &DataFrame,
    rules: &RuleTable,
    partitions: &[PartitionResult],
) -> Result<MergedResult> {
    let reasons = reasons_by_id(partitions);
    let ids = trimmed_or_missing(df, &rules.id_field)?;

    let mut statuses = Vec::with_capacity(df.height());
    let mut motives = Vec::with_capacity(df.height());
    let mut is_error = Vec::with_capacity(df.height());
    for id in &ids {
        let found = id
            .as_deref()
            .filter(|id| !id.is_empty())
            .and_then(|id| reasons.get(id));
        match found {
            Some(list) => {
                statuses.push(Some(Status::Error.as_str().to_string()));
                motives.push(Some(list.join(REASON_DELIMITER)));
                is_error.push(true);
            }
            None => {
                statuses.push(Some(Status::Ok.as_str().to_string()));
                motives.push(Some(String::new()));
                is_error.push(false);
            }
        }
    }
    let total_error = is_error.iter().filter(|e| **e).count();

    let mut table = df.clone();
    insert_before(&mut table, text_column(STATUS_FIELD, statuses), None)?;
    insert_before(&mut table, text_column(REASON_FIELD, motives), None)?;

    let mut report_fields = vec![
        rules.id_field.as_str(),
        rules.discriminator_field.as_str(),
        rules.count_field.as_str(),
        rules.amount_field.as_str(),
        STATUS_FIELD,
        REASON_FIELD,
    ];
    if let Some(evidence) = rules.evidence_field.as_deref() {
        report_fields.push(evidence);
    }
    let errors = project_existing(&filtered(&table, &is_error)?, &report_fields)?;

    Ok(MergedResult {
        total_ok: table.height() - total_error,
        total_error,
        table,
        errors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use canje_model::Violation;
    use polars::prelude::Column;

    fn result(name: &str, violations: &[(&str, &str)]) -> PartitionResult {
        PartitionResult {
            name: name.to_string(),
            sheet: name.to_string(),
            mask: Vec::new(),
            frame: DataFrame::empty(),
            violations: violations
                .iter()
                .map(|(id, reason)| Violation {
                    id: (*id).to_string(),
                    partition: name.to_string(),
                    reason: (*reason).to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn reasons_follow_partition_order() {
        let reasons = reasons_by_id(&[
            result("A", &[("7", "a1")]),
            result("B", &[("7", "b1"), ("", "lost")]),
        ]);
        assert_eq!(reasons.get("7"), Some(&vec!["a1".to_string(), "b1".to_string()]));
        assert_eq!(reasons.len(), 1);
    }

    #[test]
    fn blank_id_record_stays_ok() {
        let df = DataFrame::new(vec![
            Column::new("ID de la encuesta".into(), vec![None, Some("2")]),
        ])
        .unwrap();
        let rules = canje_model::polo_rules();

        let merged = merge_outcomes(&df, &rules, &[result("FOCO", &[("", "x")])]).unwrap();

        assert_eq!(merged.total_error, 0);
        assert_eq!(merged.total_ok, 2);
        assert_eq!(merged.errors.height(), 0);
    }
}
