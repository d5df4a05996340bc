//! Structural edits applied to a survey record set.
//!
//! Each function corresponds to one column edit declared in a
//! [`RuleTable`](canje_model::RuleTable) and operates on the DataFrame in place.
//! All of them are idempotent: running an edit twice yields the same frame.

use std::collections::BTreeSet;

use canje_ingest::is_blank_value;
use canje_model::{
    CategoryRewrite, ConstantFieldRule, DayOfMonthRule, ExclusionRule, PhotoFlagRule, Result,
};
use polars::prelude::{Column, DataFrame};
use tracing::debug;

use crate::frame::{
    column_strings, filter_rows, has_column, insert_before, replace_column, require_fields,
    text_column,
};
use crate::normalization::day_of_month;

/// Removes records whose ID repeats an earlier one.
///
/// The first occurrence wins and survivors keep their relative order. Blank
/// IDs share one key.
///
/// # Returns
///
/// Number of records removed.
pub fn dedupe_by_id(df: &mut DataFrame, id_field: &str) -> Result<usize> {
    require_fields(df, &[id_field])?;
    let ids = column_strings(df, id_field)?;

    let mut seen = BTreeSet::new();
    let keep: Vec<bool> = ids
        .iter()
        .map(|id| seen.insert(id.as_deref().map(str::trim).unwrap_or("").to_string()))
        .collect();
    let removed = keep.iter().filter(|k| !**k).count();
    if removed > 0 {
        filter_rows(df, &keep)?;
    }
    Ok(removed)
}

/// Drops the listed fields, skipping names that are not present.
///
/// # Returns
///
/// The fields actually removed.
pub fn drop_fields(df: &mut DataFrame, fields: &[String]) -> Result<Vec<String>> {
    let mut dropped = Vec::new();
    for field in fields {
        if has_column(df, field) {
            df.drop_in_place(field)?;
            dropped.push(field.clone());
        }
    }
    Ok(dropped)
}

/// Derives the day of month from a day-first timestamp.
///
/// The derived field lands immediately before the anchor field, or last when
/// the anchor is absent. A missing timestamp field yields an all-missing
/// column.
///
/// # Returns
///
/// Number of rows with a parsed day.
pub fn insert_day_of_month(df: &mut DataFrame, rule: &DayOfMonthRule) -> Result<usize> {
    let days: Vec<Option<i32>> = if has_column(df, &rule.timestamp_field) {
        column_strings(df, &rule.timestamp_field)?
            .iter()
            .map(|value| {
                value
                    .as_deref()
                    .and_then(day_of_month)
                    .and_then(|day| i32::try_from(day).ok())
            })
            .collect()
    } else {
        debug!(field = %rule.timestamp_field, "timestamp field absent");
        vec![None; df.height()]
    };
    let parsed = days.iter().filter(|d| d.is_some()).count();

    let column = Column::new(rule.output_field.as_str().into(), days);
    insert_before(df, column, Some(&rule.anchor_field))?;
    Ok(parsed)
}

/// Inserts a constant field immediately before `before_field`.
///
/// The field is positioned only when both `anchor_field` and `before_field`
/// exist; otherwise it is appended last.
///
/// # Returns
///
/// Whether the field was positioned before its target.
pub fn insert_constant_field(df: &mut DataFrame, rule: &ConstantFieldRule) -> Result<bool> {
    let values = vec![Some(rule.value.clone()); df.height()];
    let column = text_column(&rule.field, values);
    let positioned = has_column(df, &rule.anchor_field) && has_column(df, &rule.before_field);
    let before = positioned.then_some(rule.before_field.as_str());
    insert_before(df, column, before)?;
    Ok(positioned)
}

/// Rewrites the photo flag from the presence of an evidence link.
///
/// Only applies when the flag field exists. Rows with a non-blank link get
/// `"SI"`, all others `"NO"`; without the evidence field every row gets `"NO"`.
///
/// # Returns
///
/// Number of rows flagged `"SI"`.
pub fn derive_photo_flag(df: &mut DataFrame, rule: &PhotoFlagRule) -> Result<usize> {
    if !has_column(df, &rule.flag_field) {
        return Ok(0);
    }
    let flags: Vec<Option<String>> = if has_column(df, &rule.evidence_field) {
        column_strings(df, &rule.evidence_field)?
            .iter()
            .map(|link| {
                let flag = if is_blank_value(link.as_deref()) { "NO" } else { "SI" };
                Some(flag.to_string())
            })
            .collect()
    } else {
        vec![Some("NO".to_string()); df.height()]
    };
    let flagged = flags
        .iter()
        .filter(|flag| flag.as_deref() == Some("SI"))
        .count();
    replace_column(df, text_column(&rule.flag_field, flags))?;
    Ok(flagged)
}

/// Rewrites a category for the records of one discriminator value.
///
/// Scoped rows first receive the default value; among them, rows whose prior
/// category matches the override token (ignoring case and surrounding or
/// repeated whitespace) receive the override value instead. Rows outside the
/// scope are untouched. Skipped when the category field is absent.
///
/// # Returns
///
/// Number of rows rewritten.
pub fn rewrite_category(
    df: &mut DataFrame,
    discriminator_field: &str,
    rule: &CategoryRewrite,
) -> Result<usize> {
    require_fields(df, &[discriminator_field])?;
    if !has_column(df, &rule.field) {
        return Ok(0);
    }
    let discriminator = column_strings(df, discriminator_field)?;
    let prior = column_strings(df, &rule.field)?;
    let token = fold_token(&rule.override_token);

    let mut rewritten = 0;
    let values: Vec<Option<String>> = discriminator
        .iter()
        .zip(prior)
        .map(|(selector, category)| {
            let in_scope = selector.as_deref().map(str::trim) == Some(rule.when_equals.trim());
            if !in_scope {
                return category;
            }
            rewritten += 1;
            let folded = category.as_deref().map(fold_token);
            if folded.as_deref() == Some(token.as_str()) {
                Some(rule.override_value.clone())
            } else {
                Some(rule.default_value.clone())
            }
        })
        .collect();

    replace_column(df, text_column(&rule.field, values))?;
    Ok(rewritten)
}

/// Removes rows matched by any exclusion rule whose field is present.
///
/// # Returns
///
/// Number of rows removed.
pub fn apply_exclusions(df: &mut DataFrame, rules: &[ExclusionRule]) -> Result<usize> {
    let mut keep = vec![true; df.height()];
    for rule in rules {
        if !has_column(df, &rule.field) {
            debug!(field = %rule.field, "exclusion field absent");
            continue;
        }
        for (slot, value) in keep.iter_mut().zip(column_strings(df, &rule.field)?) {
            if rule.excludes(value.as_deref()) {
                *slot = false;
            }
        }
    }
    let removed = keep.iter().filter(|k| !**k).count();
    if removed > 0 {
        filter_rows(df, &keep)?;
    }
    Ok(removed)
}

/// Writes `value` into blank cells of `field` for the rows selected by `mask`.
///
/// # Returns
///
/// Number of cells filled.
pub fn fill_missing(df: &mut DataFrame, field: &str, value: &str, mask: &[bool]) -> Result<usize> {
    if !has_column(df, field) {
        return Ok(0);
    }
    let mut filled = 0;
    let values: Vec<Option<String>> = column_strings(df, field)?
        .into_iter()
        .zip(mask)
        .map(|(cell, selected)| {
            let blank = cell.as_deref().is_none_or(|s| s.trim().is_empty());
            if *selected && blank {
                filled += 1;
                Some(value.to_string())
            } else {
                cell
            }
        })
        .collect();
    if filled > 0 {
        replace_column(df, text_column(field, values))?;
    }
    Ok(filled)
}

fn fold_token(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use canje_ingest::column_names;

    #[test]
    fn fold_token_ignores_case_and_spacing() {
        assert_eq!(fold_token("  temple   Pato "), "TEMPLE PATO");
    }

    #[test]
    fn dedupe_keeps_first_occurrence() {
        let mut df = DataFrame::new(vec![
            Column::new("id".into(), vec!["1", "2", "1", " 2", "3"]),
            Column::new("v".into(), vec!["a", "b", "c", "d", "e"]),
        ])
        .unwrap();

        let removed = dedupe_by_id(&mut df, "id").unwrap();

        assert_eq!(removed, 2);
        let v = df.column("v").unwrap().str().unwrap();
        assert_eq!(v.into_iter().collect::<Vec<_>>(), vec![Some("a"), Some("b"), Some("e")]);
    }

    #[test]
    fn drop_fields_skips_absent() {
        let mut df = DataFrame::new(vec![
            Column::new("id".into(), vec!["1"]),
            Column::new("ticket".into(), vec!["SI"]),
        ])
        .unwrap();

        let dropped = drop_fields(&mut df, &["ticket".to_string(), "nada".to_string()]).unwrap();

        assert_eq!(dropped, vec!["ticket"]);
        assert_eq!(column_names(&df), vec!["id"]);
    }

    #[test]
    fn fill_missing_respects_mask() {
        let mut df = DataFrame::new(vec![Column::new(
            "n".into(),
            vec![None, Some(""), None, Some("2")],
        )])
        .unwrap();

        let filled = fill_missing(&mut df, "n", "1", &[true, true, false, true]).unwrap();

        assert_eq!(filled, 2);
        let n = df.column("n").unwrap().str().unwrap();
        assert_eq!(
            n.into_iter().collect::<Vec<_>>(),
            vec![Some("1"), Some("1"), None, Some("2")]
        );
    }
}
