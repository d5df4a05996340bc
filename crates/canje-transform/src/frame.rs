//! DataFrame access helpers shared by the column operations.

use canje_ingest::{any_to_opt_string, column_names};
use canje_model::{CanjeError, Result};
use polars::prelude::{BooleanChunked, Column, DataFrame, NewChunkedArray};

/// Reads a column as optional text, one entry per row.
pub fn column_strings(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let column = df.column(name)?;
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        values.push(any_to_opt_string(column.get(idx)?));
    }
    Ok(values)
}

/// Reads a column as trimmed text, or None for every row when the column is absent.
pub fn trimmed_or_missing(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    if !has_column(df, name) {
        return Ok(vec![None; df.height()]);
    }
    Ok(column_strings(df, name)?
        .into_iter()
        .map(|value| value.map(|s| s.trim().to_string()))
        .collect())
}

pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_index(name).is_some()
}

/// Fails with a configuration error naming the first absent field.
pub fn require_fields(df: &DataFrame, fields: &[&str]) -> Result<()> {
    for field in fields {
        if !has_column(df, field) {
            return Err(CanjeError::missing_field(*field));
        }
    }
    Ok(())
}

/// Builds a text column.
pub fn text_column(name: &str, values: Vec<Option<String>>) -> Column {
    Column::new(name.into(), values)
}

/// Replaces a column in place (same position) or appends it.
pub fn replace_column(df: &mut DataFrame, column: Column) -> Result<()> {
    df.with_column(column)?;
    Ok(())
}

/// Inserts a column immediately before `before`, or last when `before` is
/// None or absent. An existing column of the same name is removed first.
pub fn insert_before(df: &mut DataFrame, column: Column, before: Option<&str>) -> Result<()> {
    let name = column.name().to_string();
    if has_column(df, &name) {
        df.drop_in_place(&name)?;
    }
    let index = before
        .and_then(|field| df.get_column_index(field))
        .unwrap_or(df.width());
    df.insert_column(index, column)?;
    Ok(())
}

/// Keeps the rows whose mask entry is true, preserving order.
pub fn filter_rows(df: &mut DataFrame, keep: &[bool]) -> Result<()> {
    let mask = BooleanChunked::from_slice("keep".into(), keep);
    *df = df.filter(&mask)?;
    Ok(())
}

/// Returns a filtered copy of the frame.
pub fn filtered(df: &DataFrame, keep: &[bool]) -> Result<DataFrame> {
    let mask = BooleanChunked::from_slice("keep".into(), keep);
    Ok(df.filter(&mask)?)
}

/// Projects the frame onto the listed fields that exist, in list order.
pub fn project_existing(df: &DataFrame, fields: &[&str]) -> Result<DataFrame> {
    let present: Vec<String> = fields
        .iter()
        .filter(|field| has_column(df, field))
        .map(|field| (*field).to_string())
        .collect();
    Ok(df.select(present)?)
}

/// Field names in order, for logging.
pub fn field_list(df: &DataFrame) -> String {
    column_names(df).join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> DataFrame {
        DataFrame::new(vec![
            Column::new("id".into(), vec!["1", "2"]),
            Column::new("empleado".into(), vec!["Ana", "Luis"]),
            Column::new("monto".into(), vec!["10", "20"]),
        ])
        .unwrap()
    }

    #[test]
    fn insert_before_anchor() {
        let mut df = frame();
        insert_before(&mut df, text_column("aux", vec![None, None]), Some("empleado")).unwrap();
        assert_eq!(column_names(&df), vec!["id", "aux", "empleado", "monto"]);
    }

    #[test]
    fn insert_before_missing_anchor_appends() {
        let mut df = frame();
        insert_before(&mut df, text_column("aux", vec![None, None]), Some("nada")).unwrap();
        assert_eq!(column_names(&df), vec!["id", "empleado", "monto", "aux"]);
    }

    #[test]
    fn reinsert_moves_existing_column() {
        let mut df = frame();
        let monto = text_column("monto", vec![Some("1".into()), Some("2".into())]);
        insert_before(&mut df, monto, Some("id")).unwrap();
        assert_eq!(column_names(&df), vec!["monto", "id", "empleado"]);
    }

    #[test]
    fn require_fields_names_missing() {
        let df = frame();
        let err = require_fields(&df, &["id", "tipo"]).unwrap_err();
        assert!(matches!(err, CanjeError::MissingField { field } if field == "tipo"));
    }

    #[test]
    fn project_skips_absent_fields() {
        let df = frame();
        let projected = project_existing(&df, &["monto", "link", "id"]).unwrap();
        assert_eq!(column_names(&projected), vec!["monto", "id"]);
    }
}
