//! Loading one survey export into a DataFrame.
//!
//! Every column is loaded as text; numeric interpretation happens later in
//! the pipeline so IDs and locale-formatted amounts are never coerced here.

use std::collections::BTreeSet;
use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use polars::prelude::{Column, CsvEncoding, CsvReadOptions, DataFrame, SerReader};

use crate::error::{IngestError, Result};
use crate::polars_utils::format_numeric;

/// Supported input table formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Workbook,
}

impl InputFormat {
    /// Detects the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "csv" | "txt" => Ok(Self::Csv),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(Self::Workbook),
            _ => Err(IngestError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension,
            }),
        }
    }
}

/// Options for reading an input table.
#[derive(Debug, Clone)]
pub struct ReadOptions {
    /// Worksheet to read; the first sheet when None.
    pub sheet: Option<String>,
    /// CSV field separator.
    pub separator: u8,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            sheet: None,
            separator: b',',
        }
    }
}

/// Reads a CSV or spreadsheet export into a DataFrame of text columns.
pub fn read_table(path: &Path, options: &ReadOptions) -> Result<DataFrame> {
    if !path.exists() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let df = match InputFormat::from_path(path)? {
        InputFormat::Csv => read_csv(path, options.separator)?,
        InputFormat::Workbook => read_workbook(path, options.sheet.as_deref())?,
    };
    tracing::info!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "input loaded"
    );
    Ok(df)
}

/// Reads a CSV file with every column as text.
pub fn read_csv(path: &Path, separator: u8) -> Result<DataFrame> {
    let csv_error = |e: polars::prelude::PolarsError| IngestError::CsvParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .map_parse_options(|parse| {
            parse
                .with_separator(separator)
                .with_encoding(CsvEncoding::LossyUtf8)
        })
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(csv_error)?
        .finish()
        .map_err(csv_error)?;

    if df.width() == 0 {
        return Err(IngestError::EmptyInput {
            path: path.to_path_buf(),
        });
    }
    Ok(df)
}

/// Reads one worksheet; the first row holds the field names.
pub fn read_workbook(path: &Path, sheet: Option<&str>) -> Result<DataFrame> {
    let workbook_error = |message: String| IngestError::Workbook {
        path: path.to_path_buf(),
        message,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| workbook_error(e.to_string()))?;
    let sheet_names = workbook.sheet_names().to_vec();
    let sheet_name = match sheet {
        Some(name) => {
            if !sheet_names.iter().any(|s| s == name) {
                return Err(IngestError::SheetNotFound {
                    path: path.to_path_buf(),
                    sheet: name.to_string(),
                });
            }
            name.to_string()
        }
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| IngestError::EmptyInput {
                path: path.to_path_buf(),
            })?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| workbook_error(e.to_string()))?;
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Err(IngestError::EmptyInput {
            path: path.to_path_buf(),
        });
    };

    let mut names = Vec::with_capacity(header.len());
    let mut seen = BTreeSet::new();
    for (idx, cell) in header.iter().enumerate() {
        let name = cell_to_string(cell)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| format!("Unnamed: {idx}"));
        if !seen.insert(name.clone()) {
            return Err(IngestError::DuplicateColumn {
                path: path.to_path_buf(),
                column: name,
            });
        }
        names.push(name);
    }

    let mut values: Vec<Vec<Option<String>>> = vec![Vec::new(); names.len()];
    for row in rows {
        for (idx, column) in values.iter_mut().enumerate() {
            column.push(row.get(idx).and_then(cell_to_string));
        }
    }

    let columns: Vec<Column> = names
        .iter()
        .zip(values)
        .map(|(name, column)| Column::new(name.as_str().into(), column))
        .collect();
    tracing::debug!(sheet = %sheet_name, "worksheet read");
    Ok(DataFrame::new(columns)?)
}

/// Text view of a spreadsheet cell; empty and error cells are missing.
fn cell_to_string(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
        Data::Float(v) => Some(format_numeric(*v)),
        Data::Int(v) => Some(v.to_string()),
        Data::Bool(v) => Some(v.to_string()),
        Data::DateTime(dt) => Some(
            dt.as_datetime()
                .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| format_numeric(dt.as_f64())),
        ),
    }
}
