//! Named output tables plus the run summary, and their export to disk.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use canje_model::{CanjeError, Result, Summary};
use chrono::Utc;
use polars::prelude::{CsvWriter, DataFrame, SerWriter};
use serde::Serialize;

use crate::sheet::SheetNamer;

pub const SUMMARY_FILE: &str = "summary.json";
const REPORT_SCHEMA: &str = "canje.validation-report";
const REPORT_SCHEMA_VERSION: u32 = 1;

/// One output table.
#[derive(Debug, Clone)]
pub struct NamedTable {
    pub name: String,
    pub frame: DataFrame,
}

/// The exportable unit of one run.
#[derive(Debug, Clone)]
pub struct ReportBundle {
    /// Tables in export order.
    pub sheets: Vec<NamedTable>,
    pub summary: Summary,
}

impl ReportBundle {
    /// Assembles the bundle in a fixed order: result, errors, then the
    /// partition views in the order given.
    pub fn assemble(
        result: NamedTable,
        errors: NamedTable,
        partitions: Vec<NamedTable>,
        summary: Summary,
    ) -> Self {
        let mut namer = SheetNamer::new();
        let sheets = std::iter::once(result)
            .chain(std::iter::once(errors))
            .chain(partitions)
            .map(|table| NamedTable {
                name: namer.claim(&table.name),
                frame: table.frame,
            })
            .collect();
        Self { sheets, summary }
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|sheet| sheet.name.as_str()).collect()
    }

    pub fn sheet(&self, name: &str) -> Option<&DataFrame> {
        self.sheets
            .iter()
            .find(|sheet| sheet.name == name)
            .map(|sheet| &sheet.frame)
    }
}

#[derive(Serialize)]
struct SummaryPayload<'a> {
    schema: &'static str,
    schema_version: u32,
    generated_at: String,
    sheets: Vec<SheetEntry<'a>>,
    summary: &'a Summary,
}

#[derive(Serialize)]
struct SheetEntry<'a> {
    name: &'a str,
    file: String,
    rows: usize,
}

fn sheet_file_name(index: usize, name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    format!("{:02}_{stem}.csv", index + 1)
}

fn output_error(path: &Path, message: impl ToString) -> CanjeError {
    CanjeError::Output {
        path: path.to_path_buf(),
        message: message.to_string(),
    }
}

/// Writes one CSV per sheet and `summary.json` into `output_dir`.
///
/// CSV files are UTF-8 with a byte order mark so spreadsheet tools detect
/// the encoding of the accented field names.
///
/// # Returns
///
/// The written paths, sheets first in bundle order, summary last.
pub fn write_bundle(bundle: &ReportBundle, output_dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)?;
    let mut written = Vec::with_capacity(bundle.sheets.len() + 1);
    let mut entries = Vec::with_capacity(bundle.sheets.len());

    for (index, sheet) in bundle.sheets.iter().enumerate() {
        let file_name = sheet_file_name(index, &sheet.name);
        let path = output_dir.join(&file_name);
        let mut file = File::create(&path)?;
        let mut frame = sheet.frame.clone();
        CsvWriter::new(&mut file)
            .include_header(true)
            .include_bom(true)
            .finish(&mut frame)
            .map_err(|e| output_error(&path, e))?;
        tracing::debug!(sheet = %sheet.name, rows = frame.height(), path = %path.display(), "sheet written");
        entries.push(SheetEntry {
            name: &sheet.name,
            file: file_name,
            rows: frame.height(),
        });
        written.push(path);
    }

    let summary_path = output_dir.join(SUMMARY_FILE);
    let payload = SummaryPayload {
        schema: REPORT_SCHEMA,
        schema_version: REPORT_SCHEMA_VERSION,
        generated_at: Utc::now().to_rfc3339(),
        sheets: entries,
        summary: &bundle.summary,
    };
    let json =
        serde_json::to_string_pretty(&payload).map_err(|e| output_error(&summary_path, e))?;
    let mut file = File::create(&summary_path)?;
    writeln!(file, "{json}")?;
    written.push(summary_path);

    tracing::info!(
        output_dir = %output_dir.display(),
        files = written.len(),
        "report bundle written"
    );
    Ok(written)
}
