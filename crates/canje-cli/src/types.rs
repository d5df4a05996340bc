use std::path::PathBuf;

use canje_core::ProcessOutput;

/// Outcome of one `canje validate` run.
#[derive(Debug)]
pub struct ValidateResult {
    pub input: PathBuf,
    /// Human name of the rule table used.
    pub label: String,
    /// Directory written to; None on a dry run.
    pub output_dir: Option<PathBuf>,
    pub written: Vec<PathBuf>,
    pub output: ProcessOutput,
    pub show_errors: usize,
}

impl ValidateResult {
    pub fn errors_sheet(&self) -> Option<&polars::prelude::DataFrame> {
        self.output.bundle.sheets.get(1).map(|sheet| &sheet.frame)
    }
}
