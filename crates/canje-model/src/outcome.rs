//! Per-record outcomes and run summary.

use serde::{Deserialize, Serialize};

/// Status field appended to the result table.
pub const STATUS_FIELD: &str = "estado";
/// Reason field appended to the result table.
pub const REASON_FIELD: &str = "motivo";
/// Delimiter between concatenated violation reasons.
pub const REASON_DELIMITER: &str = " | ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Ok,
    Error,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record that failed one of its partition's threshold predicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Trimmed record ID; empty when the record has no ID.
    pub id: String,
    pub partition: String,
    pub reason: String,
}

/// Violation count of one partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionErrorCount {
    pub partition: String,
    pub errors: usize,
}

/// Row counts of one run, suitable for display as metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub variant: String,
    pub total_rows: usize,
    pub total_ok: usize,
    pub total_error: usize,
    /// In declared partition order.
    pub partition_errors: Vec<PartitionErrorCount>,
    /// Rows removed by the exclusion filter.
    pub excluded_rows: usize,
    pub duplicates_removed: usize,
}

impl Summary {
    pub fn partition_errors(&self, partition: &str) -> Option<usize> {
        self.partition_errors
            .iter()
            .find(|count| count.partition == partition)
            .map(|count| count.errors)
    }

    pub fn has_errors(&self) -> bool {
        self.total_error > 0
    }
}
