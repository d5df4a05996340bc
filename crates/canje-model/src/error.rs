//! Error taxonomy for the validation pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a validation run.
///
/// Rule violations are never reported through this type; they are data
/// carried by the result table.
#[derive(Debug, Error)]
pub enum CanjeError {
    /// A structurally required field is absent from the input schema.
    #[error("required field '{field}' not found in input")]
    MissingField { field: String },

    /// The rule table itself is inconsistent.
    #[error("invalid rule table '{table}': {reason}")]
    InvalidRules { table: String, reason: String },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },

    /// Failed to write an output artifact.
    #[error("failed to write {path}: {message}")]
    Output { path: PathBuf, message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Message(String),
}

impl CanjeError {
    /// Shorthand for a missing required field.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }
}

impl From<polars::prelude::PolarsError> for CanjeError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CanjeError>;
