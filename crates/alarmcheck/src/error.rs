//! Error types for the alarmcheck library.
//!
//! Only environment-level problems are errors. Cells that violate the schema
//! are collected as [`FailureCase`](crate::validation::FailureCase) values and
//! never travel through this type.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for alarmcheck operations.
#[derive(Debug, Error)]
pub enum AlarmCheckError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A record has a different number of fields than the header.
    #[error("Malformed file: line {line} has {found} fields, expected {expected}")]
    RaggedRow {
        line: u64,
        expected: usize,
        found: usize,
    },

    /// Invalid delimiter detected or specified.
    #[error("Invalid delimiter: {0}")]
    InvalidDelimiter(String),

    /// Empty file or no header to read.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Two column specs in one schema share a name.
    #[error("Duplicate column in schema: '{0}'")]
    DuplicateColumn(String),

    /// The loaded table lacks columns the schema requires.
    #[error("Schema does not apply: missing column(s) {}", .missing.join(", "))]
    SchemaMismatch { missing: Vec<String> },

    /// The report destination could not be written.
    #[error("Failed to write report to '{path}': {source}")]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Regex compilation error.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl AlarmCheckError {
    /// True for failures that happen while loading the input file.
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            AlarmCheckError::Io { .. }
                | AlarmCheckError::Csv(_)
                | AlarmCheckError::RaggedRow { .. }
                | AlarmCheckError::InvalidDelimiter(_)
                | AlarmCheckError::EmptyData(_)
        )
    }
}

/// Result type alias for alarmcheck operations.
pub type Result<T> = std::result::Result<T, AlarmCheckError>;
