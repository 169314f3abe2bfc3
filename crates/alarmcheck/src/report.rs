//! Rendering of validation results.

use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{AlarmCheckError, Result};
use crate::input::SourceMetadata;
use crate::validation::ReconciledFailure;

/// Line printed when a run finds no failures.
pub const SUCCESS_MESSAGE: &str = "CSV data is valid.";

/// Layout of a rendered report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportFormat {
    /// Failures grouped under one heading per column.
    #[default]
    Grouped,
    /// One block per failing cell.
    PerFailure,
    /// Machine-readable JSON document.
    Json,
}

/// JSON shape of a report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDocument {
    pub valid: bool,
    pub failure_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceMetadata>,
    pub failures: Vec<ReconciledFailure>,
}

/// Validation results ready to render.
#[derive(Debug, Clone)]
pub struct Report {
    failures: Vec<ReconciledFailure>,
    source: Option<SourceMetadata>,
}

impl Report {
    pub fn new(failures: Vec<ReconciledFailure>) -> Self {
        Self {
            failures,
            source: None,
        }
    }

    /// Attach source metadata (shown in JSON output).
    pub fn with_source(mut self, source: SourceMetadata) -> Self {
        self.source = Some(source);
        self
    }

    pub fn failures(&self) -> &[ReconciledFailure] {
        &self.failures
    }

    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }

    /// Failures grouped by column, columns in first-seen order.
    pub fn by_column(&self) -> IndexMap<&str, Vec<&ReconciledFailure>> {
        let mut groups: IndexMap<&str, Vec<&ReconciledFailure>> = IndexMap::new();
        for failure in &self.failures {
            groups.entry(failure.column.as_str()).or_default().push(failure);
        }
        groups
    }

    /// Render the report as text.
    pub fn render(&self, format: ReportFormat) -> Result<String> {
        let text = match format {
            ReportFormat::Json => serde_json::to_string_pretty(&self.document())?,
            _ if self.is_valid() => format!("{}\n", SUCCESS_MESSAGE),
            ReportFormat::Grouped => self.render_grouped(),
            ReportFormat::PerFailure => self.render_blocks(),
        };
        Ok(text)
    }

    /// Render into any writer.
    pub fn write_to<W: Write>(&self, format: ReportFormat, writer: &mut W) -> Result<()> {
        let text = self.render(format)?;
        writer
            .write_all(text.as_bytes())
            .and_then(|_| writer.flush())
            .map_err(|e| AlarmCheckError::ReportWrite {
                path: "<writer>".into(),
                source: e,
            })
    }

    /// Write the report to a file, creating parent directories if needed.
    pub fn save(&self, format: ReportFormat, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = self.render(format)?;

        let write_err = |e| AlarmCheckError::ReportWrite {
            path: path.to_path_buf(),
            source: e,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(write_err)?;
            }
        }

        let file = File::create(path).map_err(write_err)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(text.as_bytes()).map_err(write_err)?;
        writer.flush().map_err(write_err)?;
        Ok(())
    }

    fn document(&self) -> ReportDocument {
        ReportDocument {
            valid: self.is_valid(),
            failure_count: self.failures.len(),
            source: self.source.clone(),
            failures: self.failures.clone(),
        }
    }

    fn render_grouped(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Validation errors found: {}", self.failures.len());
        for (column, failures) in self.by_column() {
            let _ = writeln!(out, "Invalid {} values ({}):", column, failures.len());
            for failure in failures {
                let _ = writeln!(
                    out,
                    "  Row {}: '{}' - {}",
                    failure.source_line,
                    failure.raw_value,
                    failure.rule.describe()
                );
            }
        }
        out
    }

    fn render_blocks(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Validation errors found: {}", self.failures.len());
        for failure in &self.failures {
            let _ = writeln!(out);
            let _ = writeln!(
                out,
                "Row {} failure_case: {}",
                failure.source_line, failure.raw_value
            );
            let _ = writeln!(out, "  column: {}", failure.column);
            let _ = writeln!(out, "  rule: {}", failure.rule.describe());
        }
        out
    }
}
