//! Main validator struct and public API.

use std::fmt;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span};

use crate::alarm::alarm_schema;
use crate::error::Result;
use crate::input::{DataTable, Parser, ParserConfig, SourceMetadata};
use crate::report::{Report, ReportFormat};
use crate::schema::Schema;
use crate::validation::{
    DEFAULT_MISSING_SENTINEL, FailureCase, ReconciledFailure, ValidationEngine, reconcile,
};

/// Configuration for a validation run.
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Parser configuration.
    pub parser: ParserConfig,
    /// Text substituted for missing values in required string columns.
    pub missing_sentinel: String,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            parser: ParserConfig::default(),
            missing_sentinel: DEFAULT_MISSING_SENTINEL.to_string(),
        }
    }
}

/// Stages of a single run, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStage {
    Unloaded,
    Loaded,
    Preprocessed,
    Validated,
    Reported,
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RunStage::Unloaded => "unloaded",
            RunStage::Loaded => "loaded",
            RunStage::Preprocessed => "preprocessed",
            RunStage::Validated => "validated",
            RunStage::Reported => "reported",
        };
        f.write_str(label)
    }
}

/// Outcome of validating one file.
#[derive(Debug, Clone)]
pub struct ValidationRun {
    /// Metadata about the source file.
    pub source: SourceMetadata,
    /// The table as loaded, before preprocessing.
    pub table: DataTable,
    /// Every failure found, in row order.
    pub failures: Vec<FailureCase>,
    /// Last stage reached.
    pub stage: RunStage,
}

impl ValidationRun {
    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }

    /// Failures addressed by source line with their original values.
    pub fn reconciled(&self) -> Vec<ReconciledFailure> {
        self.failures
            .iter()
            .map(|f| reconcile(f, &self.table))
            .collect()
    }

    /// Build a report for this run.
    pub fn report(&self) -> Report {
        Report::new(self.reconciled()).with_source(self.source.clone())
    }

    /// Render the report into `writer` and mark the run as reported.
    pub fn write_report<W: io::Write>(&mut self, format: ReportFormat, writer: &mut W) -> Result<()> {
        self.report().write_to(format, writer)?;
        self.stage = RunStage::Reported;
        Ok(())
    }

    /// Save the report to `path` and mark the run as reported.
    pub fn save_report(&mut self, format: ReportFormat, path: impl AsRef<Path>) -> Result<()> {
        self.report().save(format, path)?;
        self.stage = RunStage::Reported;
        Ok(())
    }
}

/// Validates delimited files against a schema.
pub struct AlarmValidator {
    config: ValidatorConfig,
    parser: Parser,
    engine: ValidationEngine,
    schema: Schema,
}

impl AlarmValidator {
    /// Create a validator for the alarm schema with default configuration.
    pub fn new() -> Self {
        Self::with_config(ValidatorConfig::default())
    }

    /// Create a validator for the alarm schema with custom configuration.
    pub fn with_config(config: ValidatorConfig) -> Self {
        let parser = Parser::with_config(config.parser.clone());
        let engine = ValidationEngine::new().with_sentinel(config.missing_sentinel.clone());

        Self {
            config,
            parser,
            engine,
            schema: alarm_schema().clone(),
        }
    }

    /// Validate against a different schema.
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = schema;
        self
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Load, preprocess and validate a file.
    ///
    /// Errors are returned only for load problems and an inapplicable
    /// schema; cell violations are returned in [`ValidationRun::failures`].
    pub fn run(&self, path: impl AsRef<Path>) -> Result<ValidationRun> {
        let path = path.as_ref();
        let span = info_span!("validate", path = %path.display());
        let _enter = span.enter();

        debug!(stage = %RunStage::Unloaded, "starting run");
        let (table, source) = self.parser.parse_file(path)?;
        debug!(stage = %RunStage::Loaded, rows = table.row_count());

        self.schema.ensure_applicable(&table)?;

        let prepared = self.engine.preprocess(&table, &self.schema);
        debug!(stage = %RunStage::Preprocessed);

        let failures = self.engine.validate(&prepared, &self.schema);
        debug!(stage = %RunStage::Validated, failures = failures.len());

        info!(
            file = %source.file,
            rows = table.row_count(),
            failures = failures.len(),
            "validation finished"
        );

        Ok(ValidationRun {
            source,
            table,
            failures,
            stage: RunStage::Validated,
        })
    }
}

impl Default for AlarmValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate an alarm file and print the grouped report to stdout.
///
/// Returns an error only when the file cannot be loaded, the schema does not
/// apply, or stdout cannot be written.
///
/// ```no_run
/// alarmcheck::validate_csv("alarms.csv").unwrap();
/// ```
pub fn validate_csv(file_path: impl AsRef<Path>) -> Result<()> {
    let mut run = AlarmValidator::new().run(file_path)?;
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    run.write_report(ReportFormat::Grouped, &mut handle)
}
