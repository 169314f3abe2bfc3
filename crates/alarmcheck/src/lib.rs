//! alarmcheck: schema validation and error reporting for tabular alarm records.
//!
//! A delimited file is loaded into memory, timestamps are normalized, and every
//! column rule is evaluated against every row. All violations are collected
//! (nothing stops at the first error) and mapped back to source line numbers.
//!
//! # Core Principles
//!
//! - **Lazy**: every failing cell is reported in a single pass
//! - **Accountable**: no input row is dropped; unparseable values are reported
//! - **Values, not exceptions**: cell violations are data, only I/O is an error
//!
//! # Example
//!
//! ```no_run
//! use alarmcheck::{AlarmValidator, ReportFormat};
//!
//! let run = AlarmValidator::new().run("alarms.csv").unwrap();
//! for failure in run.reconciled() {
//!     println!("line {}: {} = {}", failure.source_line, failure.column, failure.raw_value);
//! }
//! print!("{}", run.report().render(ReportFormat::Grouped).unwrap());
//! ```

pub mod alarm;
pub mod error;
pub mod input;
pub mod report;
pub mod schema;
pub mod validation;

mod validator;

pub use crate::validator::{AlarmValidator, RunStage, ValidationRun, ValidatorConfig, validate_csv};
pub use alarm::alarm_schema;
pub use error::{AlarmCheckError, Result};
pub use input::{Cell, DataTable, Parser, ParserConfig, SourceMetadata};
pub use report::{Report, ReportFormat, SUCCESS_MESSAGE};
pub use schema::{Check, ColumnSpec, ColumnType, Schema, TimestampCoercion};
pub use validation::{FailureCase, ReconciledFailure, Rule, ValidationEngine, reconcile};
