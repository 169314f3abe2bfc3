//! Failure records produced by validation.

use serde::{Deserialize, Serialize};

use crate::input::{Cell, DataTable};
use crate::schema::{Check, ColumnType};

/// Which rule a cell violated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rule {
    /// Null value in a non-nullable column.
    MissingRequired,
    /// Value does not convert to the declared type.
    Type { expected: ColumnType },
    /// Value does not match the required pattern.
    Format { pattern: String },
    /// Value is not in the allowed set.
    Enumeration { allowed: Vec<String> },
    /// Value fails a named predicate.
    Predicate { name: String },
}

impl Rule {
    /// Rule raised by a failed [`Check`].
    pub fn from_check(check: &Check) -> Self {
        match check {
            Check::Matches { pattern, .. } => Rule::Format {
                pattern: pattern.clone(),
            },
            Check::IsIn { values } => Rule::Enumeration {
                allowed: values.clone(),
            },
            Check::Predicate { name, .. } => Rule::Predicate { name: name.clone() },
        }
    }

    /// Get a human-readable label for the rule kind.
    pub fn label(&self) -> &'static str {
        match self {
            Rule::MissingRequired => "missing required value",
            Rule::Type { .. } => "type",
            Rule::Format { .. } => "format",
            Rule::Enumeration { .. } => "enumeration",
            Rule::Predicate { .. } => "predicate",
        }
    }

    /// Sentence describing the violation.
    pub fn describe(&self) -> String {
        match self {
            Rule::MissingRequired => "missing required value".to_string(),
            Rule::Type { expected } => format!("expected {} value", expected),
            Rule::Format { pattern } => format!("does not match format /{}/", pattern),
            Rule::Enumeration { allowed } => format!("not one of {{{}}}", allowed.join(", ")),
            Rule::Predicate { name } => format!("fails check: {}", name),
        }
    }
}

/// One cell violating one rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureCase {
    /// Zero-based index into the in-memory table.
    pub row_index: usize,
    /// Column name.
    pub column: String,
    /// Value that was evaluated.
    pub raw_value: Cell,
    /// Violated rule.
    pub rule: Rule,
}

impl FailureCase {
    pub fn new(row_index: usize, column: impl Into<String>, raw_value: Cell, rule: Rule) -> Self {
        Self {
            row_index,
            column: column.into(),
            raw_value,
            rule,
        }
    }
}

/// A failure addressed by source line, carrying the value as it was loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciledFailure {
    /// 1-based line in the source file.
    pub source_line: usize,
    pub column: String,
    /// Value before preprocessing.
    pub raw_value: Cell,
    pub rule: Rule,
}

/// Map a failure back to its source line, looking up the original value in
/// the table as loaded (before preprocessing).
pub fn reconcile(failure: &FailureCase, original: &DataTable) -> ReconciledFailure {
    let raw_value = original
        .get_by_name(failure.row_index, &failure.column)
        .cloned()
        .unwrap_or_else(|| failure.raw_value.clone());

    ReconciledFailure {
        source_line: original.source_line(failure.row_index),
        column: failure.column.clone(),
        raw_value,
        rule: failure.rule.clone(),
    }
}
