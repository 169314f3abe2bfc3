//! Core type definitions for schema representation.

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDateTime;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Declared semantic type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Base-10 whole numbers, no fractional part.
    Integer,
    /// Text values.
    String,
}

impl ColumnType {
    /// Returns true if `value` converts to this type without loss.
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            ColumnType::Integer => value.trim().parse::<i64>().is_ok(),
            ColumnType::String => true,
        }
    }

    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ColumnType::Integer => "integer",
            ColumnType::String => "string",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Boolean test used by [`Check::Predicate`].
pub type PredicateFn = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// A validation rule applied to each non-null value of a column.
#[derive(Clone)]
pub enum Check {
    /// The whole value must match a regex.
    Matches {
        /// Pattern as written by the schema author.
        pattern: String,
        /// Compiled, anchored form of `pattern`.
        regex: Regex,
    },
    /// The value must be one of a fixed set.
    IsIn { values: Vec<String> },
    /// A named arbitrary test.
    Predicate { name: String, test: PredicateFn },
}

impl Check {
    /// Full-match regex check. The pattern is anchored at both ends.
    pub fn str_matches(pattern: &str) -> Result<Self> {
        let regex = Regex::new(&format!("^(?:{})$", pattern))?;
        Ok(Check::Matches {
            pattern: pattern.to_string(),
            regex,
        })
    }

    /// Set-membership check. Comparison is exact and case-sensitive.
    pub fn is_in<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Check::IsIn {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Named predicate check.
    pub fn predicate(
        name: impl Into<String>,
        test: impl Fn(&str) -> bool + Send + Sync + 'static,
    ) -> Self {
        Check::Predicate {
            name: name.into(),
            test: Arc::new(test),
        }
    }

    /// Run the check against a value.
    pub fn passes(&self, value: &str) -> bool {
        match self {
            Check::Matches { regex, .. } => regex.is_match(value),
            Check::IsIn { values } => values.iter().any(|v| v == value),
            Check::Predicate { test, .. } => test(value),
        }
    }

    /// Short description of what the check requires.
    pub fn describe(&self) -> String {
        match self {
            Check::Matches { pattern, .. } => format!("matches /{}/", pattern),
            Check::IsIn { values } => format!("one of {{{}}}", values.join(", ")),
            Check::Predicate { name, .. } => format!("satisfies {}", name),
        }
    }
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Check::Matches { pattern, .. } => {
                f.debug_struct("Matches").field("pattern", pattern).finish()
            }
            Check::IsIn { values } => f.debug_struct("IsIn").field("values", values).finish(),
            Check::Predicate { name, .. } => {
                f.debug_struct("Predicate").field("name", name).finish()
            }
        }
    }
}

/// Multi-format timestamp normalization applied before strict validation.
///
/// Accepted formats are tried in order; the first that parses wins and the
/// value is rewritten in `canonical`. The canonical format is always tried
/// first, which makes coercion idempotent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampCoercion {
    /// chrono format the value is rewritten into.
    pub canonical: String,
    /// chrono formats accepted as input, in priority order.
    pub accepted: Vec<String>,
}

impl TimestampCoercion {
    /// Create a coercion that only accepts the canonical format.
    pub fn new(canonical: impl Into<String>) -> Self {
        let canonical = canonical.into();
        Self {
            accepted: vec![canonical.clone()],
            canonical,
        }
    }

    /// Accept an additional source format (lower priority than existing ones).
    pub fn or_format(mut self, format: impl Into<String>) -> Self {
        let format = format.into();
        if !self.accepted.contains(&format) {
            self.accepted.push(format);
        }
        self
    }

    /// Rewrite `value` into the canonical format, or None if no accepted
    /// format parses it.
    pub fn coerce(&self, value: &str) -> Option<String> {
        let trimmed = value.trim();
        self.accepted.iter().find_map(|format| {
            NaiveDateTime::parse_from_str(trimmed, format)
                .ok()
                .map(|dt| dt.format(&self.canonical).to_string())
        })
    }
}
