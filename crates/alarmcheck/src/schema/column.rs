//! Column specification.

use super::types::{Check, ColumnType, TimestampCoercion};

/// Rules for a single column.
#[derive(Debug, Clone)]
pub struct ColumnSpec {
    /// Column name, unique within a schema.
    pub name: String,
    /// Declared data type.
    pub column_type: ColumnType,
    /// Whether missing values are allowed.
    pub nullable: bool,
    /// Checks run in declaration order.
    pub checks: Vec<Check>,
    /// Normalization applied to the column before validation.
    pub coercion: Option<TimestampCoercion>,
}

impl ColumnSpec {
    /// Create a non-nullable column with no checks.
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: false,
            checks: Vec::new(),
            coercion: None,
        }
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Integer)
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, ColumnType::String)
    }

    /// Set whether missing values are allowed.
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Append a check.
    pub fn with_check(mut self, check: Check) -> Self {
        self.checks.push(check);
        self
    }

    /// Normalize timestamps in this column before validation.
    pub fn with_coercion(mut self, coercion: TimestampCoercion) -> Self {
        self.coercion = Some(coercion);
        self
    }

    /// Missing values in this column are replaced by the sentinel during
    /// preprocessing.
    pub fn takes_sentinel(&self) -> bool {
        !self.nullable && self.column_type == ColumnType::String
    }
}
