//! Preprocessing and lazy row-by-row evaluation.

use tracing::{debug, warn};

use crate::input::{Cell, DataTable};
use crate::schema::{ColumnSpec, Schema};

use super::failure::{FailureCase, Rule};

/// Placeholder substituted for missing values in required string columns.
pub const DEFAULT_MISSING_SENTINEL: &str = "<missing>";

/// Evaluates every schema rule against every cell of a table.
#[derive(Debug, Clone)]
pub struct ValidationEngine {
    missing_sentinel: String,
}

impl ValidationEngine {
    /// Create an engine using [`DEFAULT_MISSING_SENTINEL`].
    pub fn new() -> Self {
        Self {
            missing_sentinel: DEFAULT_MISSING_SENTINEL.to_string(),
        }
    }

    /// Use a different sentinel for missing required strings.
    pub fn with_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.missing_sentinel = sentinel.into();
        self
    }

    pub fn sentinel(&self) -> &str {
        &self.missing_sentinel
    }

    /// Normalize values ahead of strict validation.
    ///
    /// Timestamps are rewritten into their canonical format when any accepted
    /// format parses them; values that parse under none are left untouched so
    /// that the strict checks report them. Missing values in required string
    /// columns become [`Cell::Sentinel`]. No row is added or removed.
    pub fn preprocess(&self, table: &DataTable, schema: &Schema) -> DataTable {
        let mut out = table.clone();

        for spec in schema.columns() {
            let Some(col) = out.column_index(&spec.name) else {
                continue;
            };

            let mut normalized = 0usize;
            let mut unparseable = 0usize;

            for (row_index, row) in out.rows.iter_mut().enumerate() {
                let Some(cell) = row.get_mut(col) else {
                    continue;
                };

                match cell {
                    Cell::Text(value) => {
                        let Some(coercion) = &spec.coercion else {
                            continue;
                        };
                        match coercion.coerce(value) {
                            Some(canonical) => {
                                if *value != canonical {
                                    normalized += 1;
                                }
                                *value = canonical;
                            }
                            None => {
                                unparseable += 1;
                                warn!(
                                    line = table.source_line(row_index),
                                    column = %spec.name,
                                    value = %value,
                                    "timestamp matches no accepted format"
                                );
                            }
                        }
                    }
                    Cell::Missing if spec.takes_sentinel() => {
                        *cell = Cell::Sentinel(self.missing_sentinel.clone());
                    }
                    Cell::Missing | Cell::Sentinel(_) => {}
                }
            }

            if spec.coercion.is_some() {
                debug!(
                    column = %spec.name,
                    normalized,
                    unparseable,
                    "timestamp preprocessing finished"
                );
            }
        }

        out
    }

    /// Run every rule against every cell and collect all failures.
    ///
    /// Per cell: nullability first, then the type check, then each check in
    /// declaration order. A null in a required column yields one
    /// [`Rule::MissingRequired`] and nothing else for that cell; a null in a
    /// nullable column is skipped. Output order is row, then schema column,
    /// then check.
    pub fn validate(&self, table: &DataTable, schema: &Schema) -> Vec<FailureCase> {
        let columns: Vec<(&ColumnSpec, usize)> = schema
            .columns()
            .filter_map(|spec| match table.column_index(&spec.name) {
                Some(col) => Some((spec, col)),
                None => {
                    warn!(column = %spec.name, "schema column absent from table; skipped");
                    None
                }
            })
            .collect();

        let mut failures = Vec::new();

        for (row_index, row) in table.rows.iter().enumerate() {
            for &(spec, col) in &columns {
                let cell = row.get(col).unwrap_or(&Cell::Missing);
                self.evaluate_cell(spec, cell, |rule| {
                    failures.push(FailureCase::new(row_index, &spec.name, cell.clone(), rule));
                });
            }
        }

        debug!(
            rows = table.row_count(),
            columns = columns.len(),
            failures = failures.len(),
            "validation pass complete"
        );

        failures
    }

    fn evaluate_cell(&self, spec: &ColumnSpec, cell: &Cell, mut fail: impl FnMut(Rule)) {
        let Some(value) = cell.as_text() else {
            if !spec.nullable {
                fail(Rule::MissingRequired);
            }
            return;
        };

        if !spec.column_type.accepts(value) {
            fail(Rule::Type {
                expected: spec.column_type,
            });
        }

        for check in &spec.checks {
            if !check.passes(value) {
                fail(Rule::from_check(check));
            }
        }
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new()
    }
}
