//! Table-level schema definition.

use indexmap::IndexMap;

use super::column::ColumnSpec;
use crate::error::{AlarmCheckError, Result};
use crate::input::DataTable;

/// Ordered, immutable mapping from column name to [`ColumnSpec`].
#[derive(Debug, Clone)]
pub struct Schema {
    columns: IndexMap<String, ColumnSpec>,
}

impl Schema {
    /// Build a schema, rejecting duplicate column names.
    pub fn define(columns: Vec<ColumnSpec>) -> Result<Self> {
        let mut map = IndexMap::with_capacity(columns.len());
        for column in columns {
            if map.contains_key(&column.name) {
                return Err(AlarmCheckError::DuplicateColumn(column.name));
            }
            map.insert(column.name.clone(), column);
        }
        Ok(Self { columns: map })
    }

    /// Get a column by name.
    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.get(name)
    }

    /// Columns in declaration order.
    pub fn columns(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.columns.values()
    }

    /// Get all column names.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(|k| k.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Schema columns absent from the table header, in schema order.
    pub fn missing_columns(&self, table: &DataTable) -> Vec<String> {
        self.columns
            .keys()
            .filter(|name| table.column_index(name).is_none())
            .cloned()
            .collect()
    }

    /// Fail if the table lacks any column this schema names.
    pub fn ensure_applicable(&self, table: &DataTable) -> Result<()> {
        let missing = self.missing_columns(table);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(AlarmCheckError::SchemaMismatch { missing })
        }
    }
}
