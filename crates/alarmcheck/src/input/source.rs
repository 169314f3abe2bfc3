//! Data source abstraction and metadata.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of lines between an in-memory row index and its source line:
/// one header line plus 1-based line numbering.
pub const HEADER_LINE_OFFSET: usize = 2;

/// Line offset for input read without a header row.
pub const HEADERLESS_LINE_OFFSET: usize = 1;

/// Metadata about the source data file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Detected format (csv, tsv, etc.).
    pub format: String,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When the file was loaded.
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for a file that has been loaded.
    pub fn new(
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        format: String,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            format,
            row_count,
            column_count,
            loaded_at: Utc::now(),
        }
    }
}

/// A single raw cell value.
///
/// `Missing` is distinct from an empty string: the loader produces it for
/// blank fields and null tokens, never for text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Missing,
    Text(String),
    /// Placeholder written by preprocessing in place of a missing value.
    /// Still counts as null, whatever its text.
    Sentinel(String),
}

impl Cell {
    /// The value to validate; `None` for nulls and placeholders.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s.as_str()),
            Cell::Missing | Cell::Sentinel(_) => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Missing => f.write_str("<missing>"),
            Cell::Text(s) | Cell::Sentinel(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<Option<&str>> for Cell {
    fn from(value: Option<&str>) -> Self {
        value.map(Cell::from).unwrap_or(Cell::Missing)
    }
}

/// Represents parsed tabular data.
#[derive(Debug, Clone, PartialEq)]
pub struct DataTable {
    /// Column headers.
    pub headers: Vec<String>,
    /// Row data (row-major order, same order as the source file).
    pub rows: Vec<Vec<Cell>>,
    /// The delimiter used.
    pub delimiter: u8,
    line_offset: usize,
}

impl DataTable {
    /// Create a new data table.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>, delimiter: u8) -> Self {
        Self {
            headers,
            rows,
            delimiter,
            line_offset: HEADER_LINE_OFFSET,
        }
    }

    /// Mark the table as read from input with no header row, so the first
    /// data row sits on line 1.
    pub fn without_header_row(mut self) -> Self {
        self.line_offset = HEADERLESS_LINE_OFFSET;
        self
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Get a cell by row index and column name.
    pub fn get_by_name(&self, row: usize, column: &str) -> Option<&Cell> {
        let col = self.column_index(column)?;
        self.get(row, col)
    }

    /// Source line number of an in-memory row.
    pub fn source_line(&self, row_index: usize) -> usize {
        row_index + self.line_offset
    }
}
