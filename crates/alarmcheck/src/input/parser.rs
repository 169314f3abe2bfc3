//! CSV/TSV loader with delimiter detection.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::debug;

use super::source::{Cell, DataTable, SourceMetadata};
use crate::error::{AlarmCheckError, Result};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Tokens read as missing values, in addition to blank fields.
pub const DEFAULT_NULL_TOKENS: &[&str] = &[
    "NA", "N/A", "n/a", "NULL", "null", "NaN", "nan", "None", "<NA>",
];

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Whether the first line holds column names.
    pub has_header: bool,
    /// Quote character.
    pub quote: u8,
    /// Exact field contents that mean "no value".
    pub null_tokens: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            quote: b'"',
            null_tokens: DEFAULT_NULL_TOKENS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ParserConfig {
    /// Use a fixed delimiter instead of auto-detection.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Read the first line as data and name columns `column_1..column_N`.
    pub fn without_header(mut self) -> Self {
        self.has_header = false;
        self
    }

    /// Replace the null token list.
    pub fn with_null_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.null_tokens = tokens.into_iter().map(Into::into).collect();
        self
    }
}

/// Parse a user-supplied delimiter: a single ASCII character, or `tab` / `\t`.
pub fn parse_delimiter(value: &str) -> Result<u8> {
    match value {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        s if s.len() == 1 && s.is_ascii() => Ok(s.as_bytes()[0]),
        other => Err(AlarmCheckError::InvalidDelimiter(format!(
            "'{}' is not a single ASCII character",
            other
        ))),
    }
}

/// Loads delimited files into a [`DataTable`].
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a file and return the data table and metadata.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(DataTable, SourceMetadata)> {
        let path = path.as_ref();

        let io_err = |e| AlarmCheckError::Io {
            path: path.to_path_buf(),
            source: e,
        };

        let mut file = File::open(path).map_err(io_err)?;
        let size_bytes = file.metadata().map_err(io_err)?.len();

        let mut contents = Vec::new();
        file.read_to_end(&mut contents).map_err(io_err)?;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(&contents)?,
        };

        let data_table = self.parse_with_delimiter(&contents, delimiter)?;

        let format = match delimiter {
            b'\t' => "tsv",
            b',' => "csv",
            b';' => "csv-semicolon",
            b'|' => "psv",
            _ => "delimited",
        }
        .to_string();

        debug!(
            path = %path.display(),
            rows = data_table.row_count(),
            columns = data_table.column_count(),
            format = %format,
            "loaded table"
        );

        let source_metadata = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            size_bytes,
            format,
            data_table.row_count(),
            data_table.column_count(),
        );

        Ok((data_table, source_metadata))
    }

    /// Parse an in-memory byte stream, detecting the delimiter if needed.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<DataTable> {
        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(bytes)?,
        };
        self.parse_with_delimiter(bytes, delimiter)
    }

    fn reader<'a>(&self, bytes: &'a [u8], delimiter: u8) -> csv::Reader<&'a [u8]> {
        csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(self.config.has_header)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes)
    }

    fn parse_with_delimiter(&self, bytes: &[u8], delimiter: u8) -> Result<DataTable> {
        let mut reader = self.reader(bytes, delimiter);

        let headers: Vec<String> = if self.config.has_header {
            reader
                .headers()?
                .iter()
                .map(|s| s.trim().to_string())
                .collect()
        } else {
            // Column count comes from the first record.
            match reader.records().next() {
                Some(Ok(record)) => (0..record.len())
                    .map(|i| format!("column_{}", i + 1))
                    .collect(),
                Some(Err(e)) => return Err(e.into()),
                None => return Err(AlarmCheckError::EmptyData("No data rows found".to_string())),
            }
        };

        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(AlarmCheckError::EmptyData("No header row found".to_string()));
        }

        // Start over so the first record is read as data when there is no header.
        let mut reader = self.reader(bytes, delimiter);
        let expected = headers.len();
        let mut rows = Vec::new();

        for result in reader.records() {
            let record = result?;
            if record.len() != expected {
                return Err(AlarmCheckError::RaggedRow {
                    line: record.position().map(|p| p.line()).unwrap_or(0),
                    expected,
                    found: record.len(),
                });
            }
            rows.push(record.iter().map(|field| self.to_cell(field)).collect());
        }

        let table = DataTable::new(headers, rows, delimiter);
        Ok(if self.config.has_header {
            table
        } else {
            table.without_header_row()
        })
    }

    fn to_cell(&self, field: &str) -> Cell {
        if field.trim().is_empty() || self.config.null_tokens.iter().any(|t| t == field) {
            Cell::Missing
        } else {
            Cell::Text(field.to_string())
        }
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Detect the delimiter by analyzing the first few lines.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let reader = BufReader::new(bytes);
    let lines: Vec<String> = reader
        .lines()
        .take(10)
        .filter_map(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return Err(AlarmCheckError::EmptyData("No lines to analyze".to_string()));
    }

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        // Higher count with lower variance wins; tab gets a small bonus
        // since it rarely appears inside values.
        let consistent = counts.iter().all(|&c| c == first_count);
        let variance: f64 = if counts.len() > 1 {
            let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
            counts.iter().map(|&c| (c as f64 - mean).powi(2)).sum::<f64>() / counts.len() as f64
        } else {
            0.0
        };

        let score = if consistent {
            first_count * 1000 + (if delim == b'\t' { 100 } else { 0 })
        } else if variance < 1.0 {
            first_count * 100
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    Ok(best_delimiter)
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_delimiter_csv() {
        let data = b"a,b,c\n1,2,3\n4,5,6";
        assert_eq!(detect_delimiter(data).unwrap(), b',');
    }

    #[test]
    fn test_detect_delimiter_tsv() {
        let data = b"a\tb\tc\n1\t2\t3\n4\t5\t6";
        assert_eq!(detect_delimiter(data).unwrap(), b'\t');
    }

    #[test]
    fn test_detect_delimiter_ignores_timestamp_colons() {
        let data = b"alarm_id,timestamp\n1,2024-01-01 10:00:00\n";
        assert_eq!(detect_delimiter(data).unwrap(), b',');
    }

    #[test]
    fn test_parse_csv() {
        let parser = Parser::new();
        let data = b"alarm_id,severity,status\n1,Major,New\n2,,Resolved";
        let table = parser.parse_bytes(data).unwrap();

        assert_eq!(table.headers, vec!["alarm_id", "severity", "status"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.get(0, 1), Some(&Cell::from("Major")));
        assert_eq!(table.get(1, 1), Some(&Cell::Missing));
    }

    #[test]
    fn test_null_tokens_become_missing() {
        let parser = Parser::new();
        let table = parser.parse_bytes(b"a,b,c\nNA,null,x\n").unwrap();
        assert_eq!(table.get(0, 0), Some(&Cell::Missing));
        assert_eq!(table.get(0, 1), Some(&Cell::Missing));
        assert_eq!(table.get(0, 2), Some(&Cell::from("x")));
    }

    #[test]
    fn test_custom_null_tokens() {
        let parser = Parser::with_config(ParserConfig::default().with_null_tokens(["-"]));
        let table = parser.parse_bytes(b"a,b\n-,NA\n").unwrap();
        assert_eq!(table.get(0, 0), Some(&Cell::Missing));
        assert_eq!(table.get(0, 1), Some(&Cell::from("NA")));
    }

    #[test]
    fn test_parse_without_header() {
        let parser = Parser::with_config(ParserConfig::default().without_header());
        let table = parser.parse_bytes(b"1,Major\n2,NA\n").unwrap();

        assert_eq!(table.headers, vec!["column_1", "column_2"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.get(0, 1), Some(&Cell::from("Major")));
        assert_eq!(table.get(1, 1), Some(&Cell::Missing));
        assert_eq!(table.source_line(0), 1);
    }

    #[test]
    fn test_ragged_row_without_header_reports_line() {
        let parser = Parser::with_config(
            ParserConfig::default().with_delimiter(b',').without_header(),
        );
        let err = parser.parse_bytes(b"1,2\n3\n").unwrap_err();
        assert!(matches!(err, AlarmCheckError::RaggedRow { line: 2, .. }));
    }

    #[test]
    fn test_header_only_is_empty_table() {
        let parser = Parser::new();
        let table = parser.parse_bytes(b"alarm_id,severity\n").unwrap();
        assert_eq!(table.column_count(), 2);
        assert!(table.is_empty());
    }

    #[test]
    fn test_ragged_row_is_rejected() {
        let parser = Parser::with_config(ParserConfig::default().with_delimiter(b','));
        let err = parser
            .parse_bytes(b"a,b,c\n1,2,3\n4,5\n")
            .unwrap_err();
        match err {
            AlarmCheckError::RaggedRow {
                line,
                expected,
                found,
            } => {
                assert_eq!(line, 3);
                assert_eq!(expected, 3);
                assert_eq!(found, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let parser = Parser::new();
        assert!(matches!(
            parser.parse_bytes(b""),
            Err(AlarmCheckError::EmptyData(_))
        ));
    }

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(parse_delimiter(",").unwrap(), b',');
        assert_eq!(parse_delimiter("tab").unwrap(), b'\t');
        assert!(parse_delimiter(";;").is_err());
        assert!(parse_delimiter("é").is_err());
    }
}
