//! Input loading and data source handling.

mod parser;
mod source;

pub use parser::{DEFAULT_NULL_TOKENS, Parser, ParserConfig, parse_delimiter};
pub use source::{Cell, DataTable, HEADER_LINE_OFFSET, HEADERLESS_LINE_OFFSET, SourceMetadata};
