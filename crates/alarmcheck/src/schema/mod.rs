//! Schema types: declarative per-column rules.

mod column;
mod table;
mod types;

pub use column::ColumnSpec;
pub use table::Schema;
pub use types::{Check, ColumnType, PredicateFn, TimestampCoercion};
