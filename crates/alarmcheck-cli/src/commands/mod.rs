//! CLI command implementations.

pub mod schema;
pub mod validate;
