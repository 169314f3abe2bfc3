//! Validation engine: preprocessing, lazy evaluation and reconciliation.

mod engine;
mod failure;

pub use engine::{DEFAULT_MISSING_SENTINEL, ValidationEngine};
pub use failure::{FailureCase, ReconciledFailure, Rule, reconcile};
