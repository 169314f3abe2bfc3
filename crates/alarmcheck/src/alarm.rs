//! The alarm record schema.
//!
//! Every column is required. Timestamps may arrive as `YYYY-MM-DD HH:MM:SS`
//! or `DD-MM-YYYY HH:MM:SS` and are normalized to the first form before the
//! strict checks run.

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;

use crate::error::Result;
use crate::schema::{Check, ColumnSpec, Schema, TimestampCoercion};

/// chrono format every timestamp is normalized to.
pub const CANONICAL_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Day-first source format accepted during preprocessing.
pub const DAY_FIRST_TIMESTAMP_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

pub const TIMESTAMP_PATTERN: &str = r"\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}";
pub const ALARM_CODE_PATTERN: &str = r"ALM\d+";

pub const SEVERITIES: &[&str] = &["Critical", "Major", "Minor", "Warning"];
pub const STATUSES: &[&str] = &["New", "Acknowledged", "Resolved"];

static ALARM_SCHEMA: Lazy<Schema> =
    Lazy::new(|| build_alarm_schema().expect("built-in alarm schema is well-formed"));

/// The process-wide alarm schema.
pub fn alarm_schema() -> &'static Schema {
    &ALARM_SCHEMA
}

/// Build a fresh copy of the alarm schema.
pub fn build_alarm_schema() -> Result<Schema> {
    Schema::define(vec![
        ColumnSpec::integer("alarm_id"),
        ColumnSpec::string("timestamp")
            .with_coercion(
                TimestampCoercion::new(CANONICAL_TIMESTAMP_FORMAT)
                    .or_format(DAY_FIRST_TIMESTAMP_FORMAT),
            )
            .with_check(Check::str_matches(TIMESTAMP_PATTERN)?)
            .with_check(Check::predicate("valid calendar date and time", |v| {
                NaiveDateTime::parse_from_str(v, CANONICAL_TIMESTAMP_FORMAT).is_ok()
            })),
        ColumnSpec::integer("site_id"),
        ColumnSpec::string("alarm_code").with_check(Check::str_matches(ALARM_CODE_PATTERN)?),
        ColumnSpec::string("severity").with_check(Check::is_in(SEVERITIES.iter().copied())),
        ColumnSpec::string("status").with_check(Check::is_in(STATUSES.iter().copied())),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alarm_columns() {
        assert_eq!(
            alarm_schema().column_names(),
            vec!["alarm_id", "timestamp", "site_id", "alarm_code", "severity", "status"]
        );
        assert!(alarm_schema().columns().all(|c| !c.nullable));
    }

    #[test]
    fn test_timestamp_checks() {
        let ts = alarm_schema().column("timestamp").unwrap();
        assert!(ts.coercion.is_some());
        assert!(ts.checks.iter().all(|c| c.passes("2024-02-29 23:59:59")));
        // Shape is right but the date is not.
        assert!(ts.checks[0].passes("2024-13-40 99:99:99"));
        assert!(!ts.checks[1].passes("2024-13-40 99:99:99"));
    }

    #[test]
    fn test_severity_and_status_sets() {
        let severity = alarm_schema().column("severity").unwrap();
        assert!(severity.checks[0].passes("Critical"));
        assert!(!severity.checks[0].passes("Critcal"));

        let status = alarm_schema().column("status").unwrap();
        assert!(status.checks[0].passes("Acknowledged"));
        assert!(!status.checks[0].passes("Closed"));
    }
}
