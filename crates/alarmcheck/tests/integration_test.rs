//! Integration tests for alarmcheck.

use std::io::Write;
use tempfile::NamedTempFile;

use alarmcheck::{
    AlarmCheckError, AlarmValidator, Cell, ParserConfig, ReportFormat, Rule, SUCCESS_MESSAGE,
    ValidatorConfig,
};

const HEADER: &str = "alarm_id,timestamp,site_id,alarm_code,severity,status";

/// Helper to create a temporary file with given content.
fn create_test_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

fn alarm_file(rows: &[&str]) -> NamedTempFile {
    let mut content = String::from(HEADER);
    content.push('\n');
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }
    create_test_file(&content)
}

// =============================================================================
// Clean Data
// =============================================================================

#[test]
fn test_conformant_file_is_valid() {
    let file = alarm_file(&[
        "1,2024-01-15 08:30:00,5,ALM12,Critical,New",
        "2,2024-01-15 09:00:00,7,ALM3,Major,Acknowledged",
        "3,2024-01-16 23:59:59,5,ALM100,Minor,Resolved",
        "4,2024-02-29 00:00:00,9,ALM7,Warning,New",
    ]);

    let run = AlarmValidator::new().run(file.path()).expect("Validation failed");

    assert!(run.is_valid());
    assert_eq!(run.source.row_count, 4);
    assert_eq!(run.source.format, "csv");
    assert!(run.source.hash.starts_with("sha256:"));
    assert_eq!(
        run.report().render(ReportFormat::Grouped).unwrap(),
        format!("{}\n", SUCCESS_MESSAGE)
    );
}

#[test]
fn test_header_only_file_is_valid() {
    let file = create_test_file(&format!("{}\n", HEADER));

    let run = AlarmValidator::new().run(file.path()).expect("Validation failed");

    assert!(run.failures.is_empty());
    assert_eq!(run.source.row_count, 0);
    assert_eq!(
        run.report().render(ReportFormat::PerFailure).unwrap(),
        "CSV data is valid.\n"
    );
}

#[test]
fn test_extra_columns_are_ignored_but_kept() {
    let file = create_test_file(
        "alarm_id,timestamp,site_id,alarm_code,severity,status,operator\n\
         1,2024-01-15 08:30:00,5,ALM12,Critical,New,anything goes\n",
    );

    let run = AlarmValidator::new().run(file.path()).expect("Validation failed");

    assert!(run.is_valid());
    assert_eq!(run.table.column_count(), 7);
    assert_eq!(
        run.table.get_by_name(0, "operator"),
        Some(&Cell::from("anything goes"))
    );
}

#[test]
fn test_tsv_auto_detect() {
    let file = create_test_file(
        "alarm_id\ttimestamp\tsite_id\talarm_code\tseverity\tstatus\n\
         1\t2024-01-15 08:30:00\t5\tALM12\tCritical\tNew\n",
    );

    let run = AlarmValidator::new().run(file.path()).expect("Validation failed");

    assert_eq!(run.source.format, "tsv");
    assert!(run.is_valid());
}

// =============================================================================
// Failure Scenarios
// =============================================================================

#[test]
fn test_impossible_timestamp_fails_on_timestamp_only() {
    let file = alarm_file(&["1,2024-13-40 99:99:99,5,ALM12,Critical,New"]);

    let run = AlarmValidator::new().run(file.path()).expect("Validation failed");

    assert!(!run.failures.is_empty());
    for failure in &run.failures {
        assert_eq!(failure.column, "timestamp");
        assert_eq!(failure.row_index, 0);
        assert_eq!(failure.raw_value, Cell::from("2024-13-40 99:99:99"));
    }
}

#[test]
fn test_misspelled_severity() {
    let file = alarm_file(&["1,2024-01-15 08:30:00,5,ALM12,Critcal,New"]);

    let run = AlarmValidator::new().run(file.path()).expect("Validation failed");

    assert_eq!(run.failures.len(), 1);
    let failure = &run.failures[0];
    assert_eq!(failure.column, "severity");
    assert_eq!(failure.raw_value, Cell::from("Critcal"));
    assert!(matches!(failure.rule, Rule::Enumeration { .. }));
}

#[test]
fn test_every_failing_cell_is_reported() {
    let file = alarm_file(&[
        "1,2024-01-15 08:30:00,5,ALM12,Critical,New",
        "x,2024-01-15 08:30:00,5,ALM12,Critical,New",
        "3,15/01/2024,5,ALM12,Critical,New",
        "4,2024-01-15 08:30:00,5,XYZ9,Critical,New",
        "5,2024-01-15 08:30:00,5,ALM12,critical,New",
        "6,2024-01-15 08:30:00,5,ALM12,Critical,Closed",
        "7,2024-01-15 08:30:00,5.5,ALM12,Critical,New",
    ]);

    let run = AlarmValidator::new().run(file.path()).expect("Validation failed");

    let reconciled = run.reconciled();
    let lines: Vec<(usize, &str)> = reconciled
        .iter()
        .map(|f| (f.source_line, f.column.as_str()))
        .collect();

    assert!(lines.contains(&(3, "alarm_id")));
    assert!(lines.contains(&(4, "timestamp")));
    assert!(lines.contains(&(5, "alarm_code")));
    assert!(lines.contains(&(6, "severity")));
    assert!(lines.contains(&(7, "status")));
    assert!(lines.contains(&(8, "site_id")));
    assert!(!lines.iter().any(|(line, _)| *line == 2));
}

#[test]
fn test_missing_required_values() {
    let file = alarm_file(&[",2024-01-15 08:30:00,5,,Critical,"]);

    let run = AlarmValidator::new().run(file.path()).expect("Validation failed");

    let columns: Vec<&str> = run.failures.iter().map(|f| f.column.as_str()).collect();
    assert_eq!(columns, vec!["alarm_id", "alarm_code", "status"]);
    assert!(run.failures.iter().all(|f| f.rule == Rule::MissingRequired));

    // Reconciled values come from the loaded table, not the sentinel.
    assert!(run.reconciled().iter().all(|f| f.raw_value == Cell::Missing));
}

#[test]
fn test_day_first_timestamps_are_accepted() {
    let file = alarm_file(&["1,15-01-2024 08:30:00,5,ALM12,Critical,New"]);

    let run = AlarmValidator::new().run(file.path()).expect("Validation failed");

    assert!(run.is_valid());
    // The run keeps the table as loaded.
    assert_eq!(
        run.table.get_by_name(0, "timestamp"),
        Some(&Cell::from("15-01-2024 08:30:00"))
    );
}

#[test]
fn test_unparseable_timestamp_row_is_not_dropped() {
    let file = alarm_file(&[
        "1,2024-01-15 08:30:00,5,ALM12,Critical,New",
        "2,sometime,5,ALM12,Critical,New",
    ]);

    let run = AlarmValidator::new().run(file.path()).expect("Validation failed");

    assert_eq!(run.table.row_count(), 2);
    let reconciled = run.reconciled();
    assert!(!reconciled.is_empty());
    assert!(reconciled.iter().all(|f| f.source_line == 3));
    assert!(reconciled.iter().all(|f| f.raw_value == Cell::from("sometime")));
}

// =============================================================================
// Fatal Errors
// =============================================================================

#[test]
fn test_ragged_file_is_load_error() {
    let file = alarm_file(&[
        "1,2024-01-15 08:30:00,5,ALM12,Critical,New",
        "2,2024-01-15 08:30:00,5,ALM12,Critical",
    ]);

    let err = AlarmValidator::new().run(file.path()).unwrap_err();

    assert!(err.is_load_error());
    assert!(matches!(err, AlarmCheckError::RaggedRow { line: 3, .. }));
}

#[test]
fn test_missing_file_is_load_error() {
    let err = AlarmValidator::new()
        .run("/nonexistent/path/alarms.csv")
        .unwrap_err();

    assert!(matches!(err, AlarmCheckError::Io { .. }));
    assert!(err.is_load_error());
}

#[test]
fn test_empty_file_is_load_error() {
    let file = create_test_file("");

    let err = AlarmValidator::new().run(file.path()).unwrap_err();

    assert!(matches!(err, AlarmCheckError::EmptyData(_)));
}

#[test]
fn test_missing_schema_column_is_fatal() {
    let file = create_test_file(
        "alarm_id,timestamp,site_id,alarm_code,severity\n\
         1,2024-01-15 08:30:00,5,ALM12,Critical\n",
    );

    let err = AlarmValidator::new().run(file.path()).unwrap_err();

    match err {
        AlarmCheckError::SchemaMismatch { missing } => assert_eq!(missing, vec!["status"]),
        other => panic!("unexpected error: {other}"),
    }
}

// =============================================================================
// Configuration & Reporting
// =============================================================================

#[test]
fn test_explicit_delimiter() {
    let file = create_test_file(
        "alarm_id;timestamp;site_id;alarm_code;severity;status\n\
         1;2024-01-15 08:30:00;5;ALM12;Critical;New\n",
    );
    let config = ValidatorConfig {
        parser: ParserConfig::default().with_delimiter(b';'),
        ..Default::default()
    };

    let run = AlarmValidator::with_config(config)
        .run(file.path())
        .expect("Validation failed");

    assert_eq!(run.source.format, "csv-semicolon");
    assert!(run.is_valid());
}

#[test]
fn test_report_saved_to_file() {
    let file = alarm_file(&[
        "1,2024-01-15 08:30:00,5,ALM12,Critcal,New",
        "2,2024-01-15 08:30:00,5,BAD,Major,New",
    ]);
    let out_dir = tempfile::tempdir().unwrap();
    let report_path = out_dir.path().join("errors.txt");

    let mut run = AlarmValidator::new().run(file.path()).expect("Validation failed");
    run.save_report(ReportFormat::Grouped, &report_path)
        .expect("Report write failed");

    let text = std::fs::read_to_string(&report_path).unwrap();
    assert!(text.starts_with("Validation errors found: 2\n"));
    assert!(text.contains("Invalid severity values (1):\n  Row 2: 'Critcal'"));
    assert!(text.contains("Invalid alarm_code values (1):\n  Row 3: 'BAD'"));
}

#[test]
fn test_json_report_includes_source() {
    let file = alarm_file(&["1,2024-01-15 08:30:00,5,ALM12,Critical,Open"]);

    let run = AlarmValidator::new().run(file.path()).expect("Validation failed");
    let json = run.report().render(ReportFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["valid"], false);
    assert_eq!(value["source"]["row_count"], 1);
    assert_eq!(value["failures"][0]["source_line"], 2);
    assert_eq!(value["failures"][0]["column"], "status");
    assert_eq!(value["failures"][0]["raw_value"], "Open");
}
