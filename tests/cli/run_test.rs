//! Integration tests for running lessons and queries from the command line.

use super::common::{run_cli, run_cli_with_log_filter};

#[test]
fn test_list_steps() {
    let (code, stdout, _stderr) = run_cli(&["--list"]);

    assert_eq!(code, 0);
    assert_eq!(stdout.lines().count(), 10);
    assert!(stdout.starts_with("preview-orderdetails"));
    assert!(stdout.contains("inner-join-using"));
    assert!(stdout.contains("customers-with-reps"));
}

#[test]
fn test_run_single_step_on_sample() {
    let (code, stdout, stderr) = run_cli(&["--sample", "-s", "never-ordered"]);

    assert_eq!(code, 0, "stderr: {stderr}");
    assert!(stdout.starts_with("[never-ordered] Finding unmatched rows\n"));
    assert!(stdout.contains("S12_1099"));
    assert!(stdout.contains("S700_2834"));
    assert!(stdout.contains("2 rows returned"));
}

#[test]
fn test_whole_lesson_runs_in_order() {
    let (code, stdout, stderr) = run_cli(&["--sample"]);

    assert_eq!(code, 0, "stderr: {stderr}");
    let first = stdout.find("[preview-orderdetails]").unwrap();
    let left = stdout.find("[left-join]").unwrap();
    let last = stdout.find("[customers-with-reps]").unwrap();
    assert!(first < left && left < last);
}

#[test]
fn test_preview_rows_limit() {
    let (code, stdout, _stderr) = run_cli(&["--sample", "-s", "preview-orderdetails", "-n", "3"]);

    assert_eq!(code, 0);
    assert!(stdout.contains("showing 3 of 8 rows"));
}

#[test]
fn test_json_output_has_every_row() {
    let (code, stdout, stderr) = run_cli(&[
        "--sample",
        "--output",
        "json",
        "-s",
        "foreign-key-join",
        "-n",
        "1",
    ]);

    assert_eq!(code, 0, "stderr: {stderr}");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let reports = parsed.as_array().unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0]["step"]["id"], "foreign-key-join");
    assert_eq!(reports[0]["result"]["rows"].as_array().unwrap().len(), 5);
}

#[test]
fn test_ad_hoc_query_json() {
    let (code, stdout, stderr) = run_cli(&[
        "--sample",
        "--output",
        "json",
        "-q",
        "SELECT officeCode FROM offices ORDER BY officeCode",
    ]);

    assert_eq!(code, 0, "stderr: {stderr}");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed[0]["columns"][0]["name"], "officeCode");
    assert_eq!(parsed[0]["row_count"], 3);
}

#[test]
fn test_schema_output() {
    let (code, stdout, _stderr) = run_cli(&["--sample", "--schema"]);

    assert_eq!(code, 0);
    assert!(stdout.contains("Table: customers"));
    assert!(stdout.contains("Foreign Keys:"));
}

#[test]
fn test_unknown_step_fails() {
    let (code, stdout, stderr) = run_cli(&["--sample", "-s", "cross-join"]);

    assert_eq!(code, 1);
    assert!(stdout.is_empty());
    assert!(stderr.contains("Unknown lesson step 'cross-join'"));
}

#[test]
fn test_store_error_is_reported() {
    let (code, _stdout, stderr) = run_cli(&["--sample", "-q", "SELECT * FROM nope"]);

    assert_eq!(code, 1);
    assert!(stderr.contains("Store Error"));
    assert!(stderr.contains("no such table: nope"));
}

#[test]
fn test_no_store_configured_fails() {
    let (code, _stdout, stderr) = run_cli(&["-s", "left-join"]);

    assert_eq!(code, 1);
    assert!(stderr.contains("No database configured"));
}

#[test]
fn test_seed_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let seed = dir.path().join("seed.sql");
    std::fs::write(
        &seed,
        "CREATE TABLE a (id INTEGER PRIMARY KEY); INSERT INTO a VALUES (1), (2);",
    )
    .unwrap();

    let (code, stdout, stderr) = run_cli(&[
        "--seed",
        seed.to_str().unwrap(),
        "-q",
        "SELECT * FROM a",
    ]);

    assert_eq!(code, 0, "stderr: {stderr}");
    assert!(stdout.contains("2 rows returned"));
}

#[test]
fn test_log_file_keeps_stderr_for_errors() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("logs").join("crm-joins.log");

    let (code, _stdout, stderr) = run_cli(&[
        "--sample",
        "--log-file",
        log.to_str().unwrap(),
        "-s",
        "nope",
    ]);

    assert_eq!(code, 1);
    assert!(log.exists());
    assert!(stderr.contains("Lesson Error"));
}

#[test]
fn test_errors_reach_stderr_with_logging_off() {
    let (code, _stdout, stderr) =
        run_cli_with_log_filter(&["--sample", "-q", "SELECT * FROM nope"], "off");

    assert_eq!(code, 1);
    assert_eq!(stderr.matches("no such table: nope").count(), 1);
    assert!(stderr.starts_with("Store Error: "));
}

#[test]
fn test_several_statements_fail() {
    let (code, stdout, stderr) = run_cli(&["--sample", "-q", "SELECT 1; SELECT 2"]);

    assert_eq!(code, 1);
    assert!(stdout.is_empty());
    assert!(stderr.contains("single SQL statement"));
}
