// crates/xbe-harness/src/assert_tests.rs
// ============================================================================
// Module: Assertion Unit Tests
// Description: Unit coverage for exit-status and JSON shape checks.
// Purpose: Ensure mismatch messages carry enough context to debug a run.
// Dependencies: serde_json
// ============================================================================

#![allow(clippy::unwrap_used, reason = "Test-only assertions favor direct unwrap for clarity.")]

use serde_json::json;

use crate::assert::expect_array_len_at_most;
use crate::assert::expect_failure;
use crate::assert::expect_json_array;
use crate::assert::expect_json_bool;
use crate::assert::expect_json_equals;
use crate::assert::expect_json_has;
use crate::assert::expect_success;
use crate::cli::CliOutput;

fn output(status: i32, stdout: &str, stderr: &str) -> CliOutput {
    CliOutput {
        args: vec!["view".to_string(), "brokers".to_string(), "list".to_string()],
        status,
        stdout: stdout.to_string(),
        stderr: stderr.to_string(),
    }
}

#[test]
fn exit_status_checks() {
    assert!(expect_success(&output(0, "[]", "")).is_ok());
    let err = expect_success(&output(1, "", "Error: Not Authorized")).unwrap_err();
    assert!(err.contains("xbe view brokers list exited 1"));
    assert!(err.contains("Not Authorized"));

    assert!(expect_failure(&output(2, "", "--name is required")).is_ok());
    assert!(expect_failure(&output(0, "{}", "")).is_err());
}

#[test]
fn array_shape() {
    assert!(expect_json_array(&json!([])).is_ok());
    let err = expect_json_array(&json!({"id": "1"})).unwrap_err();
    assert!(err.contains("object"));
}

#[test]
fn has_rejects_missing_and_null() {
    let doc = json!({"id": "7", "notes": null});
    assert!(expect_json_has(&doc, ".id").is_ok());
    assert!(expect_json_has(&doc, ".notes").is_err());
    assert!(expect_json_has(&doc, ".missing").is_err());
}

#[test]
fn equals_compares_raw_rendering() {
    let doc = json!({"name": "Acme", "hours": 8, "notes": null});
    assert!(expect_json_equals(&doc, ".name", "Acme").is_ok());
    assert!(expect_json_equals(&doc, ".hours", "8").is_ok());
    assert!(expect_json_equals(&doc, ".notes", "null").is_ok());
    let err = expect_json_equals(&doc, ".name", "Other").unwrap_err();
    assert!(err.contains("got `Acme`"));
}

#[test]
fn bool_accepts_json_and_string_booleans() {
    let doc = json!({"active": true, "audited": "false", "name": "x"});
    assert!(expect_json_bool(&doc, ".active", true).is_ok());
    assert!(expect_json_bool(&doc, ".audited", false).is_ok());
    assert!(expect_json_bool(&doc, ".active", false).is_err());
    assert!(expect_json_bool(&doc, ".name", true).is_err());
}

#[test]
fn len_at_most() {
    assert!(expect_array_len_at_most(&json!([1, 2]), 2).is_ok());
    assert!(expect_array_len_at_most(&json!([]), 0).is_ok());
    let err = expect_array_len_at_most(&json!([1, 2, 3]), 2).unwrap_err();
    assert!(err.contains("at most 2 rows, got 3"));
    assert!(expect_array_len_at_most(&json!({}), 5).is_err());
}

#[test]
fn invalid_filter_is_a_mismatch() {
    assert!(expect_json_has(&json!({}), ".a[-1]").is_err());
}
