// crates/xbe-harness/src/report_tests.rs
// ============================================================================
// Module: Reporting Unit Tests
// Description: Unit coverage for case folding, summaries, and artifacts.
// Purpose: Ensure CI exit codes reflect recorded outcomes exactly.
// Dependencies: serde_json, tempfile
// ============================================================================

//! ## Overview
//! Invariants:
//! - fail beats pass beats skip within a case.
//! - Empty cases are skipped with an explanatory message.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    reason = "Test-only assertions favor direct unwrap/expect for clarity."
)]

use serde_json::Value;

use crate::report::CaseStatus;
use crate::report::EXIT_FAILED;
use crate::report::EXIT_OK;
use crate::report::Reporter;
use crate::report::RunReport;
use crate::report::RunSummary;

#[test]
fn fail_outweighs_pass_in_one_case() {
    let mut reporter = Reporter::new("brokers");
    reporter.test_name("create broker");
    reporter.pass();
    reporter.fail("expected success");
    reporter.pass();
    let cases = reporter.finish();
    assert_eq!(cases.len(), 1);
    assert_eq!(cases[0].status, CaseStatus::Fail);
    assert_eq!(cases[0].messages, vec!["expected success".to_string()]);
}

#[test]
fn pass_outweighs_skip() {
    let mut reporter = Reporter::new("brokers");
    reporter.test_name("list");
    reporter.skip("no rows");
    reporter.pass();
    assert_eq!(reporter.finish()[0].status, CaseStatus::Pass);
}

#[test]
fn empty_case_is_skipped_with_message() {
    let mut reporter = Reporter::new("brokers");
    reporter.test_name("nothing recorded");
    reporter.test_name("second");
    reporter.pass();
    let cases = reporter.finish();
    assert_eq!(cases[0].status, CaseStatus::Skip);
    assert_eq!(cases[0].messages, vec!["no outcome recorded".to_string()]);
    assert_eq!(cases[1].status, CaseStatus::Pass);
}

#[test]
fn outcome_without_case_opens_implicit_case() {
    let mut reporter = Reporter::new("truckers");
    reporter.describe("fixtures");
    reporter.skip("set XBE_TEST_BROKER_ID");
    let cases = reporter.finish();
    assert_eq!(cases.len(), 1);
    assert_eq!(cases[0].name, "fixtures");
    assert_eq!(cases[0].group.as_deref(), Some("fixtures"));
    assert_eq!(cases[0].status, CaseStatus::Skip);

    let mut reporter = Reporter::new("truckers");
    reporter.fail("boom");
    assert_eq!(reporter.finish()[0].name, "truckers");
}

#[test]
fn describe_closes_open_case_and_tags_group() {
    let mut reporter = Reporter::new("customers");
    reporter.describe("create");
    reporter.test_name("with name");
    reporter.pass();
    assert!(!reporter.current_failed());
    reporter.describe("update");
    reporter.test_name("notes");
    reporter.fail("mismatch");
    assert!(reporter.current_failed());
    let cases = reporter.finish();
    assert_eq!(cases[0].group.as_deref(), Some("create"));
    assert_eq!(cases[1].group.as_deref(), Some("update"));
    assert_eq!(cases[1].suite, "customers");
}

#[test]
fn summary_counts_and_exit_code() {
    let mut reporter = Reporter::new("s");
    reporter.test_name("a");
    reporter.pass();
    reporter.test_name("b");
    reporter.skip("later");
    let cases = reporter.finish();
    let summary = RunSummary::from_cases(&cases);
    assert_eq!(
        summary,
        RunSummary {
            passed: 1,
            failed: 0,
            skipped: 1,
        }
    );
    assert_eq!(summary.total(), 2);
    assert_eq!(summary.exit_code(), EXIT_OK);

    let failed = RunSummary {
        passed: 3,
        failed: 1,
        skipped: 0,
    };
    assert_eq!(failed.exit_code(), EXIT_FAILED);
}

#[test]
fn render_text_lists_cases_and_totals() {
    let mut reporter = Reporter::new("brokers");
    reporter.describe("update");
    reporter.test_name("abbreviation");
    reporter.fail("expected `.abbreviation` == `AB`, got `null`");
    let report = RunReport::new(
        vec!["brokers".to_string()],
        0,
        reporter.finish(),
        vec!["brokers 9 left behind: 500".to_string()],
    );
    let text = report.render_text();
    assert!(text.contains("brokers\n"));
    assert!(text.contains("FAIL  update / abbreviation"));
    assert!(text.contains("expected `.abbreviation`"));
    assert!(text.contains("cleanup: brokers 9 left behind"));
    assert!(text.contains("0 passed, 1 failed, 0 skipped (1 total"));
}

#[test]
fn write_artifacts_emits_summary_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut reporter = Reporter::new("invoices");
    reporter.test_name("list");
    reporter.pass();
    let report = RunReport::new(vec!["invoices".to_string()], 1, reporter.finish(), Vec::new());
    let paths = report.write_artifacts(&dir.path().join("run")).unwrap();
    assert_eq!(paths.len(), 2);

    let json: Value =
        serde_json::from_slice(&std::fs::read(&paths[0]).unwrap()).unwrap();
    assert_eq!(json["summary"]["passed"], 1);
    assert_eq!(json["cases"][0]["status"], "pass");
    assert_eq!(json["suites"][0], "invoices");

    let markdown = std::fs::read_to_string(&paths[1]).unwrap();
    assert!(markdown.starts_with("# XBE Conformance Summary"));
    assert!(markdown.contains("- Passed: 1"));
    assert!(markdown.contains("## Failures\n\n- None"));
}
