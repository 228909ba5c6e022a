// crates/xbe-conformance/src/main_tests.rs
// ============================================================================
// Module: CLI Main Helpers Tests
// Description: Unit tests for argument parsing and report rendering.
// Purpose: Keep the command surface and the token redaction stable.
// Dependencies: clap, xbe-harness
// ============================================================================

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only panic-based assertions are permitted."
)]

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use xbe_conformance::SuiteId;
use xbe_harness::FixtureKind;
use xbe_harness::HarnessConfig;
use xbe_harness::LogFormat;

use super::Cli;
use super::Commands;
use super::FixtureAvailability;
use super::LogFormatArg;
use super::render_env_report;
use super::render_suite_list;

fn sample_config(token: Option<&str>) -> HarnessConfig {
    HarnessConfig {
        xbe_command: vec!["go".to_string(), "run".to_string(), "./cmd/xbe".to_string()],
        base_url: "http://localhost:3000".to_string(),
        token: token.map(str::to_string),
        timeout: Duration::from_secs(30),
        run_root: Some(PathBuf::from("/tmp/xbe-run")),
        keep_fixtures: true,
        log_filter: "info".to_string(),
        log_format: LogFormat::Json,
        config_path: None,
        fixtures: BTreeMap::new(),
    }
}

#[test]
fn run_accepts_repeated_suites_and_fail_fast() {
    let cli = Cli::try_parse_from([
        "xbe-conformance",
        "run",
        "--suite",
        "truckers",
        "--suite",
        "time-cards",
        "--fail-fast",
    ])
    .expect("parse");
    let Commands::Run(command) = cli.command else {
        panic!("expected run");
    };
    assert_eq!(command.suites, vec![SuiteId::Truckers, SuiteId::TimeCards]);
    assert!(command.fail_fast);
}

#[test]
fn global_flags_follow_the_subcommand() {
    let cli = Cli::try_parse_from([
        "xbe-conformance",
        "check-env",
        "--xbe-bin",
        "go run ./cmd/xbe",
        "--base-url",
        "http://localhost:3000",
        "--log-format",
        "json",
    ])
    .expect("parse");
    assert!(matches!(cli.command, Commands::CheckEnv));
    assert_eq!(cli.xbe_bin.as_deref(), Some("go run ./cmd/xbe"));
    assert_eq!(cli.base_url.as_deref(), Some("http://localhost:3000"));
    assert_eq!(cli.log_format, Some(LogFormatArg::Json));
    assert_eq!(LogFormat::from(LogFormatArg::Json), LogFormat::Json);
}

#[test]
fn unknown_suite_is_rejected() {
    assert!(Cli::try_parse_from(["xbe-conformance", "run", "--suite", "nope"]).is_err());
}

#[test]
fn suite_list_has_one_line_per_suite() {
    let rendered = render_suite_list();
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines.len(), SuiteId::ALL.len());
    for (line, id) in lines.iter().zip(SuiteId::ALL) {
        assert!(line.starts_with(id.name()));
        assert!(line.ends_with(id.description()));
    }
}

#[test]
fn env_report_redacts_the_token() {
    let config = sample_config(Some("secret-token-value"));
    let fixtures = vec![
        (FixtureKind::Broker, FixtureAvailability::Set("42".to_string())),
        (FixtureKind::Trucker, FixtureAvailability::Unset),
        (FixtureKind::Project, FixtureAvailability::Invalid("bad".to_string())),
    ];
    let rendered = render_env_report(&config, &fixtures);
    assert!(!rendered.contains("secret-token-value"));
    assert!(rendered.contains("token: <redacted>"));
    assert!(rendered.contains("xbe_command: go run ./cmd/xbe"));
    assert!(rendered.contains("timeout_sec: 30"));
    assert!(rendered.contains("log_format: json"));
    assert!(rendered.contains("config_path: (none)"));
    assert!(rendered.contains("  XBE_TEST_BROKER_ID: set (42)"));
    assert!(rendered.contains("  XBE_TEST_TRUCKER_ID: unset"));
    assert!(rendered.contains("  XBE_TEST_PROJECT_ID: invalid: bad"));
}

#[test]
fn env_report_marks_missing_token() {
    let rendered = render_env_report(&sample_config(None), &[]);
    assert!(rendered.contains("token: (unset)"));
    assert!(rendered.ends_with("fixtures:\n"));
}
