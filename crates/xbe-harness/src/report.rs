// crates/xbe-harness/src/report.rs
// ============================================================================
// Module: Test Reporting
// Description: Case bookkeeping, run summaries, and report artifacts.
// Purpose: Implement `describe`/`test_name`/`pass`/`fail`/`skip`/`run_tests`.
// Dependencies: serde, serde_jcs, tracing
// ============================================================================

//! ## Overview
//! A [`Reporter`] tracks the cases of one suite. `test_name` opens a case and
//! closes the previous one; outcomes recorded while a case is open are folded
//! into a single status when it closes.
//! Invariants:
//! - Any `fail` makes the case FAIL; otherwise any `pass` makes it PASS;
//!   otherwise it is SKIP.
//! - A case closed with nothing recorded is SKIP ("no outcome recorded").
//! - Outcomes recorded outside a case open an implicit case named after the
//!   current describe group (or the suite).

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::error::HarnessError;

// ============================================================================
// SECTION: Case Types
// ============================================================================

/// Final status of a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    /// Every recorded check held.
    Pass,
    /// At least one check failed.
    Fail,
    /// The case could not run meaningfully.
    Skip,
}

impl CaseStatus {
    /// Returns the fixed-width label used in text reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
            Self::Skip => "SKIP",
        }
    }
}

/// Closed case record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseRecord {
    /// Suite the case belongs to.
    pub suite: String,
    /// Describe group, when one was set.
    pub group: Option<String>,
    /// Case name.
    pub name: String,
    /// Folded status.
    pub status: CaseStatus,
    /// Failure and skip messages, in recording order.
    pub messages: Vec<String>,
    /// Wall time from open to close.
    pub duration_ms: u64,
}

/// Case being recorded.
struct OpenCase {
    /// Describe group at open time.
    group: Option<String>,
    /// Case name.
    name: String,
    /// Open timestamp.
    started: Instant,
    /// Number of `pass` outcomes.
    passes: usize,
    /// Number of `fail` outcomes.
    fails: usize,
    /// Number of `skip` outcomes.
    skips: usize,
    /// Failure and skip messages.
    messages: Vec<String>,
}

// ============================================================================
// SECTION: Reporter
// ============================================================================

/// Per-suite case recorder.
pub struct Reporter {
    /// Suite name.
    suite: String,
    /// Current describe group.
    group: Option<String>,
    /// Case currently open.
    open: Option<OpenCase>,
    /// Closed cases.
    cases: Vec<CaseRecord>,
}

impl Reporter {
    /// Creates a reporter for a suite.
    #[must_use]
    pub fn new(suite: &str) -> Self {
        Self {
            suite: suite.to_string(),
            group: None,
            open: None,
            cases: Vec::new(),
        }
    }

    /// Returns the suite name.
    #[must_use]
    pub fn suite(&self) -> &str {
        &self.suite
    }

    /// Sets the describe group for subsequent cases.
    pub fn describe(&mut self, text: &str) {
        self.close();
        self.group = Some(text.to_string());
    }

    /// Opens a case, closing any open one.
    pub fn test_name(&mut self, text: &str) {
        self.close();
        self.open = Some(OpenCase {
            group: self.group.clone(),
            name: text.to_string(),
            started: Instant::now(),
            passes: 0,
            fails: 0,
            skips: 0,
            messages: Vec::new(),
        });
    }

    /// Records a passing check.
    pub fn pass(&mut self) {
        self.current().passes += 1;
    }

    /// Records a failing check.
    pub fn fail(&mut self, message: &str) {
        tracing::info!(suite = %self.suite, message, "case failed");
        let case = self.current();
        case.fails += 1;
        case.messages.push(message.to_string());
    }

    /// Records a skipped check.
    pub fn skip(&mut self, message: &str) {
        tracing::info!(suite = %self.suite, message, "case skipped");
        let case = self.current();
        case.skips += 1;
        case.messages.push(message.to_string());
    }

    /// Returns true when the open case has recorded a failure.
    #[must_use]
    pub fn current_failed(&self) -> bool {
        self.open.as_ref().is_some_and(|case| case.fails > 0)
    }

    /// Closes the open case, if any.
    pub fn close(&mut self) {
        let Some(case) = self.open.take() else {
            return;
        };
        let mut messages = case.messages;
        let status = if case.fails > 0 {
            CaseStatus::Fail
        } else if case.passes > 0 {
            CaseStatus::Pass
        } else {
            if case.skips == 0 {
                messages.push("no outcome recorded".to_string());
            }
            CaseStatus::Skip
        };
        self.cases.push(CaseRecord {
            suite: self.suite.clone(),
            group: case.group,
            name: case.name,
            status,
            messages,
            duration_ms: u64::try_from(case.started.elapsed().as_millis()).unwrap_or(u64::MAX),
        });
    }

    /// Closed cases so far.
    #[must_use]
    pub fn cases(&self) -> &[CaseRecord] {
        &self.cases
    }

    /// Closes the open case and returns every record.
    #[must_use]
    pub fn finish(mut self) -> Vec<CaseRecord> {
        self.close();
        self.cases
    }

    /// Returns the open case, opening an implicit one when needed.
    fn current(&mut self) -> &mut OpenCase {
        let name = self.group.clone().unwrap_or_else(|| self.suite.clone());
        let group = self.group.clone();
        self.open.get_or_insert_with(|| OpenCase {
            group,
            name,
            started: Instant::now(),
            passes: 0,
            fails: 0,
            skips: 0,
            messages: Vec::new(),
        })
    }
}

// ============================================================================
// SECTION: Summary
// ============================================================================

/// Exit code when every case passed or skipped.
pub const EXIT_OK: u8 = 0;
/// Exit code when at least one case failed.
pub const EXIT_FAILED: u8 = 1;
/// Exit code for configuration or startup errors.
pub const EXIT_HARNESS_ERROR: u8 = 2;

/// Aggregate counts across cases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Passing cases.
    pub passed: usize,
    /// Failing cases.
    pub failed: usize,
    /// Skipped cases.
    pub skipped: usize,
}

impl RunSummary {
    /// Counts the statuses of `cases`.
    #[must_use]
    pub fn from_cases(cases: &[CaseRecord]) -> Self {
        let mut summary = Self::default();
        for case in cases {
            match case.status {
                CaseStatus::Pass => summary.passed += 1,
                CaseStatus::Fail => summary.failed += 1,
                CaseStatus::Skip => summary.skipped += 1,
            }
        }
        summary
    }

    /// Total number of cases.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.passed + self.failed + self.skipped
    }

    /// Process exit code for CI (`run_tests`).
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        if self.failed == 0 { EXIT_OK } else { EXIT_FAILED }
    }
}

/// Complete record of one conformance run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Suites that ran, in order.
    pub suites: Vec<String>,
    /// Run start, milliseconds since the Unix epoch.
    pub started_at_ms: u64,
    /// Run end, milliseconds since the Unix epoch.
    pub ended_at_ms: u64,
    /// End minus start.
    pub duration_ms: u64,
    /// Aggregate counts.
    pub summary: RunSummary,
    /// Every case in run order.
    pub cases: Vec<CaseRecord>,
    /// Cleanup actions that did not succeed.
    pub cleanup_failures: Vec<String>,
}

impl RunReport {
    /// Builds a report, computing the summary from `cases`.
    #[must_use]
    pub fn new(
        suites: Vec<String>,
        started_at_ms: u64,
        cases: Vec<CaseRecord>,
        cleanup_failures: Vec<String>,
    ) -> Self {
        let ended_at_ms = now_millis();
        Self {
            suites,
            started_at_ms,
            ended_at_ms,
            duration_ms: ended_at_ms.saturating_sub(started_at_ms),
            summary: RunSummary::from_cases(&cases),
            cases,
            cleanup_failures,
        }
    }

    /// Renders the human-readable report printed on stdout.
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let mut current_suite: Option<&str> = None;
        for case in &self.cases {
            if current_suite != Some(case.suite.as_str()) {
                let _ = writeln!(out, "{}", case.suite);
                current_suite = Some(case.suite.as_str());
            }
            let name = match &case.group {
                Some(group) if group != &case.name => format!("{group} / {}", case.name),
                _ => case.name.clone(),
            };
            let _ = writeln!(out, "  {}  {name}", case.status.label());
            if case.status != CaseStatus::Pass {
                for message in &case.messages {
                    let _ = writeln!(out, "        {message}");
                }
            }
        }
        for failure in &self.cleanup_failures {
            let _ = writeln!(out, "  cleanup: {failure}");
        }
        let _ = writeln!(
            out,
            "\n{} passed, {} failed, {} skipped ({} total, {} ms)",
            self.summary.passed,
            self.summary.failed,
            self.summary.skipped,
            self.summary.total(),
            self.duration_ms
        );
        out
    }

    /// Writes `summary.json` (canonical JSON) and `summary.md` under `root`.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Io`] when the directory or files cannot be written.
    pub fn write_artifacts(&self, root: &Path) -> Result<Vec<PathBuf>, HarnessError> {
        fs::create_dir_all(root)?;
        let json_path = root.join("summary.json");
        let bytes = serde_jcs::to_vec(self)
            .map_err(|err| HarnessError::Io(std::io::Error::other(err.to_string())))?;
        fs::write(&json_path, bytes)?;
        let md_path = root.join("summary.md");
        fs::write(&md_path, self.render_markdown())?;
        Ok(vec![json_path, md_path])
    }

    /// Renders the markdown artifact.
    fn render_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str("# XBE Conformance Summary\n\n");
        out.push_str("## Status\n\n");
        let _ = writeln!(out, "- Suites: {}", self.suites.join(", "));
        let _ = writeln!(out, "- Passed: {}", self.summary.passed);
        let _ = writeln!(out, "- Failed: {}", self.summary.failed);
        let _ = writeln!(out, "- Skipped: {}", self.summary.skipped);
        let _ = writeln!(out, "- Duration (ms): {}", self.duration_ms);
        out.push_str("\n## Failures\n\n");
        let failures: Vec<&CaseRecord> =
            self.cases.iter().filter(|case| case.status == CaseStatus::Fail).collect();
        if failures.is_empty() {
            out.push_str("- None\n");
        } else {
            for case in failures {
                let _ = writeln!(
                    out,
                    "- {} / {}: {}",
                    case.suite,
                    case.name,
                    case.messages.join("; ")
                );
            }
        }
        out.push_str("\n## Cleanup\n\n");
        if self.cleanup_failures.is_empty() {
            out.push_str("- None\n");
        } else {
            for failure in &self.cleanup_failures {
                let _ = writeln!(out, "- {failure}");
            }
        }
        out
    }
}

/// Milliseconds since the Unix epoch.
#[must_use]
pub fn now_millis() -> u64 {
    let elapsed = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}
