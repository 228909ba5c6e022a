// crates/xbe-conformance/src/runner.rs
// ============================================================================
// Module: Suite Runner
// Description: Sequential execution of selected suites with guaranteed teardown.
// Purpose: Implement `run_tests`: aggregate case outcomes into one report.
// Dependencies: tracing, xbe-harness
// ============================================================================

//! ## Overview
//! One [`Session`] per suite. After each suite the runner records any
//! harness error against the open case, drains the cleanup registry, and
//! collects the closed cases. With `fail_fast`, the run stops after the
//! first suite that produced a failing case.

// ============================================================================
// SECTION: Imports
// ============================================================================

use xbe_harness::CaseStatus;
use xbe_harness::HarnessConfig;
use xbe_harness::HarnessError;
use xbe_harness::RunReport;
use xbe_harness::Session;
use xbe_harness::report::now_millis;

use crate::SuiteId;
use crate::run_suite;

// ============================================================================
// SECTION: Options
// ============================================================================

/// Runner options from the `run` command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Suites to run; empty means all.
    pub suites: Vec<SuiteId>,
    /// Stop after the first suite with a failing case.
    pub fail_fast: bool,
}

impl RunOptions {
    /// Selected suites in canonical order, without duplicates.
    #[must_use]
    pub fn selected(&self) -> Vec<SuiteId> {
        if self.suites.is_empty() {
            return SuiteId::ALL.to_vec();
        }
        SuiteId::ALL.into_iter().filter(|id| self.suites.contains(id)).collect()
    }
}

// ============================================================================
// SECTION: Runner
// ============================================================================

/// Runs the selected suites and returns the aggregated report.
///
/// # Errors
///
/// Returns [`HarnessError`] only when a session cannot be created; errors
/// raised inside a suite are recorded as case failures.
pub async fn run_suites(
    config: &HarnessConfig,
    options: &RunOptions,
) -> Result<RunReport, HarnessError> {
    let started_at_ms = now_millis();
    let mut suites = Vec::new();
    let mut cases = Vec::new();
    let mut cleanup_failures = Vec::new();

    for id in options.selected() {
        tracing::info!(suite = id.name(), "suite started");
        let mut session = Session::new(id.name(), config.clone())?;
        if let Err(err) = run_suite(id, &mut session).await {
            session.record_error(&err);
        }
        let cleanup = session.run_cleanup().await;
        for line in cleanup.failure_lines() {
            cleanup_failures.push(format!("{}: {line}", id.name()));
        }
        let suite_cases = session.finish();
        let failed = suite_cases.iter().any(|case| case.status == CaseStatus::Fail);
        tracing::info!(suite = id.name(), cases = suite_cases.len(), failed, "suite finished");
        suites.push(id.name().to_string());
        cases.extend(suite_cases);
        if failed && options.fail_fast {
            tracing::warn!(suite = id.name(), "stopping after failing suite");
            break;
        }
    }

    Ok(RunReport::new(suites, started_at_ms, cases, cleanup_failures))
}
