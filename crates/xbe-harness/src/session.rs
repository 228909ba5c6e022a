// crates/xbe-harness/src/session.rs
// ============================================================================
// Module: Suite Session
// Description: Per-suite state shared by every harness helper.
// Purpose: Expose the harness contract (`xbe_json`, `assert_*`, `pass`, ...) to suites.
// Dependencies: serde_json, tracing
// ============================================================================

//! ## Overview
//! A [`Session`] owns everything one suite touches: configuration, the CLI
//! runner, the direct API client, the reporter, the cleanup registry, and
//! the latest CLI output. Helpers that inspect output always look at the
//! most recent `xbe_run`/`xbe_json` call.
//! Invariants:
//! - Assertion helpers record `fail` on mismatch and return `false`; they
//!   never return errors.
//! - Cleanup registered through the session runs when the runner calls
//!   [`Session::run_cleanup`], regardless of how the suite ended.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;

use crate::api::ApiClient;
use crate::assert;
use crate::cleanup::CleanupReport;
use crate::cleanup::CleanupRegistry;
use crate::cleanup::CleanupVia;
use crate::cli::CliOutput;
use crate::cli::XbeCli;
use crate::config::HarnessConfig;
use crate::error::HarnessError;
use crate::fixtures;
use crate::fixtures::Fixture;
use crate::fixtures::FixturePlan;
use crate::fixtures::FixtureResolution;
use crate::json;
use crate::rejection::RejectionPolicy;
use crate::rejection::Verdict;
use crate::report::CaseRecord;
use crate::report::Reporter;
use crate::unique;

// ============================================================================
// SECTION: Session
// ============================================================================

/// Per-suite harness state.
pub struct Session {
    /// Resolved configuration.
    config: HarnessConfig,
    /// CLI runner.
    cli: XbeCli,
    /// Direct API client.
    api: ApiClient,
    /// Case recorder.
    reporter: Reporter,
    /// Deferred teardown.
    cleanup: CleanupRegistry,
    /// Most recent CLI result.
    last: Option<CliOutput>,
}

impl Session {
    /// Creates a session for `suite`.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError`] when the API client cannot be built.
    pub fn new(suite: &str, config: HarnessConfig) -> Result<Self, HarnessError> {
        let cli = XbeCli::from_config(&config);
        let api = ApiClient::from_config(&config)?;
        Ok(Self {
            config,
            cli,
            api,
            reporter: Reporter::new(suite),
            cleanup: CleanupRegistry::new(),
            last: None,
        })
    }

    /// Resolved configuration.
    #[must_use]
    pub const fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Direct API client.
    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Suite name.
    #[must_use]
    pub fn suite(&self) -> &str {
        self.reporter.suite()
    }

    // ------------------------------------------------------------------------
    // CLI
    // ------------------------------------------------------------------------

    /// Runs the CLI and stores the result (`xbe_run`).
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError`] when the CLI cannot be spawned or times out.
    pub async fn xbe_run<S: AsRef<str>>(&mut self, args: &[S]) -> Result<&CliOutput, HarnessError> {
        let output = self.cli.run(args).await?;
        Ok(self.last.insert(output))
    }

    /// Runs the CLI with `--json` and stores the result (`xbe_json`).
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError`] when the CLI cannot be spawned or times out.
    pub async fn xbe_json<S: AsRef<str>>(
        &mut self,
        args: &[S],
    ) -> Result<&CliOutput, HarnessError> {
        let output = self.cli.run_json(args).await?;
        Ok(self.last.insert(output))
    }

    /// Most recent CLI result.
    #[must_use]
    pub const fn output(&self) -> Option<&CliOutput> {
        self.last.as_ref()
    }

    /// Exit status of the most recent call, or `None` before the first call.
    #[must_use]
    pub fn status(&self) -> Option<i32> {
        self.last.as_ref().map(|output| output.status)
    }

    /// Returns true when the most recent call exited zero.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.last.as_ref().is_some_and(CliOutput::success)
    }

    /// Returns true when the most recent output contains `needle`.
    #[must_use]
    pub fn output_contains(&self, needle: &str) -> bool {
        self.last.as_ref().is_some_and(|output| output.combined().contains(needle))
    }

    // ------------------------------------------------------------------------
    // JSON
    // ------------------------------------------------------------------------

    /// Applies a filter to the latest stdout (`json_get`).
    ///
    /// Output that is not JSON selects nothing.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Filter`] when the filter is invalid.
    pub fn json_get(&self, filter: &str) -> Result<Option<Value>, HarnessError> {
        match self.document() {
            Some(document) => json::json_get(&document, filter),
            None => Ok(None),
        }
    }

    /// Applies a filter and renders it like `jq -r`.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Filter`] when the filter is invalid.
    pub fn json_get_string(&self, filter: &str) -> Result<String, HarnessError> {
        Ok(json::render_raw(self.json_get(filter)?.as_ref()))
    }

    /// Applies a filter and keeps the result only when it is a usable ID.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Filter`] when the filter is invalid.
    pub fn json_id(&self, filter: &str) -> Result<Option<String>, HarnessError> {
        Ok(json::usable_id(self.json_get(filter)?.as_ref()))
    }

    /// Parses the latest stdout, if any.
    fn document(&self) -> Option<Value> {
        self.last.as_ref().and_then(|output| output.json().ok())
    }

    // ------------------------------------------------------------------------
    // Assertions
    // ------------------------------------------------------------------------

    /// Records a failure unless the latest call exited zero.
    pub fn assert_success(&mut self) -> bool {
        let result = self.with_output(assert::expect_success);
        self.check(result)
    }

    /// Records a failure unless the latest call exited non-zero.
    pub fn assert_failure(&mut self) -> bool {
        let result = self.with_output(assert::expect_failure);
        self.check(result)
    }

    /// Records a failure unless stdout is a JSON array.
    pub fn assert_json_is_array(&mut self) -> bool {
        let result = self.with_document(assert::expect_json_array);
        self.check(result)
    }

    /// Records a failure unless `filter` selects a non-null value.
    pub fn assert_json_has(&mut self, filter: &str) -> bool {
        let result = self.with_document(|document| assert::expect_json_has(document, filter));
        self.check(result)
    }

    /// Records a failure unless `filter` renders as `expected`.
    pub fn assert_json_equals(&mut self, filter: &str, expected: &str) -> bool {
        let result =
            self.with_document(|document| assert::expect_json_equals(document, filter, expected));
        self.check(result)
    }

    /// Records a failure unless `filter` selects the boolean `expected`.
    pub fn assert_json_bool(&mut self, filter: &str, expected: bool) -> bool {
        let result =
            self.with_document(|document| assert::expect_json_bool(document, filter, expected));
        self.check(result)
    }

    /// Records a failure unless stdout is an array with at most `limit` rows.
    pub fn assert_array_len_at_most(&mut self, limit: usize) -> bool {
        let result =
            self.with_document(|document| assert::expect_array_len_at_most(document, limit));
        self.check(result)
    }

    /// Runs a check against the latest output.
    fn with_output(
        &self,
        check: impl FnOnce(&CliOutput) -> Result<(), String>,
    ) -> Result<(), String> {
        self.last.as_ref().map_or_else(|| Err("no CLI output recorded".to_string()), check)
    }

    /// Runs a check against the latest stdout parsed as JSON.
    fn with_document(
        &self,
        check: impl FnOnce(&Value) -> Result<(), String>,
    ) -> Result<(), String> {
        let output = self.last.as_ref().ok_or_else(|| "no CLI output recorded".to_string())?;
        let document = output
            .json()
            .map_err(|err| format!("stdout is not JSON ({err}); {}", output.describe()))?;
        check(&document)
    }

    /// Records a mismatch as a failure.
    fn check(&mut self, result: Result<(), String>) -> bool {
        match result {
            Ok(()) => true,
            Err(message) => {
                self.reporter.fail(&message);
                false
            }
        }
    }

    // ------------------------------------------------------------------------
    // Rejections
    // ------------------------------------------------------------------------

    /// Judges the latest call against `policy` and records the verdict.
    pub fn accept_outcome(&mut self, policy: &RejectionPolicy, label: &str) -> Verdict {
        let (succeeded, text) = match &self.last {
            Some(output) => (output.success(), output.combined()),
            None => (false, String::new()),
        };
        let context = self.last.as_ref().map(CliOutput::describe);
        self.record_verdict(policy, label, succeeded, &text, context.as_deref())
    }

    /// Judges a direct API result against `policy` and records the verdict.
    pub fn accept_api_result<T>(
        &mut self,
        policy: &RejectionPolicy,
        label: &str,
        result: &Result<T, HarnessError>,
    ) -> Verdict {
        match result {
            Ok(_) => self.record_verdict(policy, label, true, "", None),
            Err(err) => {
                let text = err.rejection_text();
                self.record_verdict(policy, label, false, &text, Some(&text))
            }
        }
    }

    /// Records pass, skip, or fail for a judged result.
    fn record_verdict(
        &mut self,
        policy: &RejectionPolicy,
        label: &str,
        succeeded: bool,
        text: &str,
        context: Option<&str>,
    ) -> Verdict {
        let verdict = policy.judge(succeeded, text);
        match &verdict {
            Verdict::Pass => self.reporter.pass(),
            Verdict::PassTolerated(kind) => {
                tracing::info!(label, rejection = kind.as_str(), "rejection accepted as pass");
                self.reporter.pass();
            }
            Verdict::Skip(kind) => {
                self.reporter.skip(&format!("{label}: server rejected ({})", kind.as_str()));
            }
            Verdict::Fail => {
                let detail = context.unwrap_or("no CLI output recorded");
                self.reporter.fail(&format!("{label}: {detail}"));
            }
        }
        verdict
    }

    // ------------------------------------------------------------------------
    // Reporting
    // ------------------------------------------------------------------------

    /// Sets the describe group (`describe`).
    pub fn describe(&mut self, text: &str) {
        self.reporter.describe(text);
    }

    /// Opens a case (`test_name`).
    pub fn test_name(&mut self, text: &str) {
        self.reporter.test_name(text);
    }

    /// Records a passing check (`pass`).
    pub fn pass(&mut self) {
        self.reporter.pass();
    }

    /// Records a failing check (`fail`).
    pub fn fail(&mut self, message: &str) {
        self.reporter.fail(message);
    }

    /// Records a skipped check (`skip`).
    pub fn skip(&mut self, message: &str) {
        self.reporter.skip(message);
    }

    /// Records a harness error as a failure of the current case.
    pub fn record_error(&mut self, err: &HarnessError) {
        tracing::error!(suite = %self.reporter.suite(), error = %err, "suite aborted");
        self.reporter.fail(&format!("harness error: {err}"));
    }

    /// Closes the open case and returns every record.
    #[must_use]
    pub fn finish(self) -> Vec<CaseRecord> {
        self.reporter.finish()
    }

    // ------------------------------------------------------------------------
    // Cleanup
    // ------------------------------------------------------------------------

    /// Queues `xbe do <resource> delete <id> --confirm` (`register_cleanup`).
    pub fn register_cleanup(&mut self, resource: &str, id: &str) {
        self.cleanup.register(resource, id, CleanupVia::Cli);
    }

    /// Queues `DELETE /v1/<resource>/<id>`.
    pub fn register_api_cleanup(&mut self, resource: &str, id: &str) {
        self.cleanup.register(resource, id, CleanupVia::Api);
    }

    /// Drops a registration after the suite deleted the resource itself.
    pub fn forget_cleanup(&mut self, resource: &str, id: &str) {
        self.cleanup.forget(resource, id);
    }

    /// Tears down registered fixtures (`run_cleanup`).
    pub async fn run_cleanup(&mut self) -> CleanupReport {
        let keep = self.config.keep_fixtures;
        self.cleanup.run(&self.cli, &self.api, keep).await
    }

    // ------------------------------------------------------------------------
    // Fixtures & unique values
    // ------------------------------------------------------------------------

    /// Resolves a prerequisite, recording a skip naming the env var on a miss.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Config`] when the kind's env var is invalid.
    pub async fn resolve_fixture(
        &mut self,
        plan: &FixturePlan,
    ) -> Result<Option<Fixture>, HarnessError> {
        match fixtures::resolve(plan, &self.cli, &self.config, &mut self.cleanup).await? {
            FixtureResolution::Resolved(fixture) => Ok(Some(fixture)),
            FixtureResolution::Unresolved {
                reasons,
            } => {
                self.reporter.skip(&format!(
                    "no {} fixture; set {} ({})",
                    plan.kind,
                    plan.kind.env_var(),
                    reasons.join("; ")
                ));
                Ok(None)
            }
        }
    }

    /// `unique_suffix`.
    #[must_use]
    pub fn unique_suffix(&self) -> String {
        unique::unique_suffix()
    }

    /// `unique_name`.
    #[must_use]
    pub fn unique_name(&self, prefix: &str) -> String {
        unique::unique_name(prefix)
    }

    /// `unique_email`.
    #[must_use]
    pub fn unique_email(&self, prefix: &str) -> String {
        unique::unique_email(prefix)
    }

    /// `unique_mobile`.
    #[must_use]
    pub fn unique_mobile(&self) -> String {
        unique::unique_mobile()
    }
}
