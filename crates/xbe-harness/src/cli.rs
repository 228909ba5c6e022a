// crates/xbe-harness/src/cli.rs
// ============================================================================
// Module: XBE CLI Runner
// Description: Spawns the xbe CLI and captures its output.
// Purpose: Provide the `xbe_run` / `xbe_json` primitives for suites.
// Dependencies: tokio, serde_json, tracing
// ============================================================================

//! ## Overview
//! [`XbeCli`] invokes the configured `xbe` command with the API base URL and
//! token exported to the child, captures stdout, stderr, and the exit code,
//! and kills the child when the invocation timeout elapses.
//! Invariants:
//! - Every invocation is awaited to completion before the next one starts.
//! - The token is passed through the environment and never logged.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::process::Stdio;
use std::time::Duration;
use std::time::Instant;

use serde_json::Value;
use tokio::process::Command;

use crate::config::HarnessConfig;
use crate::config::HarnessEnv;
use crate::error::HarnessError;

// ============================================================================
// SECTION: Output
// ============================================================================

/// Exit status reported when the child was terminated by a signal.
pub const SIGNAL_STATUS: i32 = -1;

/// Captured result of one CLI invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOutput {
    /// Arguments passed after the program.
    pub args: Vec<String>,
    /// Exit code, or [`SIGNAL_STATUS`] when killed by a signal.
    pub status: i32,
    /// Captured stdout (lossy UTF-8).
    pub stdout: String,
    /// Captured stderr (lossy UTF-8).
    pub stderr: String,
}

impl CliOutput {
    /// Returns true when the CLI exited with status zero.
    #[must_use]
    pub const fn success(&self) -> bool {
        self.status == 0
    }

    /// Parses stdout as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Json`] when stdout is not a JSON document.
    pub fn json(&self) -> Result<Value, HarnessError> {
        Ok(serde_json::from_str(self.stdout.trim())?)
    }

    /// Returns stdout followed by stderr, used for rejection matching.
    #[must_use]
    pub fn combined(&self) -> String {
        if self.stderr.is_empty() {
            return self.stdout.clone();
        }
        if self.stdout.is_empty() {
            return self.stderr.clone();
        }
        format!("{}\n{}", self.stdout, self.stderr)
    }

    /// Short human-readable context for failure messages.
    #[must_use]
    pub fn describe(&self) -> String {
        let text = self.combined();
        let snippet: String = text.trim().chars().take(240).collect();
        format!("xbe {} exited {}: {snippet}", self.args.join(" "), self.status)
    }
}

// ============================================================================
// SECTION: Runner
// ============================================================================

/// Runner for the external `xbe` CLI.
#[derive(Clone)]
pub struct XbeCli {
    /// Program followed by leading arguments.
    command: Vec<String>,
    /// Base URL exported as `XBE_BASE_URL`.
    base_url: String,
    /// Token exported as `XBE_TOKEN`.
    token: Option<String>,
    /// Per-invocation timeout.
    timeout: Duration,
}

impl XbeCli {
    /// Creates a runner from explicit parts.
    #[must_use]
    pub const fn new(
        command: Vec<String>,
        base_url: String,
        token: Option<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            command,
            base_url,
            token,
            timeout,
        }
    }

    /// Creates a runner from harness configuration.
    #[must_use]
    pub fn from_config(config: &HarnessConfig) -> Self {
        Self::new(
            config.xbe_command.clone(),
            config.base_url.clone(),
            config.token.clone(),
            config.timeout,
        )
    }

    /// Returns the program and leading arguments.
    #[must_use]
    pub fn command(&self) -> &[String] {
        &self.command
    }

    /// Runs the CLI with `args`.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Spawn`] when the program cannot start and
    /// [`HarnessError::Timeout`] when it outlives the configured timeout.
    /// A non-zero exit is not an error; inspect [`CliOutput::status`].
    pub async fn run<S: AsRef<str>>(&self, args: &[S]) -> Result<CliOutput, HarnessError> {
        let args: Vec<String> = args.iter().map(|arg| arg.as_ref().to_string()).collect();
        let (program, leading) = self
            .command
            .split_first()
            .ok_or_else(|| HarnessError::Config("xbe command is empty".to_string()))?;
        let label = format!("{} {}", self.command.join(" "), args.join(" "));

        let mut command = Command::new(program);
        command
            .args(leading)
            .args(&args)
            .env(HarnessEnv::BaseUrl.as_str(), &self.base_url)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(token) = &self.token {
            command.env(HarnessEnv::Token.as_str(), token);
        }

        let started = Instant::now();
        let child = command.spawn().map_err(|source| HarnessError::Spawn {
            command: label.clone(),
            source,
        })?;
        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|source| HarnessError::Spawn {
                command: label.clone(),
                source,
            })?,
            Err(_) => {
                tracing::warn!(
                    command = %label,
                    timeout_secs = self.timeout.as_secs(),
                    "xbe timed out"
                );
                return Err(HarnessError::Timeout {
                    command: label,
                    timeout: self.timeout,
                });
            }
        };

        let status = output.status.code().unwrap_or(SIGNAL_STATUS);
        tracing::debug!(
            command = %label,
            status,
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "xbe finished"
        );
        Ok(CliOutput {
            args,
            status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    /// Runs the CLI with `--json` appended to `args`.
    ///
    /// # Errors
    ///
    /// Same as [`XbeCli::run`].
    pub async fn run_json<S: AsRef<str>>(&self, args: &[S]) -> Result<CliOutput, HarnessError> {
        let mut with_json: Vec<String> = args.iter().map(|arg| arg.as_ref().to_string()).collect();
        with_json.push("--json".to_string());
        self.run(&with_json).await
    }
}
