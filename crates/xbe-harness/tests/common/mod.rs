// crates/xbe-harness/tests/common/mod.rs
// ============================================================================
// Module: Common Test Utilities
// Description: Shared helpers for xbe-harness integration tests.
// Purpose: Build configs and shell-script stand-ins for the xbe CLI.
// Dependencies: xbe-harness, tempfile
// ============================================================================

//! ## Overview
//! Fake CLIs are plain shell scripts run as `/bin/sh <script>`, so tests
//! never execute a freshly written file directly. Each script appends its
//! arguments to `calls.log` next to it.

#![allow(
    dead_code,
    clippy::expect_used,
    clippy::unwrap_used,
    reason = "Helpers are shared across test binaries; not every binary uses each one."
)]

use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use xbe_harness::HarnessConfig;
use xbe_harness::LogFormat;

// ============================================================================
// SECTION: Fake CLI
// ============================================================================

/// Shell stand-in for the xbe CLI.
pub struct FakeCli {
    /// Keeps the script directory alive.
    _dir: tempfile::TempDir,
    /// Script path.
    pub script: PathBuf,
    /// Invocation log path.
    pub log: PathBuf,
}

impl FakeCli {
    /// Writes a script whose body runs after the invocation is logged.
    pub fn new(body: &str) -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let script = dir.path().join("xbe.sh");
        let log = dir.path().join("calls.log");
        let contents = format!("echo \"$*\" >> '{}'\n{body}\n", log.display());
        std::fs::write(&script, contents).expect("write script");
        Self {
            _dir: dir,
            script,
            log,
        }
    }

    /// Command vector for [`HarnessConfig::xbe_command`].
    pub fn command(&self) -> Vec<String> {
        vec!["/bin/sh".to_string(), self.script.display().to_string()]
    }

    /// Logged invocations, one line per call.
    pub fn calls(&self) -> Vec<String> {
        read_lines(&self.log)
    }
}

fn read_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .map(|text| text.lines().map(str::to_string).collect())
        .unwrap_or_default()
}

// ============================================================================
// SECTION: Config
// ============================================================================

/// Config pointing at `command` and an API base URL.
pub fn config(command: Vec<String>, base_url: &str) -> HarnessConfig {
    HarnessConfig {
        xbe_command: command,
        base_url: base_url.to_string(),
        token: Some("test-token".to_string()),
        timeout: Duration::from_secs(10),
        run_root: None,
        keep_fixtures: false,
        log_filter: "warn".to_string(),
        log_format: LogFormat::Text,
        config_path: None,
        fixtures: BTreeMap::new(),
    }
}
