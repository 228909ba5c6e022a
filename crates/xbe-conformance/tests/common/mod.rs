// crates/xbe-conformance/tests/common/mod.rs
// ============================================================================
// Module: Common Test Utilities
// Description: Shared helpers for xbe-conformance integration tests.
// Purpose: Provide scripted xbe stand-ins and ready-made configs.
// Dependencies: xbe-harness, tempfile
// ============================================================================

//! ## Overview
//! A fake CLI is a shell script run as `/bin/sh <script>`. It logs each
//! invocation to `calls.log` and may keep state files in `$STATE`, the
//! script's own directory.

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

/// Script prelude: logging, `$STATE`, and an `arg_value FLAG "$@"` helper.
const PRELUDE: &str = r#"STATE=$(dirname "$0")
echo "$*" >> "$STATE/calls.log"
arg_value() {
  flag=$1; shift
  while [ $# -gt 0 ]; do
    if [ "$1" = "$flag" ]; then echo "$2"; return; fi
    shift
  done
}
"#;

/// Scripted stand-in for the xbe CLI.
pub struct FakeCli {
    /// Keeps the script directory alive.
    dir: tempfile::TempDir,
    /// Script path.
    script: PathBuf,
}

impl FakeCli {
    /// Writes a script whose `body` runs after the prelude.
    pub fn new(body: &str) -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let script = dir.path().join("xbe.sh");
        std::fs::write(&script, format!("{PRELUDE}{body}\n")).expect("write script");
        Self {
            dir,
            script,
        }
    }

    /// Command vector for [`HarnessConfig::xbe_command`].
    pub fn command(&self) -> Vec<String> {
        vec!["/bin/sh".to_string(), self.script.display().to_string()]
    }

    /// The `$STATE` directory the script sees.
    pub fn state_dir(&self) -> &Path {
        self.dir.path()
    }

    /// Logged invocations, one line per call.
    pub fn calls(&self) -> Vec<String> {
        std::fs::read_to_string(self.dir.path().join("calls.log"))
            .map(|text| text.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }
}

/// Config running `command` with a token and an unreachable API.
pub fn config(command: Vec<String>) -> HarnessConfig {
    HarnessConfig {
        xbe_command: command,
        base_url: "http://127.0.0.1:9".to_string(),
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
