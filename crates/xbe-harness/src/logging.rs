// crates/xbe-harness/src/logging.rs
// ============================================================================
// Module: Harness Logging
// Description: Tracing subscriber setup for conformance runs.
// Purpose: Emit structured diagnostics on stderr, leaving stdout to the report.
// Dependencies: tracing, tracing-subscriber
// ============================================================================

//! ## Overview
//! The harness emits `tracing` events for CLI invocations, direct API calls,
//! fixture resolution, and cleanup. [`init`] installs a global subscriber
//! once per process; library code never installs one itself.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::IsTerminal;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::error::HarnessError;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Parses a format label (`text` or `json`, case-insensitive).
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("text") {
            Some(Self::Text)
        } else if trimmed.eq_ignore_ascii_case("json") {
            Some(Self::Json)
        } else {
            None
        }
    }

    /// Returns the stable label for the format.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
        }
    }
}

// ============================================================================
// SECTION: Initialization
// ============================================================================

/// Installs the global tracing subscriber writing to stderr.
///
/// # Errors
///
/// Returns [`HarnessError::Config`] when the filter directive is invalid or a
/// global subscriber is already installed.
pub fn init(filter: &str, format: LogFormat) -> Result<(), HarnessError> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .parse(filter)
        .map_err(|err| HarnessError::Config(format!("invalid log filter `{filter}`: {err}")))?;
    let builder = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal());
    let result = match format {
        LogFormat::Text => builder.finish().try_init(),
        LogFormat::Json => builder.json().finish().try_init(),
    };
    result.map_err(|err| HarnessError::Config(format!("logging already initialized: {err}")))
}
