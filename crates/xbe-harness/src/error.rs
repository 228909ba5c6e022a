// crates/xbe-harness/src/error.rs
// ============================================================================
// Module: Harness Errors
// Description: Error taxonomy for harness infrastructure failures.
// Purpose: Separate broken plumbing from assertion mismatches.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! [`HarnessError`] covers failures of the harness itself: bad configuration,
//! a CLI that cannot be spawned or times out, transport errors, and API
//! rejections from direct calls. Assertion mismatches are never errors; they
//! are recorded as `fail` outcomes by the session.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Harness infrastructure failure.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Configuration could not be loaded or validated.
    #[error("configuration error: {0}")]
    Config(String),
    /// The CLI process could not be spawned.
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        /// Command that failed to start.
        command: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The CLI process exceeded its timeout and was killed.
    #[error("`{command}` timed out after {}s", timeout.as_secs())]
    Timeout {
        /// Command that timed out.
        command: String,
        /// Timeout that elapsed.
        timeout: Duration,
    },
    /// Local I/O failure (artifacts, config files).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// HTTP transport failure on a direct API call.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    /// The API answered with a non-success status.
    #[error("api returned {status}: {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, kept verbatim for rejection matching.
        body: String,
    },
    /// A JSON document could not be parsed or serialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    /// A JSON filter expression was invalid.
    #[error("invalid json filter `{filter}`: {reason}")]
    Filter {
        /// Filter expression as written by the suite.
        filter: String,
        /// Why the filter was rejected.
        reason: String,
    },
}

impl HarnessError {
    /// Returns text suitable for rejection classification.
    ///
    /// API errors expose the status code and body so substring policies such
    /// as `"422"` or `"Record Invalid"` can match them.
    #[must_use]
    pub fn rejection_text(&self) -> String {
        match self {
            Self::Api {
                status,
                body,
            } => format!("{status} {body}"),
            other => other.to_string(),
        }
    }
}

/// Harness result alias.
pub type HarnessResult<T> = Result<T, HarnessError>;
