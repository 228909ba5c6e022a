// crates/xbe-harness/src/lib.rs
// ============================================================================
// Module: XBE Harness Library
// Description: Typed conformance harness for the xbe CLI and its JSON:API backend.
// Purpose: Drive the CLI, inspect its output, and report outcomes for suites.
// Dependencies: jsonpath_lib, reqwest, serde, tokio, toml, tracing
// ============================================================================

//! ## Overview
//! `xbe-harness` is the shared toolkit behind the conformance suites. A
//! [`Session`] runs the external `xbe` CLI, evaluates jq-style filters over
//! its JSON output, records pass/fail/skip outcomes, resolves prerequisite
//! fixtures, and tears down what it created.
//! Invariants:
//! - The CLI and the API server are external; the harness never models
//!   resource semantics beyond the arguments a suite passes.
//! - Assertion mismatches are outcomes, not errors. [`HarnessError`] is
//!   reserved for broken plumbing.
//! - Cleanup is best-effort and never changes a suite's outcome.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod api;
pub mod assert;
pub mod cleanup;
pub mod cli;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod json;
pub mod logging;
pub mod rejection;
pub mod report;
pub mod session;
pub mod unique;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use api::ApiClient;
pub use api::ResourceIdentifier;
pub use api::ResourceObject;
pub use cleanup::CleanupReport;
pub use cli::CliOutput;
pub use cli::XbeCli;
pub use config::ConfigOverrides;
pub use config::HarnessConfig;
pub use error::HarnessError;
pub use error::HarnessResult;
pub use fixtures::Fixture;
pub use fixtures::FixtureKind;
pub use fixtures::FixturePlan;
pub use fixtures::FixtureSource;
pub use logging::LogFormat;
pub use rejection::Rejection;
pub use rejection::RejectionPolicy;
pub use rejection::Tolerance;
pub use rejection::Verdict;
pub use report::CaseRecord;
pub use report::CaseStatus;
pub use report::RunReport;
pub use report::RunSummary;
pub use session::Session;

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod assert_tests;
#[cfg(test)]
mod json_tests;
#[cfg(test)]
mod rejection_tests;
#[cfg(test)]
mod report_tests;
