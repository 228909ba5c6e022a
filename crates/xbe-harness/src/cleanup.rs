// crates/xbe-harness/src/cleanup.rs
// ============================================================================
// Module: Cleanup Registry
// Description: Deferred teardown of fixtures created during a suite.
// Purpose: Implement `register_cleanup` / `run_cleanup` without shell traps.
// Dependencies: tracing
// ============================================================================

//! ## Overview
//! Suites register every resource they create. The runner drains the
//! registry after the suite finishes, whether it returned `Ok` or `Err`.
//! Invariants:
//! - Teardown runs in reverse registration order.
//! - Teardown is best-effort: failures are collected, never propagated.
//! - Draining empties the registry, so a second run is a no-op.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::api::ApiClient;
use crate::cli::XbeCli;

// ============================================================================
// SECTION: Types
// ============================================================================

/// How a registered resource is torn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupVia {
    /// `xbe do <resource> delete <id> --confirm`.
    Cli,
    /// `DELETE /v1/<resource>/<id>`.
    Api,
}

/// One registered resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupEntry {
    /// Resource slug (e.g. `broker-retainers`).
    pub resource: String,
    /// Resource ID.
    pub id: String,
    /// Teardown path.
    pub via: CleanupVia,
}

impl CleanupEntry {
    /// Returns the CLI arguments that delete this entry.
    #[must_use]
    pub fn cli_args(&self) -> Vec<String> {
        vec![
            "do".to_string(),
            self.resource.clone(),
            "delete".to_string(),
            self.id.clone(),
            "--confirm".to_string(),
        ]
    }
}

/// Outcome of draining the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Entries deleted successfully.
    pub removed: Vec<CleanupEntry>,
    /// Entries left behind, with the reason.
    pub failed: Vec<(CleanupEntry, String)>,
    /// Entries intentionally kept.
    pub kept: Vec<CleanupEntry>,
}

impl CleanupReport {
    /// Renders one line per failed entry.
    #[must_use]
    pub fn failure_lines(&self) -> Vec<String> {
        self.failed
            .iter()
            .map(|(entry, reason)| format!("{} {} left behind: {reason}", entry.resource, entry.id))
            .collect()
    }
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Deferred teardown registry.
#[derive(Debug, Default)]
pub struct CleanupRegistry {
    /// Entries in registration order.
    entries: Vec<CleanupEntry>,
}

impl CleanupRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Registers a resource for teardown. Duplicate registrations are ignored.
    pub fn register(&mut self, resource: &str, id: &str, via: CleanupVia) {
        let entry = CleanupEntry {
            resource: resource.to_string(),
            id: id.to_string(),
            via,
        };
        if self.entries.contains(&entry) {
            return;
        }
        tracing::debug!(resource, id, "cleanup registered");
        self.entries.push(entry);
    }

    /// Drops a registration, e.g. after a suite deleted the resource itself.
    pub fn forget(&mut self, resource: &str, id: &str) {
        self.entries.retain(|entry| !(entry.resource == resource && entry.id == id));
    }

    /// Pending entries in registration order.
    #[must_use]
    pub fn pending(&self) -> &[CleanupEntry] {
        &self.entries
    }

    /// Removes and returns pending entries in teardown (reverse) order.
    pub fn drain_for_teardown(&mut self) -> Vec<CleanupEntry> {
        let mut entries = std::mem::take(&mut self.entries);
        entries.reverse();
        entries
    }

    /// Tears down every pending entry, best-effort.
    pub async fn run(&mut self, cli: &XbeCli, api: &ApiClient, keep: bool) -> CleanupReport {
        let mut report = CleanupReport::default();
        for entry in self.drain_for_teardown() {
            if keep {
                tracing::info!(resource = %entry.resource, id = %entry.id, "fixture kept");
                report.kept.push(entry);
                continue;
            }
            let result = match entry.via {
                CleanupVia::Cli => match cli.run(&entry.cli_args()).await {
                    Ok(output) if output.success() => Ok(()),
                    Ok(output) => Err(output.describe()),
                    Err(err) => Err(err.to_string()),
                },
                CleanupVia::Api => {
                    api.delete(&entry.resource, &entry.id).await.map_err(|err| err.to_string())
                }
            };
            match result {
                Ok(()) => {
                    tracing::debug!(resource = %entry.resource, id = %entry.id, "fixture removed");
                    report.removed.push(entry);
                }
                Err(reason) => {
                    tracing::warn!(
                        resource = %entry.resource,
                        id = %entry.id,
                        reason = %reason,
                        "fixture cleanup failed"
                    );
                    report.failed.push((entry, reason));
                }
            }
        }
        report
    }
}
