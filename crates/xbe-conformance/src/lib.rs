// crates/xbe-conformance/src/lib.rs
// ============================================================================
// Module: XBE Conformance Library
// Description: Per-resource conformance suites and the sequential suite runner.
// Purpose: Exercise the xbe CLI against a live backend and aggregate outcomes.
// Dependencies: clap, tracing, xbe-harness
// ============================================================================

//! ## Overview
//! Each suite drives one resource through the CLI (and, where the CLI has no
//! command for it, the direct API) using a [`Session`]. The runner executes
//! suites one after another, always tears down their fixtures, and folds the
//! recorded cases into a [`RunReport`].
//! Invariants:
//! - Suites run sequentially in [`SuiteId::ALL`] order.
//! - A suite's harness error fails its current case; later suites still run.
//! - Cleanup runs after every suite, whether it returned `Ok` or `Err`.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod runner;
pub mod suites;

// ============================================================================
// SECTION: Imports
// ============================================================================

use clap::ValueEnum;
use xbe_harness::HarnessError;
use xbe_harness::Session;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use runner::RunOptions;
pub use runner::run_suites;
pub use xbe_harness::RunReport;

// ============================================================================
// SECTION: Suite Registry
// ============================================================================

/// Conformance suites, in run order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum SuiteId {
    /// Broker create/show/update/list.
    Brokers,
    /// Trucker lifecycle under a broker fixture.
    Truckers,
    /// Customer lifecycle under a broker fixture.
    Customers,
    /// Broker retainers between a broker and a trucker.
    BrokerRetainers,
    /// Project revenue items created through the direct API.
    ProjectRevenueItems,
    /// Read-only time card checks.
    TimeCards,
    /// Read-only invoice checks.
    Invoices,
    /// Read-only job production plan checks.
    JobProductionPlans,
    /// Read-only broker commitment checks.
    BrokerCommitments,
}

impl SuiteId {
    /// Every suite, in run order.
    pub const ALL: [Self; 9] = [
        Self::Brokers,
        Self::Truckers,
        Self::Customers,
        Self::BrokerRetainers,
        Self::ProjectRevenueItems,
        Self::TimeCards,
        Self::Invoices,
        Self::JobProductionPlans,
        Self::BrokerCommitments,
    ];

    /// Suite name as used on the command line and in reports.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Brokers => "brokers",
            Self::Truckers => "truckers",
            Self::Customers => "customers",
            Self::BrokerRetainers => "broker-retainers",
            Self::ProjectRevenueItems => "project-revenue-items",
            Self::TimeCards => "time-cards",
            Self::Invoices => "invoices",
            Self::JobProductionPlans => "job-production-plans",
            Self::BrokerCommitments => "broker-commitments",
        }
    }

    /// One-line description for `list`.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Brokers => "create, show, update, and page brokers",
            Self::Truckers => "create and update truckers under a broker fixture",
            Self::Customers => "create and update customers under a broker fixture",
            Self::BrokerRetainers => "retainer lifecycle including guarded delete",
            Self::ProjectRevenueItems => "API-created revenue items read back through the CLI",
            Self::TimeCards => "read-only paging, filtering, and show checks",
            Self::Invoices => "read-only paging, filtering, and show checks",
            Self::JobProductionPlans => "read-only paging, filtering, and show checks",
            Self::BrokerCommitments => "read-only paging, filtering, and show checks",
        }
    }
}

/// Runs one suite against `session`.
///
/// # Errors
///
/// Returns [`HarnessError`] when the harness itself fails (spawn, timeout,
/// configuration). Assertion mismatches are recorded in the session instead.
pub async fn run_suite(id: SuiteId, session: &mut Session) -> Result<(), HarnessError> {
    match id {
        SuiteId::Brokers => suites::brokers::run(session).await,
        SuiteId::Truckers => suites::truckers::run(session).await,
        SuiteId::Customers => suites::customers::run(session).await,
        SuiteId::BrokerRetainers => suites::broker_retainers::run(session).await,
        SuiteId::ProjectRevenueItems => suites::project_revenue_items::run(session).await,
        SuiteId::TimeCards => suites::read_only::run(session, &suites::read_only::TIME_CARDS).await,
        SuiteId::Invoices => suites::read_only::run(session, &suites::read_only::INVOICES).await,
        SuiteId::JobProductionPlans => {
            suites::read_only::run(session, &suites::read_only::JOB_PRODUCTION_PLANS).await
        }
        SuiteId::BrokerCommitments => {
            suites::read_only::run(session, &suites::read_only::BROKER_COMMITMENTS).await
        }
    }
}
