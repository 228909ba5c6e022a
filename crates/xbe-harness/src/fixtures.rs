// crates/xbe-harness/src/fixtures.rs
// ============================================================================
// Module: Fixture Resolution
// Description: Ordered provisioning strategies for prerequisite resources.
// Purpose: Make suites runnable whether they may create, borrow, or reuse fixtures.
// Dependencies: serde_json, tracing
// ============================================================================

//! ## Overview
//! Most resources under test need a parent (a trucker needs a broker, a
//! retainer needs both). A [`FixturePlan`] lists the strategies to try for
//! one [`FixtureKind`]: create it through the CLI, read a configured ID, or
//! borrow an existing row from a list call. The first step that yields a
//! usable ID wins.
//! Invariants:
//! - Steps run in plan order and stop at the first usable ID.
//! - Only provisioned fixtures are registered for cleanup.
//! - A set-but-empty fixture variable is a configuration error, not a miss.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use crate::cleanup::CleanupRegistry;
use crate::cleanup::CleanupVia;
use crate::cli::XbeCli;
use crate::config::HarnessConfig;
use crate::error::HarnessError;
use crate::json::json_get;
use crate::json::usable_id;

// ============================================================================
// SECTION: Kinds
// ============================================================================

/// Prerequisite resource kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixtureKind {
    /// Broker (`brokers`).
    Broker,
    /// Trucker (`truckers`).
    Trucker,
    /// Customer (`customers`).
    Customer,
    /// Developer (`developers`).
    Developer,
    /// Project (`projects`).
    Project,
    /// User (`users`).
    User,
    /// Project revenue classification.
    RevenueClassification,
    /// Unit of measure.
    UnitOfMeasure,
}

impl FixtureKind {
    /// Every kind, in the order `check-env` reports them.
    pub const ALL: [Self; 8] = [
        Self::Broker,
        Self::Trucker,
        Self::Customer,
        Self::Developer,
        Self::Project,
        Self::User,
        Self::RevenueClassification,
        Self::UnitOfMeasure,
    ];

    /// Key in the config file's `[fixtures]` table.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Broker => "broker",
            Self::Trucker => "trucker",
            Self::Customer => "customer",
            Self::Developer => "developer",
            Self::Project => "project",
            Self::User => "user",
            Self::RevenueClassification => "revenue_classification",
            Self::UnitOfMeasure => "unit_of_measure",
        }
    }

    /// Environment variable holding a pre-provisioned ID.
    #[must_use]
    pub const fn env_var(self) -> &'static str {
        match self {
            Self::Broker => "XBE_TEST_BROKER_ID",
            Self::Trucker => "XBE_TEST_TRUCKER_ID",
            Self::Customer => "XBE_TEST_CUSTOMER_ID",
            Self::Developer => "XBE_TEST_DEVELOPER_ID",
            Self::Project => "XBE_TEST_PROJECT_ID",
            Self::User => "XBE_TEST_USER_ID",
            Self::RevenueClassification => "XBE_TEST_REVENUE_CLASSIFICATION_ID",
            Self::UnitOfMeasure => "XBE_TEST_UNIT_OF_MEASURE_ID",
        }
    }

    /// CLI resource name for this kind.
    #[must_use]
    pub const fn resource(self) -> &'static str {
        match self {
            Self::Broker => "brokers",
            Self::Trucker => "truckers",
            Self::Customer => "customers",
            Self::Developer => "developers",
            Self::Project => "projects",
            Self::User => "users",
            Self::RevenueClassification => "project-revenue-classifications",
            Self::UnitOfMeasure => "unit-of-measures",
        }
    }
}

impl fmt::Display for FixtureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

// ============================================================================
// SECTION: Plans
// ============================================================================

/// One resolution strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixtureStep {
    /// `xbe do <resource> create <args> --json`, then `.id`.
    Provision {
        /// CLI resource name.
        resource: String,
        /// Create flags.
        args: Vec<String>,
    },
    /// The kind's env var, then the config file's fixtures table.
    Env,
    /// `xbe view <resource> list --limit 1 --json`, then `.[0].id`.
    Reuse {
        /// CLI resource name.
        resource: String,
    },
}

/// Ordered strategies for one fixture kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixturePlan {
    /// Kind being resolved.
    pub kind: FixtureKind,
    /// Steps in the order they are tried.
    pub steps: Vec<FixtureStep>,
}

impl FixturePlan {
    /// Starts an empty plan.
    #[must_use]
    pub const fn new(kind: FixtureKind) -> Self {
        Self {
            kind,
            steps: Vec::new(),
        }
    }

    /// Plan that only reads the configured ID.
    #[must_use]
    pub fn env_only(kind: FixtureKind) -> Self {
        Self::new(kind).env()
    }

    /// Appends a create step against the kind's own resource.
    #[must_use]
    pub fn provision<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.steps.push(FixtureStep::Provision {
            resource: self.kind.resource().to_string(),
            args: args.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Appends the env lookup step.
    #[must_use]
    pub fn env(mut self) -> Self {
        self.steps.push(FixtureStep::Env);
        self
    }

    /// Appends a reuse-first-row step.
    #[must_use]
    pub fn reuse(mut self) -> Self {
        self.steps.push(FixtureStep::Reuse {
            resource: self.kind.resource().to_string(),
        });
        self
    }
}

// ============================================================================
// SECTION: Results
// ============================================================================

/// Where a fixture ID came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureSource {
    /// Created by this run; registered for cleanup.
    Provisioned,
    /// Read from the environment or config file.
    Configured,
    /// Borrowed from an existing row.
    Reused,
}

impl FixtureSource {
    /// Stable label for logs and `check-env`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Provisioned => "provisioned",
            Self::Configured => "configured",
            Self::Reused => "reused",
        }
    }
}

/// Resolved prerequisite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    /// Kind that was resolved.
    pub kind: FixtureKind,
    /// Resource ID.
    pub id: String,
    /// Step that produced the ID.
    pub source: FixtureSource,
}

/// Result of running a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixtureResolution {
    /// A step produced a usable ID.
    Resolved(Fixture),
    /// Every step failed; one reason per step.
    Unresolved {
        /// Per-step failure reasons.
        reasons: Vec<String>,
    },
}

// ============================================================================
// SECTION: Resolution
// ============================================================================

/// Runs `plan` until a step yields a usable ID.
///
/// CLI failures inside a step are recorded as reasons and the next step is
/// tried.
///
/// # Errors
///
/// Returns [`HarnessError::Config`] when the kind's env var is set but invalid.
pub async fn resolve(
    plan: &FixturePlan,
    cli: &XbeCli,
    config: &HarnessConfig,
    cleanup: &mut CleanupRegistry,
) -> Result<FixtureResolution, HarnessError> {
    let mut reasons = Vec::new();
    for step in &plan.steps {
        let (outcome, source) = match step {
            FixtureStep::Provision {
                resource,
                args,
            } => {
                let mut command = vec!["do".to_string(), resource.clone(), "create".to_string()];
                command.extend(args.iter().cloned());
                let outcome = first_id(cli, &command, ".id").await;
                if let Ok(id) = &outcome {
                    cleanup.register(resource, id, CleanupVia::Cli);
                }
                (outcome, FixtureSource::Provisioned)
            }
            FixtureStep::Env => {
                let outcome = config
                    .fixture_id(plan.kind.env_var(), plan.kind.slug())?
                    .ok_or_else(|| format!("{} is not set", plan.kind.env_var()));
                (outcome, FixtureSource::Configured)
            }
            FixtureStep::Reuse {
                resource,
            } => {
                let command = ["view", resource.as_str(), "list", "--limit", "1"];
                (first_id(cli, &command, ".[0].id").await, FixtureSource::Reused)
            }
        };
        match outcome {
            Ok(id) => {
                tracing::info!(
                    kind = %plan.kind,
                    id = %id,
                    source = source.as_str(),
                    "fixture resolved"
                );
                return Ok(FixtureResolution::Resolved(Fixture {
                    kind: plan.kind,
                    id,
                    source,
                }));
            }
            Err(reason) => {
                tracing::debug!(kind = %plan.kind, reason = %reason, "fixture step failed");
                reasons.push(reason);
            }
        }
    }
    if plan.steps.is_empty() {
        reasons.push("no resolution steps".to_string());
    }
    Ok(FixtureResolution::Unresolved {
        reasons,
    })
}

/// Runs a JSON CLI call and extracts a usable ID at `filter`.
async fn first_id<S: AsRef<str>>(
    cli: &XbeCli,
    args: &[S],
    filter: &str,
) -> Result<String, String> {
    let output = cli.run_json(args).await.map_err(|err| err.to_string())?;
    if !output.success() {
        return Err(output.describe());
    }
    let document = output.json().map_err(|err| err.to_string())?;
    let value = json_get(&document, filter).map_err(|err| err.to_string())?;
    usable_id(value.as_ref())
        .ok_or_else(|| format!("`xbe {}` returned no usable {filter}", output.args.join(" ")))
}
