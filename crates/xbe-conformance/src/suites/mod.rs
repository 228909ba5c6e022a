// crates/xbe-conformance/src/suites/mod.rs
// ============================================================================
// Module: Conformance Suites
// Description: Per-resource suites plus the steps they share.
// Purpose: Keep each suite a flat, readable sequence of harness calls.
// Dependencies: xbe-harness
// ============================================================================

//! ## Overview
//! Suites create what they need, exercise `create`/`show`/`update`/`list`/
//! `delete`, and register every created resource for teardown. Permission
//! and validation refusals from the server mean the environment cannot run
//! a check; they are recorded as skips rather than failures.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod broker_retainers;
pub mod brokers;
pub mod customers;
pub mod project_revenue_items;
pub mod read_only;
pub mod truckers;

// ============================================================================
// SECTION: Imports
// ============================================================================

use xbe_harness::FixtureKind;
use xbe_harness::FixturePlan;
use xbe_harness::HarnessError;
use xbe_harness::RejectionPolicy;
use xbe_harness::Session;

// ============================================================================
// SECTION: Shared Steps
// ============================================================================

/// Address accepted by the backend's geocoder for fixture truckers.
pub(crate) const FIXTURE_ADDRESS: &str = "1 N State St, Chicago, IL 60602";

/// ID the backend will never assign, for not-found checks.
pub(crate) const MISSING_ID: &str = "999999999";

/// Runs `xbe do <resource> create <args> --json` and registers the result.
///
/// Records `pass` and returns the ID on success. Refusals are judged with
/// [`RejectionPolicy::skip_unavailable`].
pub(crate) async fn create_resource(
    session: &mut Session,
    resource: &str,
    args: &[&str],
) -> Result<Option<String>, HarnessError> {
    let mut command = vec!["do", resource, "create"];
    command.extend_from_slice(args);
    session.xbe_json(&command).await?;
    let label = format!("create {resource}");
    if !session.succeeded() {
        session.accept_outcome(&RejectionPolicy::skip_unavailable(), &label);
        return Ok(None);
    }
    let Some(id) = session.json_id(".id")? else {
        session.fail(&format!("{label}: response has no usable .id"));
        return Ok(None);
    };
    session.register_cleanup(resource, &id);
    session.pass();
    Ok(Some(id))
}

/// Shows `id` and checks `.id` plus each `(filter, expected)` pair.
pub(crate) async fn show_matches(
    session: &mut Session,
    resource: &str,
    id: &str,
    checks: &[(&str, &str)],
) -> Result<bool, HarnessError> {
    session.xbe_json(&["view", resource, "show", id]).await?;
    if !session.assert_success() {
        return Ok(false);
    }
    let mut ok = session.assert_json_equals(".id", id);
    for (filter, expected) in checks {
        ok &= session.assert_json_equals(filter, expected);
    }
    Ok(ok)
}

/// Runs `xbe do <resource> update <id> <args> --json`.
///
/// Returns true on success; refusals are judged like creates.
pub(crate) async fn update_resource(
    session: &mut Session,
    resource: &str,
    id: &str,
    args: &[&str],
) -> Result<bool, HarnessError> {
    let mut command = vec!["do", resource, "update", id];
    command.extend_from_slice(args);
    session.xbe_json(&command).await?;
    if session.succeeded() {
        return Ok(true);
    }
    session.accept_outcome(&RejectionPolicy::skip_unavailable(), &format!("update {resource}"));
    Ok(false)
}

/// Checks `list --limit N` returns an array of at most N rows.
pub(crate) async fn check_list_limit(
    session: &mut Session,
    resource: &str,
    limit: usize,
    filters: &[&str],
) -> Result<(), HarnessError> {
    let limit_text = limit.to_string();
    let mut command = vec!["view", resource, "list", "--limit", limit_text.as_str()];
    command.extend_from_slice(filters);
    session.xbe_json(&command).await?;
    if session.assert_success()
        && session.assert_json_is_array()
        && session.assert_array_len_at_most(limit)
    {
        session.pass();
    }
    Ok(())
}

/// Checks `list --offset` is accepted and still returns an array.
pub(crate) async fn check_list_offset(
    session: &mut Session,
    resource: &str,
) -> Result<(), HarnessError> {
    session.xbe_json(&["view", resource, "list", "--limit", "2", "--offset", "1"]).await?;
    if session.assert_success() && session.assert_json_is_array() {
        session.pass();
    }
    Ok(())
}

/// Resolves a broker: create one, else `XBE_TEST_BROKER_ID`, else borrow one.
pub(crate) async fn broker_fixture(session: &mut Session) -> Result<Option<String>, HarnessError> {
    let name = session.unique_name("XBE Test Broker");
    let plan =
        FixturePlan::new(FixtureKind::Broker).provision(["--name", name.as_str()]).env().reuse();
    Ok(session.resolve_fixture(&plan).await?.map(|fixture| fixture.id))
}

/// Resolves a trucker under `broker_id`, falling back like [`broker_fixture`].
pub(crate) async fn trucker_fixture(
    session: &mut Session,
    broker_id: &str,
) -> Result<Option<String>, HarnessError> {
    let name = session.unique_name("XBE Test Trucker");
    let plan = FixturePlan::new(FixtureKind::Trucker)
        .provision([
            "--name",
            name.as_str(),
            "--broker",
            broker_id,
            "--company-address",
            FIXTURE_ADDRESS,
        ])
        .env()
        .reuse();
    Ok(session.resolve_fixture(&plan).await?.map(|fixture| fixture.id))
}
