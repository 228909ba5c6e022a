// crates/xbe-conformance/src/suites/broker_retainers.rs
// ============================================================================
// Module: Broker Retainers Suite
// Description: Retainer lifecycle between a broker and a trucker.
// Purpose: Verify create, show, update, list, and the guarded delete.
// Dependencies: xbe-harness
// ============================================================================

//! ## Overview
//! Deleting without `--confirm` must be refused; deleting with it must
//! succeed. A successful delete drops the cleanup registration so teardown
//! does not try twice.

use xbe_harness::HarnessError;
use xbe_harness::Session;

use super::broker_fixture;
use super::check_list_limit;
use super::create_resource;
use super::show_matches;
use super::trucker_fixture;
use super::update_resource;

/// CLI resource under test.
const RESOURCE: &str = "broker-retainers";

/// Runs the broker retainers suite.
///
/// # Errors
///
/// Returns [`HarnessError`] when the CLI cannot be run.
pub async fn run(session: &mut Session) -> Result<(), HarnessError> {
    session.describe("fixtures");
    let Some(broker_id) = broker_fixture(session).await? else {
        return Ok(());
    };
    let Some(trucker_id) = trucker_fixture(session, &broker_id).await? else {
        return Ok(());
    };

    session.describe("create");
    session.test_name("create with daily hours returns an id");
    let args = [
        "--broker",
        broker_id.as_str(),
        "--trucker",
        trucker_id.as_str(),
        "--maximum-expected-daily-hours",
        "8",
    ];
    let Some(retainer_id) = create_resource(session, RESOURCE, &args).await? else {
        return Ok(());
    };

    session.describe("show");
    session.test_name("show returns the created retainer");
    if show_matches(session, RESOURCE, &retainer_id, &[]).await?
        && session.assert_json_has(".maximum_expected_daily_hours")
    {
        session.pass();
    }

    session.describe("update");
    session.test_name("update --maximum-travel-minutes");
    if update_resource(session, RESOURCE, &retainer_id, &["--maximum-travel-minutes", "45"]).await?
    {
        session.pass();
    }

    session.describe("list");
    session.test_name("list --broker returns an array");
    check_list_limit(session, RESOURCE, 5, &["--broker", broker_id.as_str()]).await?;

    session.describe("delete");
    session.test_name("delete without --confirm fails");
    session.xbe_run(&["do", RESOURCE, "delete", retainer_id.as_str()]).await?;
    if session.assert_failure() {
        session.pass();
    }

    session.test_name("delete with --confirm succeeds");
    session.xbe_run(&["do", RESOURCE, "delete", retainer_id.as_str(), "--confirm"]).await?;
    if session.assert_success() {
        session.forget_cleanup(RESOURCE, &retainer_id);
        session.pass();
    }
    Ok(())
}
