// crates/xbe-conformance/src/suites/truckers.rs
// ============================================================================
// Module: Truckers Suite
// Description: Trucker lifecycle under a broker fixture.
// Purpose: Verify the broker requirement, note updates, and broker filtering.
// Dependencies: xbe-harness
// ============================================================================

//! ## Overview
//! Truckers need a broker and a geocodable company address. A create that
//! omits the broker must be refused; if the server accepts it anyway, the
//! stray row is still registered for teardown.

use xbe_harness::HarnessError;
use xbe_harness::Session;

use super::FIXTURE_ADDRESS;
use super::broker_fixture;
use super::check_list_limit;
use super::create_resource;
use super::show_matches;
use super::update_resource;

/// CLI resource under test.
const RESOURCE: &str = "truckers";

/// Runs the truckers suite.
///
/// # Errors
///
/// Returns [`HarnessError`] when the CLI cannot be run.
pub async fn run(session: &mut Session) -> Result<(), HarnessError> {
    session.describe("fixtures");
    let Some(broker_id) = broker_fixture(session).await? else {
        return Ok(());
    };

    session.describe("create");
    session.test_name("create without --broker fails");
    let orphan = session.unique_name("XBE Test Trucker");
    session
        .xbe_json(&[
            "do",
            RESOURCE,
            "create",
            "--name",
            orphan.as_str(),
            "--company-address",
            FIXTURE_ADDRESS,
        ])
        .await?;
    if session.assert_failure() {
        session.pass();
    } else if let Some(id) = session.json_id(".id")? {
        session.register_cleanup(RESOURCE, &id);
    }

    session.test_name("create with broker and address");
    let name = session.unique_name("XBE Test Trucker");
    let args = [
        "--name",
        name.as_str(),
        "--broker",
        broker_id.as_str(),
        "--company-address",
        FIXTURE_ADDRESS,
    ];
    let Some(trucker_id) = create_resource(session, RESOURCE, &args).await? else {
        return Ok(());
    };

    session.describe("show");
    session.test_name("show returns the created trucker");
    if show_matches(session, RESOURCE, &trucker_id, &[(".name", name.as_str())]).await? {
        session.pass();
    }

    session.describe("update");
    session.test_name("update --notes is reflected by show");
    let notes = format!("conformance notes {}", session.unique_suffix());
    let updated =
        update_resource(session, RESOURCE, &trucker_id, &["--notes", notes.as_str()]).await?;
    if updated && show_matches(session, RESOURCE, &trucker_id, &[(".notes", notes.as_str())]).await?
    {
        session.pass();
    }

    session.describe("list");
    session.test_name("list --broker returns the broker's truckers");
    check_list_limit(session, RESOURCE, 10, &["--broker", broker_id.as_str()]).await?;
    Ok(())
}
