// crates/xbe-conformance/src/suites/customers.rs
// ============================================================================
// Module: Customers Suite
// Description: Customer lifecycle under a broker fixture.
// Purpose: Verify create, update, show, and list for customers.
// Dependencies: xbe-harness
// ============================================================================

//! ## Overview
//! Customers belong to a broker. A rename is checked with a fresh `show`
//! rather than trusting the update response.

use xbe_harness::HarnessError;
use xbe_harness::Session;

use super::broker_fixture;
use super::check_list_limit;
use super::check_list_offset;
use super::create_resource;
use super::show_matches;
use super::update_resource;

/// CLI resource under test.
const RESOURCE: &str = "customers";

/// Runs the customers suite.
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
    session.test_name("create without --name fails");
    session.xbe_json(&["do", RESOURCE, "create", "--broker", broker_id.as_str()]).await?;
    if session.assert_failure() {
        session.pass();
    } else if let Some(id) = session.json_id(".id")? {
        session.register_cleanup(RESOURCE, &id);
    }

    session.test_name("create under broker");
    let name = session.unique_name("XBE Test Customer");
    let args = ["--name", name.as_str(), "--broker", broker_id.as_str()];
    let Some(customer_id) = create_resource(session, RESOURCE, &args).await? else {
        return Ok(());
    };

    session.describe("update");
    session.test_name("update --name is reflected by show");
    let renamed = session.unique_name("XBE Renamed Customer");
    if update_resource(session, RESOURCE, &customer_id, &["--name", renamed.as_str()]).await?
        && show_matches(session, RESOURCE, &customer_id, &[(".name", renamed.as_str())]).await?
    {
        session.pass();
    }

    session.describe("list");
    session.test_name("list --limit bounds the page");
    check_list_limit(session, RESOURCE, 3, &[]).await?;

    session.test_name("list --offset returns an array");
    check_list_offset(session, RESOURCE).await?;
    Ok(())
}
