// crates/xbe-conformance/src/suites/brokers.rs
// ============================================================================
// Module: Brokers Suite
// Description: Create, show, update, and list brokers.
// Purpose: Verify required-field validation and update round-trips for brokers.
// Dependencies: xbe-harness
// ============================================================================

//! ## Overview
//! Brokers are the root fixture for most other suites, so this suite runs
//! first and needs no prerequisites. The abbreviation is derived from the new
//! ID to stay short and distinct.

use xbe_harness::HarnessError;
use xbe_harness::Session;

use super::check_list_limit;
use super::check_list_offset;
use super::create_resource;
use super::show_matches;
use super::update_resource;

/// CLI resource under test.
const RESOURCE: &str = "brokers";

/// Runs the brokers suite.
///
/// # Errors
///
/// Returns [`HarnessError`] when the CLI cannot be run.
pub async fn run(session: &mut Session) -> Result<(), HarnessError> {
    session.describe("create");

    session.test_name("create without --name fails");
    session.xbe_json(&["do", RESOURCE, "create"]).await?;
    if session.assert_failure() {
        session.pass();
    } else if let Some(id) = session.json_id(".id")? {
        session.register_cleanup(RESOURCE, &id);
    }

    session.test_name("create with required fields");
    let name = session.unique_name("XBE Test Broker");
    let Some(broker_id) = create_resource(session, RESOURCE, &["--name", name.as_str()]).await?
    else {
        return Ok(());
    };

    session.describe("show");
    session.test_name("show returns the created broker");
    if show_matches(session, RESOURCE, &broker_id, &[(".company_name", name.as_str())]).await? {
        session.pass();
    }

    session.describe("update");
    session.test_name("update --abbreviation is reflected by show");
    let tail: String = broker_id.chars().skip(broker_id.len().saturating_sub(4)).collect();
    let abbreviation = format!("XT{tail}");
    let updated =
        update_resource(session, RESOURCE, &broker_id, &["--abbreviation", abbreviation.as_str()])
            .await?;
    if updated
        && show_matches(session, RESOURCE, &broker_id, &[(".abbreviation", abbreviation.as_str())])
            .await?
    {
        session.pass();
    }

    session.describe("list");
    session.test_name("list --limit bounds the page");
    check_list_limit(session, RESOURCE, 2, &[]).await?;

    session.test_name("list --offset returns an array");
    check_list_offset(session, RESOURCE).await?;
    Ok(())
}
