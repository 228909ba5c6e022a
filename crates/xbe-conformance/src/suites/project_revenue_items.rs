// crates/xbe-conformance/src/suites/project_revenue_items.rs
// ============================================================================
// Module: Project Revenue Items Suite
// Description: Revenue items created through the API and read through the CLI.
// Purpose: Cover a resource the CLI can view but not create.
// Dependencies: serde_json, xbe-harness
// ============================================================================

//! ## Overview
//! The CLI has no `do project-revenue-items create`, so the item is created
//! with a direct JSON:API call and torn down the same way. Its parents
//! (project, revenue classification, unit of measure) must be configured.

use serde_json::Map;
use serde_json::Value;
use xbe_harness::FixtureKind;
use xbe_harness::FixturePlan;
use xbe_harness::HarnessError;
use xbe_harness::RejectionPolicy;
use xbe_harness::ResourceIdentifier;
use xbe_harness::Session;

use super::show_matches;

/// CLI and API resource under test.
const RESOURCE: &str = "project-revenue-items";

/// Runs the project revenue items suite.
///
/// # Errors
///
/// Returns [`HarnessError`] when the CLI cannot be run.
pub async fn run(session: &mut Session) -> Result<(), HarnessError> {
    session.describe("fixtures");
    if !session.api().has_token() {
        session.skip("direct API calls need XBE_TOKEN or XBE_API_TOKEN");
        return Ok(());
    }
    let mut parents = Vec::new();
    let kinds =
        [FixtureKind::Project, FixtureKind::RevenueClassification, FixtureKind::UnitOfMeasure];
    for kind in kinds {
        match session.resolve_fixture(&FixturePlan::env_only(kind)).await? {
            Some(fixture) => parents.push(fixture),
            None => return Ok(()),
        }
    }
    let Some(project_id) = parents.first().map(|fixture| fixture.id.clone()) else {
        return Ok(());
    };

    session.describe("create");
    session.test_name("create through the API");
    let description = session.unique_name("XBE Test Revenue Item");
    let mut attributes = Map::new();
    attributes.insert("description".to_string(), Value::String(description.clone()));
    let relationships: Vec<(&str, ResourceIdentifier)> = parents
        .iter()
        .map(|fixture| (relationship_name(fixture.kind), linkage(fixture.kind, &fixture.id)))
        .collect();
    let created = session.api().create(RESOURCE, attributes, &relationships).await;
    let policy = RejectionPolicy::skip_unavailable();
    session.accept_api_result(&policy, "create revenue item", &created);
    let Ok(item) = created else {
        return Ok(());
    };
    let Some(item_id) = item.id else {
        session.fail("create revenue item: response has no id");
        return Ok(());
    };
    session.register_api_cleanup(RESOURCE, &item_id);

    session.describe("list");
    session.test_name("list --project includes the item");
    session
        .xbe_json(&["view", RESOURCE, "list", "--project", project_id.as_str(), "--limit", "100"])
        .await?;
    if session.assert_success() && session.assert_json_is_array() {
        let ids = listed_ids(session.json_get(".[].id")?);
        if ids.iter().any(|id| id == &item_id) {
            session.pass();
        } else {
            session.fail(&format!("item {item_id} missing from project {project_id} listing"));
        }
    }

    session.describe("show");
    session.test_name("show returns the description");
    if show_matches(session, RESOURCE, &item_id, &[(".description", description.as_str())]).await? {
        session.pass();
    }
    Ok(())
}

/// JSON:API relationship name for a parent kind.
const fn relationship_name(kind: FixtureKind) -> &'static str {
    match kind {
        FixtureKind::RevenueClassification => "revenue-classification",
        FixtureKind::UnitOfMeasure => "unit-of-measure",
        _ => "project",
    }
}

/// Linkage for a parent fixture.
fn linkage(kind: FixtureKind, id: &str) -> ResourceIdentifier {
    ResourceIdentifier::new(kind.resource(), id)
}

/// Flattens a `.[].id` selection into strings.
fn listed_ids(selection: Option<Value>) -> Vec<String> {
    match selection {
        Some(Value::Array(values)) => values
            .into_iter()
            .filter_map(|value| value.as_str().map(str::to_string))
            .collect(),
        Some(Value::String(id)) => vec![id],
        _ => Vec::new(),
    }
}
