// crates/xbe-harness/src/json_tests.rs
// ============================================================================
// Module: JSON Filter Unit Tests
// Description: Unit coverage for jq-style path compilation and evaluation.
// Purpose: Ensure suites read CLI output the way jq would.
// Dependencies: serde_json
// ============================================================================

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    reason = "Test-only assertions favor direct unwrap/expect for clarity."
)]

use serde_json::Value;
use serde_json::json;

use crate::json::JsonFilter;
use crate::json::json_get;
use crate::json::render_raw;
use crate::json::usable_id;

fn retainer() -> Value {
    json!({
        "id": "812",
        "status": "editing",
        "maximum_expected_daily_hours": 8,
        "is_active": false,
        "rate_ids": ["1", "2"],
        "attributes": { "company-name": "Acme Hauling" }
    })
}

#[test]
fn bare_keys_select_members() {
    let doc = retainer();
    assert_eq!(json_get(&doc, ".id").unwrap(), Some(json!("812")));
    assert_eq!(json_get(&doc, ".maximum_expected_daily_hours").unwrap(), Some(json!(8)));
    assert_eq!(json_get(&doc, ".is_active").unwrap(), Some(json!(false)));
}

#[test]
fn dashed_and_quoted_keys_resolve() {
    let doc = retainer();
    let expected = Some(json!("Acme Hauling"));
    assert_eq!(json_get(&doc, ".attributes.company-name").unwrap(), expected);
    assert_eq!(json_get(&doc, ".attributes.\"company-name\"").unwrap(), expected);
    assert_eq!(json_get(&doc, ".attributes[\"company-name\"]").unwrap(), expected);
}

#[test]
fn indexes_and_iteration_walk_arrays() {
    let list = json!([{ "id": "1" }, { "id": "2" }, { "id": "3" }]);
    assert_eq!(json_get(&list, ".[0].id").unwrap(), Some(json!("1")));
    assert_eq!(json_get(&list, ".[2].id").unwrap(), Some(json!("3")));
    assert_eq!(json_get(&list, ".[].id").unwrap(), Some(json!(["1", "2", "3"])));
    assert_eq!(json_get(&list, ".[7].id").unwrap(), None);
}

#[test]
fn identity_returns_whole_document() {
    let doc = retainer();
    assert_eq!(json_get(&doc, ".").unwrap(), Some(doc.clone()));
}

#[test]
fn missing_members_yield_none() {
    let doc = retainer();
    assert_eq!(json_get(&doc, ".nope").unwrap(), None);
    assert_eq!(json_get(&doc, ".attributes.nope").unwrap(), None);
}

#[test]
fn length_counts_like_jq() {
    let list = json!([{ "id": "1" }, { "id": "2" }]);
    assert_eq!(json_get(&list, ". | length").unwrap(), Some(json!(2)));
    assert_eq!(json_get(&retainer(), ".rate_ids | length").unwrap(), Some(json!(2)));
    assert_eq!(json_get(&retainer(), ".missing | length").unwrap(), Some(json!(0)));
    assert!(json_get(&retainer(), ".is_active | length").is_err());
}

#[test]
fn length_of_a_number_is_its_absolute_value() {
    let doc = json!({ "hours": 8, "delta": -3, "rate": -2.5 });
    assert_eq!(json_get(&doc, ".hours | length").unwrap(), Some(json!(8)));
    assert_eq!(json_get(&doc, ".delta | length").unwrap(), Some(json!(3)));
    assert_eq!(json_get(&doc, ".rate | length").unwrap(), Some(json!(2.5)));
    assert_eq!(render_raw(json_get(&doc, ".hours | length").unwrap().as_ref()), "8");
}

#[test]
fn raw_jsonpath_passes_through() {
    let doc = retainer();
    assert_eq!(json_get(&doc, "$.status").unwrap(), Some(json!("editing")));
}

#[test]
fn unsupported_syntax_is_rejected() {
    assert!(JsonFilter::parse("id").is_err());
    assert!(JsonFilter::parse(".[-1]").is_err());
    assert!(JsonFilter::parse(".id | keys").is_err());
    assert!(JsonFilter::parse(".a | length | length").is_err());
    assert!(JsonFilter::parse(".[0").is_err());
    assert!(JsonFilter::parse(".\"open").is_err());
}

#[test]
fn render_raw_matches_jq_r() {
    assert_eq!(render_raw(Some(&json!("text"))), "text");
    assert_eq!(render_raw(Some(&json!(8))), "8");
    assert_eq!(render_raw(Some(&json!(true))), "true");
    assert_eq!(render_raw(Some(&Value::Null)), "null");
    assert_eq!(render_raw(None), "null");
}

#[test]
fn usable_id_rejects_null_and_empty() {
    assert_eq!(usable_id(Some(&json!("42"))), Some("42".to_string()));
    assert_eq!(usable_id(Some(&json!(42))), Some("42".to_string()));
    assert_eq!(usable_id(Some(&json!("null"))), None);
    assert_eq!(usable_id(Some(&json!("  "))), None);
    assert_eq!(usable_id(Some(&Value::Null)), None);
    assert_eq!(usable_id(None), None);
}
