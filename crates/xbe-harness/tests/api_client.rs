// crates/xbe-harness/tests/api_client.rs
// ============================================================================
// Module: API Client Tests
// Description: Integration tests for the direct JSON:API client.
// Purpose: Validate request shape, auth headers, and rejection surfacing.
// Dependencies: xbe-harness, serde_json, tiny_http, tokio
// ============================================================================

//! ## Overview
//! Each test serves canned responses from a `tiny_http` stub on a loopback
//! port and inspects what the client sent.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "Test-only assertions favor direct unwrap/expect for clarity."
)]

use std::thread::JoinHandle;
use std::time::Duration;

use serde_json::Map;
use serde_json::Value;
use serde_json::json;
use tiny_http::Header;
use tiny_http::Response;
use tiny_http::Server;
use xbe_harness::ApiClient;
use xbe_harness::HarnessError;
use xbe_harness::ResourceIdentifier;
use xbe_harness::cleanup::CleanupRegistry;
use xbe_harness::cleanup::CleanupVia;

// ============================================================================
// SECTION: Stub Server
// ============================================================================

/// Request as observed by the stub.
struct Captured {
    method: String,
    url: String,
    accept: Option<String>,
    content_type: Option<String>,
    authorization: Option<String>,
    body: String,
}

/// Serves one canned `(status, body)` per expected request.
fn serve(responses: Vec<(u16, String)>) -> (String, JoinHandle<Vec<Captured>>) {
    let server = Server::http("127.0.0.1:0").expect("http server");
    let addr = server.server_addr().to_ip().expect("ip listener");
    let handle = std::thread::spawn(move || {
        let mut captured = Vec::new();
        for (status, body) in responses {
            let Ok(mut request) = server.recv() else {
                break;
            };
            let header = |name: &'static str| {
                request
                    .headers()
                    .iter()
                    .find(|header| header.field.equiv(name))
                    .map(|header| header.value.as_str().to_string())
            };
            let accept = header("Accept");
            let content_type = header("Content-Type");
            let authorization = header("Authorization");
            let mut text = String::new();
            request.as_reader().read_to_string(&mut text).expect("read body");
            captured.push(Captured {
                method: request.method().as_str().to_string(),
                url: request.url().to_string(),
                accept,
                content_type,
                authorization,
                body: text,
            });
            let response = Response::from_string(body).with_status_code(status).with_header(
                Header::from_bytes("Content-Type", "application/vnd.api+json").unwrap(),
            );
            request.respond(response).expect("respond");
        }
        captured
    });
    (format!("http://{addr}"), handle)
}

fn client(base_url: &str) -> ApiClient {
    ApiClient::new(base_url, Some("api-token".to_string()), Duration::from_secs(5))
        .expect("client")
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[tokio::test]
async fn create_posts_json_api_document() {
    let reply = json!({
        "data": {
            "type": "project-revenue-items",
            "id": "55",
            "attributes": {"description": "Haul"},
            "relationships": {"project": {"data": {"type": "projects", "id": "9"}}}
        }
    });
    let (base_url, handle) = serve(vec![(201, reply.to_string())]);
    let api = client(&base_url);

    let mut attributes = Map::new();
    attributes.insert("description".to_string(), json!("Haul"));
    let created = api
        .create(
            "project-revenue-items",
            attributes,
            &[("project", ResourceIdentifier::new("projects", "9"))],
        )
        .await
        .expect("create");
    assert_eq!(created.id.as_deref(), Some("55"));
    assert_eq!(created.attribute("description"), Some(&json!("Haul")));
    assert_eq!(created.related_id("project"), Some("9"));

    let captured = handle.join().expect("server thread");
    let request = &captured[0];
    assert_eq!(request.method, "POST");
    assert_eq!(request.url, "/v1/project-revenue-items");
    assert_eq!(request.accept.as_deref(), Some("application/vnd.api+json"));
    assert_eq!(request.content_type.as_deref(), Some("application/vnd.api+json"));
    assert_eq!(request.authorization.as_deref(), Some("Bearer api-token"));
    let sent: Value = serde_json::from_str(&request.body).expect("request json");
    assert_eq!(sent["data"]["type"], "project-revenue-items");
    assert_eq!(sent["data"]["attributes"]["description"], "Haul");
    assert_eq!(sent["data"]["relationships"]["project"]["data"]["id"], "9");
    assert!(sent["data"].get("id").is_none());
}

#[tokio::test]
async fn list_encodes_query_and_parses_rows() {
    let reply = json!({
        "data": [
            {"type": "brokers", "id": "1", "attributes": {"company-name": "A"}},
            {"type": "brokers", "id": "2", "attributes": {}}
        ]
    });
    let (base_url, handle) = serve(vec![(200, reply.to_string())]);
    let rows = client(&base_url)
        .list("brokers", &[("page[limit]", "2"), ("filter[q]", "a b")])
        .await
        .expect("list");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].id.as_deref(), Some("2"));
    let captured = handle.join().expect("server thread");
    assert_eq!(captured[0].method, "GET");
    assert!(captured[0].url.starts_with("/v1/brokers?"));
    assert!(captured[0].url.contains("filter%5Bq%5D=a+b"));
}

#[tokio::test]
async fn rejection_keeps_status_and_body() {
    let body = json!({"errors": [{"title": "Record Invalid"}]}).to_string();
    let (base_url, handle) = serve(vec![(422, body)]);
    let err = client(&base_url).show("brokers", "1").await.unwrap_err();
    match &err {
        HarnessError::Api {
            status,
            body,
        } => {
            assert_eq!(*status, 422);
            assert!(body.contains("Record Invalid"));
        }
        other => panic!("expected api error, got {other}"),
    }
    assert!(err.rejection_text().starts_with("422 "));
    handle.join().expect("server thread");
}

#[tokio::test]
async fn delete_accepts_empty_body() {
    let (base_url, handle) = serve(vec![(204, String::new())]);
    client(&base_url).delete("broker-retainers", "77").await.expect("delete");
    let captured = handle.join().expect("server thread");
    assert_eq!(captured[0].method, "DELETE");
    assert_eq!(captured[0].url, "/v1/broker-retainers/77");
}

#[tokio::test]
async fn invalid_paths_are_rejected_before_sending() {
    let api = client("http://127.0.0.1:9");
    assert!(matches!(api.show("Brokers", "1").await, Err(HarnessError::Config(_))));
    assert!(matches!(api.delete("brokers", "../admin").await, Err(HarnessError::Config(_))));
}

#[tokio::test]
async fn api_cleanup_runs_in_reverse_and_collects_failures() {
    let (base_url, handle) =
        serve(vec![(204, String::new()), (404, "{\"errors\":[]}".to_string())]);
    let api = client(&base_url);
    let cli = xbe_harness::XbeCli::new(
        vec!["/bin/false".to_string()],
        base_url.clone(),
        None,
        Duration::from_secs(5),
    );
    let mut registry = CleanupRegistry::new();
    registry.register("project-revenue-items", "1", CleanupVia::Api);
    registry.register("project-revenue-items", "2", CleanupVia::Api);
    registry.register("project-revenue-items", "2", CleanupVia::Api);

    let report = registry.run(&cli, &api, false).await;
    assert_eq!(report.removed.len(), 1);
    assert_eq!(report.removed[0].id, "2");
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0.id, "1");
    assert!(report.failure_lines()[0].contains("project-revenue-items 1 left behind"));
    assert!(registry.pending().is_empty());

    let captured = handle.join().expect("server thread");
    assert_eq!(captured[0].url, "/v1/project-revenue-items/2");
    assert_eq!(captured[1].url, "/v1/project-revenue-items/1");
}
