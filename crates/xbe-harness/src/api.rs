// crates/xbe-harness/src/api.rs
// ============================================================================
// Module: Direct JSON:API Client
// Description: Minimal JSON:API client for operations the CLI does not expose.
// Purpose: Replace the scripts' direct `curl` calls with a typed client.
// Dependencies: reqwest, serde, serde_json, tracing, url
// ============================================================================

//! ## Overview
//! [`ApiClient`] talks to `/v1/<resource>` endpoints with bearer auth and
//! `application/vnd.api+json` negotiation. It is used to create fixtures the
//! CLI cannot create and to tear down resources the CLI cannot delete.
//! Invariants:
//! - Non-success statuses surface as [`HarnessError::Api`] with the body kept.
//! - Resource slugs and IDs are validated before any request is built.
//! - The bearer token is never logged.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::time::Duration;
use std::time::Instant;

use reqwest::Client;
use reqwest::Method;
use reqwest::header::ACCEPT;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use url::Url;

use crate::config::HarnessConfig;
use crate::error::HarnessError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// JSON:API media type used for both `Accept` and `Content-Type`.
pub const JSON_API_MEDIA_TYPE: &str = "application/vnd.api+json";
/// API version prefix for resource paths.
const API_PREFIX: &str = "v1";

// ============================================================================
// SECTION: Document Types
// ============================================================================

/// `{ "type": ..., "id": ... }` linkage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceIdentifier {
    /// Resource type (plural slug, e.g. `projects`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Resource ID.
    pub id: String,
}

impl ResourceIdentifier {
    /// Creates a linkage.
    #[must_use]
    pub fn new(kind: &str, id: &str) -> Self {
        Self {
            kind: kind.to_string(),
            id: id.to_string(),
        }
    }
}

/// To-one relationship object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// Linked resource, or `null`.
    pub data: Option<ResourceIdentifier>,
}

/// JSON:API resource object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceObject {
    /// Resource type.
    #[serde(rename = "type")]
    pub kind: String,
    /// Server-assigned ID; absent on create requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Attribute members.
    #[serde(default)]
    pub attributes: Map<String, Value>,
    /// Relationship members, kept as raw JSON (to-one or to-many).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub relationships: BTreeMap<String, Value>,
}

impl ResourceObject {
    /// Returns an attribute by its dashed JSON:API name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Returns the linked ID of a to-one relationship.
    #[must_use]
    pub fn related_id(&self, name: &str) -> Option<&str> {
        self.relationships.get(name)?.get("data")?.get("id")?.as_str()
    }
}

/// Top-level JSON:API document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document<T> {
    /// Primary data.
    pub data: T,
    /// Sideloaded resources.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub included: Vec<ResourceObject>,
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// Direct JSON:API client.
#[derive(Clone)]
pub struct ApiClient {
    /// Base URL without trailing slash.
    base_url: String,
    /// Bearer token, when configured.
    token: Option<String>,
    /// Shared HTTP client.
    client: Client,
}

impl ApiClient {
    /// Creates a client with a request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Config`] when the base URL is invalid and
    /// [`HarnessError::Http`] when the HTTP client cannot be built.
    pub fn new(
        base_url: &str,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, HarnessError> {
        Url::parse(base_url)
            .map_err(|err| HarnessError::Config(format!("invalid api base url: {err}")))?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            client,
        })
    }

    /// Creates a client from harness configuration.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::new`].
    pub fn from_config(config: &HarnessConfig) -> Result<Self, HarnessError> {
        Self::new(&config.base_url, config.token.clone(), config.timeout)
    }

    /// Returns true when a bearer token is configured.
    #[must_use]
    pub const fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Creates a resource (`POST /v1/<resource>`).
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Api`] on rejection, or transport/JSON errors.
    pub async fn create(
        &self,
        resource: &str,
        attributes: Map<String, Value>,
        relationships: &[(&str, ResourceIdentifier)],
    ) -> Result<ResourceObject, HarnessError> {
        let relationships = relationships
            .iter()
            .map(|(name, target)| {
                let linkage = Relationship {
                    data: Some(target.clone()),
                };
                Ok(((*name).to_string(), serde_json::to_value(linkage)?))
            })
            .collect::<Result<BTreeMap<String, Value>, serde_json::Error>>()?;
        let body = Document {
            data: ResourceObject {
                kind: resource.to_string(),
                id: None,
                attributes,
                relationships,
            },
            included: Vec::new(),
        };
        let url = self.resource_url(resource, None, &[])?;
        let value = self.send(Method::POST, url, Some(serde_json::to_string(&body)?)).await?;
        let document: Document<ResourceObject> =
            serde_json::from_value(value.unwrap_or(Value::Null))?;
        Ok(document.data)
    }

    /// Fetches one resource (`GET /v1/<resource>/<id>`).
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Api`] on rejection, or transport/JSON errors.
    pub async fn show(&self, resource: &str, id: &str) -> Result<ResourceObject, HarnessError> {
        let url = self.resource_url(resource, Some(id), &[])?;
        let value = self.send(Method::GET, url, None).await?;
        let document: Document<ResourceObject> =
            serde_json::from_value(value.unwrap_or(Value::Null))?;
        Ok(document.data)
    }

    /// Lists resources (`GET /v1/<resource>?...`).
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Api`] on rejection, or transport/JSON errors.
    pub async fn list(
        &self,
        resource: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<ResourceObject>, HarnessError> {
        let url = self.resource_url(resource, None, query)?;
        let value = self.send(Method::GET, url, None).await?;
        let document: Document<Vec<ResourceObject>> =
            serde_json::from_value(value.unwrap_or(Value::Null))?;
        Ok(document.data)
    }

    /// Deletes a resource (`DELETE /v1/<resource>/<id>`).
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Api`] on rejection, or transport errors.
    pub async fn delete(&self, resource: &str, id: &str) -> Result<(), HarnessError> {
        let url = self.resource_url(resource, Some(id), &[])?;
        self.send(Method::DELETE, url, None).await?;
        Ok(())
    }

    /// Builds `<base>/v1/<resource>[/<id>][?query]`.
    fn resource_url(
        &self,
        resource: &str,
        id: Option<&str>,
        query: &[(&str, &str)],
    ) -> Result<Url, HarnessError> {
        validate_slug(resource)?;
        let mut raw = format!("{}/{API_PREFIX}/{resource}", self.base_url);
        if let Some(id) = id {
            validate_id(id)?;
            raw.push('/');
            raw.push_str(id);
        }
        let mut url = Url::parse(&raw)
            .map_err(|err| HarnessError::Config(format!("invalid resource url {raw}: {err}")))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Sends a request and returns the parsed body (`None` for empty bodies).
    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<String>,
    ) -> Result<Option<Value>, HarnessError> {
        let started = Instant::now();
        let label = format!("{method} {}", url.path());
        let mut request =
            self.client.request(method, url).header(ACCEPT, JSON_API_MEDIA_TYPE);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, JSON_API_MEDIA_TYPE).body(body);
        }
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        tracing::debug!(
            request = %label,
            status = status.as_u16(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "api call finished"
        );
        if !status.is_success() {
            return Err(HarnessError::Api {
                status: status.as_u16(),
                body: text,
            });
        }
        if text.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&text)?))
    }
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Accepts lowercase dashed resource slugs such as `project-revenue-items`.
fn validate_slug(resource: &str) -> Result<(), HarnessError> {
    let valid = !resource.is_empty()
        && resource.chars().all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-');
    if valid {
        Ok(())
    } else {
        Err(HarnessError::Config(format!("invalid resource slug `{resource}`")))
    }
}

/// Accepts IDs that cannot escape the resource path.
fn validate_id(id: &str) -> Result<(), HarnessError> {
    let valid = !id.is_empty()
        && id.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
    if valid { Ok(()) } else { Err(HarnessError::Config(format!("invalid resource id `{id}`"))) }
}
