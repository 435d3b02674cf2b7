//! Snipe-IT API client implementation.
//!
//! This module provides the HTTP client for the Snipe-IT REST API
//! (`/api/v1/...`). Every call is a single request; failures are returned
//! to the caller as-is and never retried.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, trace};

use crate::config::{CategoryType, Connection};
use crate::error::{ApiError, ConfigError, Result, SnipeError};

use super::api::InventoryApi;
use super::types::{
    Asset, Category, FieldPatch, ListResponse, Model, NewAsset, NewCategory, NewModel,
    WriteResponse, render_messages,
};

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Path prefix of the REST API below the instance base URL.
const API_PREFIX: [&str; 2] = ["api", "v1"];

/// Message Snipe-IT returns from the by-tag lookup when nothing matches.
const ASSET_NOT_FOUND: &str = "Asset does not exist.";

/// Snipe-IT API client.
#[derive(Debug, Clone)]
pub struct SnipeItClient {
    /// HTTP client.
    client: Client,
    /// Instance base URL.
    base_url: Url,
    /// API token.
    api_key: String,
}

impl SnipeItClient {
    /// Creates a new Snipe-IT API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is unusable or the HTTP client cannot
    /// be created.
    pub fn new(connection: &Connection) -> Result<Self> {
        let timeout_secs = connection.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ApiError::network(format!("Failed to create HTTP client: {e}")))?;

        let base_url = Url::parse(connection.snipe_url.trim()).map_err(|e| {
            ConfigError::validation(format!("Invalid snipe_url: {e}"), "snipe_url")
        })?;

        if base_url.cannot_be_a_base() {
            return Err(SnipeError::Config(ConfigError::validation(
                format!("snipe_url '{base_url}' cannot be used as a base URL"),
                "snipe_url",
            )));
        }

        Ok(Self {
            client,
            base_url,
            api_key: connection.api_key.clone(),
        })
    }

    /// Builds the URL of an API endpoint.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| SnipeError::internal("snipe_url cannot be a base URL"))?
            .pop_if_empty()
            .extend(API_PREFIX)
            .extend(segments);
        Ok(url)
    }

    /// Sends a request and decodes the JSON body.
    ///
    /// Non-success responses are returned only when they carry a Snipe-IT
    /// error envelope, so callers can surface the remote's own message.
    async fn send(&self, request: RequestBuilder) -> Result<serde_json::Value> {
        let response = request
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| ApiError::network(format!("Request failed: {e}")))?;

        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(SnipeError::Api(ApiError::AuthenticationFailed {
                message: format!("{status}, check api_key"),
            }));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::network(format!("Failed to read response: {e}")))?;

        let value = serde_json::from_str::<serde_json::Value>(&body);

        if !status.is_success() {
            return match value {
                Ok(v) if is_error_envelope(&v) => Ok(v),
                _ => Err(SnipeError::Api(ApiError::RequestFailed {
                    status: status.as_u16(),
                    message: body,
                })),
            };
        }

        value.map_err(|e| {
            SnipeError::Api(ApiError::invalid_response(format!(
                "Failed to parse response: {e}"
            )))
        })
    }

    /// Fetches a list endpoint.
    async fn list<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
        action: &str,
    ) -> Result<Vec<T>> {
        let url = self.endpoint(segments)?;
        trace!("GET {url}");

        let value = self.send(self.client.get(url).query(query)).await?;

        if is_error_envelope(&value) {
            return Err(SnipeError::Api(ApiError::validation(
                action,
                envelope_messages(&value),
            )));
        }

        let list: ListResponse<T> = serde_json::from_value(value).map_err(|e| {
            ApiError::invalid_response(format!("Unexpected list response while {action}: {e}"))
        })?;

        debug!("{action}: server reported {} match(es)", list.total);
        Ok(list.rows)
    }

    /// Sends a write request and checks the response envelope.
    async fn write(&self, request: RequestBuilder, action: &str) -> Result<WriteResponse> {
        let value = self.send(request).await?;

        let response: WriteResponse = serde_json::from_value(value).map_err(|e| {
            ApiError::invalid_response(format!("Unexpected response while {action}: {e}"))
        })?;

        if !response.is_success() {
            return Err(SnipeError::Api(ApiError::validation(
                action,
                render_messages(&response.messages),
            )));
        }

        Ok(response)
    }

    async fn create<B: Serialize + Sync + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
        action: &str,
    ) -> Result<u64> {
        let url = self.endpoint(segments)?;
        trace!("POST {url}");

        let response = self.write(self.client.post(url).json(body), action).await?;

        response.payload_id().ok_or_else(|| {
            SnipeError::Api(ApiError::invalid_response(format!(
                "No id in response while {action}"
            )))
        })
    }

    async fn patch(&self, segments: &[&str], patch: &FieldPatch, action: &str) -> Result<()> {
        let url = self.endpoint(segments)?;
        trace!("PATCH {url}");

        self.write(self.client.patch(url).json(patch), action).await?;
        Ok(())
    }

    async fn delete(&self, segments: &[&str], action: &str) -> Result<()> {
        let url = self.endpoint(segments)?;
        trace!("DELETE {url}");

        self.write(self.client.delete(url), action).await?;
        Ok(())
    }
}

#[async_trait]
impl InventoryApi for SnipeItClient {
    async fn find_categories(&self, name: &str, category_type: CategoryType) -> Result<Vec<Category>> {
        self.list(
            &["categories"],
            &[("name", name), ("category_type", category_type.as_str())],
            "retrieving categories",
        )
        .await
    }

    async fn find_models(&self, name: &str) -> Result<Vec<Model>> {
        self.list(&["models"], &[("name", name)], "retrieving models")
            .await
    }

    async fn find_asset_by_tag(&self, asset_tag: &str) -> Result<Option<Asset>> {
        let url = self.endpoint(&["hardware", "bytag", asset_tag])?;
        trace!("GET {url}");

        let value = self.send(self.client.get(url)).await?;

        if value.get("asset_tag").is_some() {
            return serde_json::from_value(value).map(Some).map_err(|e| {
                SnipeError::Api(ApiError::invalid_response(format!(
                    "Unexpected asset payload: {e}"
                )))
            });
        }

        if is_error_envelope(&value) {
            if value.get("messages").and_then(serde_json::Value::as_str) == Some(ASSET_NOT_FOUND) {
                debug!("No asset tagged {asset_tag}");
                return Ok(None);
            }
            return Err(SnipeError::Api(ApiError::validation(
                "retrieving entry",
                envelope_messages(&value),
            )));
        }

        Err(SnipeError::Api(ApiError::invalid_response(
            "Unknown response from Snipe-IT",
        )))
    }

    async fn create_category(&self, request: &NewCategory) -> Result<u64> {
        self.create(&["categories"], request, "creating category").await
    }

    async fn create_model(&self, request: &NewModel) -> Result<u64> {
        self.create(&["models"], request, "creating model").await
    }

    async fn create_asset(&self, request: &NewAsset) -> Result<u64> {
        self.create(&["hardware"], request, "creating entry").await
    }

    async fn update_model(&self, id: u64, patch: &FieldPatch) -> Result<()> {
        self.patch(&["models", &id.to_string()], patch, "updating model")
            .await
    }

    async fn update_asset(&self, id: u64, patch: &FieldPatch) -> Result<()> {
        self.patch(&["hardware", &id.to_string()], patch, "updating entry")
            .await
    }

    async fn delete_category(&self, id: u64) -> Result<()> {
        self.delete(&["categories", &id.to_string()], "deleting category")
            .await
    }

    async fn delete_model(&self, id: u64) -> Result<()> {
        self.delete(&["models", &id.to_string()], "deleting model")
            .await
    }

    async fn delete_asset(&self, id: u64) -> Result<()> {
        self.delete(&["hardware", &id.to_string()], "deleting entry")
            .await
    }
}

fn is_error_envelope(value: &serde_json::Value) -> bool {
    value.get("status").and_then(serde_json::Value::as_str) == Some("error")
}

fn envelope_messages(value: &serde_json::Value) -> String {
    value
        .get("messages")
        .or_else(|| value.get("message"))
        .map_or_else(|| String::from("no message"), render_messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(base: &str) -> SnipeItClient {
        SnipeItClient::new(&Connection {
            snipe_url: base.to_string(),
            api_key: String::from("test-token"),
            timeout_secs: Some(5),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_find_categories_sends_filters_and_token() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/categories"))
            .and(query_param("name", "Servers"))
            .and(query_param("category_type", "asset"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total": 1,
                "rows": [{ "id": 4, "name": "Servers", "category_type": "Asset" }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let rows = client_for(&format!("{}/", server.uri()))
            .find_categories("Servers", CategoryType::Asset)
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, 4);
    }

    #[tokio::test]
    async fn test_base_url_with_subpath() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/snipe/api/v1/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "total": 0, "rows": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let rows = client_for(&format!("{}/snipe", server.uri()))
            .find_models("Laptop")
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_find_asset_by_tag_missing() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/hardware/bytag/example_asset001"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "error",
                "messages": "Asset does not exist.",
                "payload": null
            })))
            .mount(&server)
            .await;

        let asset = client_for(&server.uri())
            .find_asset_by_tag("example_asset001")
            .await
            .unwrap();
        assert!(asset.is_none());
    }

    #[tokio::test]
    async fn test_find_asset_by_tag_missing_with_404() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/hardware/bytag/gone"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "status": "error",
                "messages": "Asset does not exist."
            })))
            .mount(&server)
            .await;

        let asset = client_for(&server.uri()).find_asset_by_tag("gone").await.unwrap();
        assert!(asset.is_none());
    }

    #[tokio::test]
    async fn test_find_asset_by_tag_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/hardware/bytag/srv-001"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 9,
                "asset_tag": "srv-001",
                "model": { "id": 3, "name": "server" },
                "status_label": { "id": 2, "name": "Ready to Deploy" }
            })))
            .mount(&server)
            .await;

        let asset = client_for(&server.uri())
            .find_asset_by_tag("srv-001")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(asset.id, 9);
    }

    #[tokio::test]
    async fn test_find_asset_by_tag_other_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/hardware/bytag/srv-001"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "error",
                "messages": "Too many requests"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server.uri())
            .find_asset_by_tag("srv-001")
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Snipe-IT API error: Error retrieving entry: Too many requests"
        );
    }

    #[tokio::test]
    async fn test_create_category_returns_payload_id() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/categories"))
            .and(body_json(json!({ "name": "Servers", "category_type": "asset" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "messages": "Category created successfully.",
                "payload": { "id": 21, "name": "Servers" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let id = client_for(&server.uri())
            .create_category(&NewCategory {
                name: String::from("Servers"),
                category_type: CategoryType::Asset,
            })
            .await
            .unwrap();
        assert_eq!(id, 21);
    }

    #[tokio::test]
    async fn test_create_error_envelope_surfaces_messages() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "error",
                "messages": { "category_id": ["The selected category id is invalid."] },
                "payload": null
            })))
            .mount(&server)
            .await;

        let err = client_for(&server.uri())
            .create_model(&NewModel {
                name: String::from("Laptop"),
                category_id: 999,
                manufacturer_id: None,
                model_number: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, SnipeError::Api(ApiError::Validation { .. })));
        assert!(err.to_string().contains("The selected category id is invalid."));
    }

    #[tokio::test]
    async fn test_update_asset_sends_only_patch_fields() {
        let server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/api/v1/hardware/9"))
            .and(body_json(json!({ "status_id": 4 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "messages": "Asset updated successfully.",
                "payload": { "id": 9 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut patch = FieldPatch::new();
        patch.insert(String::from("status_id"), json!(4));

        client_for(&server.uri()).update_asset(9, &patch).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_model_patches_model_endpoint() {
        let server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/api/v1/models/3"))
            .and(body_json(json!({ "category_id": 7, "model_number": "X1-G9" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "messages": "Model updated successfully.",
                "payload": { "id": 3 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut patch = FieldPatch::new();
        patch.insert(String::from("category_id"), json!(7));
        patch.insert(String::from("model_number"), json!("X1-G9"));

        client_for(&server.uri()).update_model(3, &patch).await.unwrap();
    }

    #[tokio::test]
    async fn test_client_error_without_envelope_is_not_transport() {
        let server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/api/v1/hardware/404"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .mount(&server)
            .await;

        let err = client_for(&server.uri())
            .update_asset(404, &FieldPatch::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SnipeError::Api(ApiError::RequestFailed { status: 404, .. })
        ));
        assert!(!err.is_transport());
    }

    #[tokio::test]
    async fn test_escaped_names_are_unescaped() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/categories"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total": 1,
                "rows": [{ "id": 5, "name": "R&amp;D", "category_type": "Asset" }]
            })))
            .mount(&server)
            .await;

        let rows = client_for(&server.uri())
            .find_categories("R&D", CategoryType::Asset)
            .await
            .unwrap();
        assert_eq!(rows[0].name, "R&D");
    }

    #[tokio::test]
    async fn test_delete_asset() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/api/v1/hardware/9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "messages": "The asset was deleted successfully.",
                "payload": null
            })))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server.uri()).delete_asset(9).await.unwrap();
    }

    #[tokio::test]
    async fn test_unauthorized() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/models"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "status": "error",
                "message": "Unauthorized."
            })))
            .mount(&server)
            .await;

        let err = client_for(&server.uri()).find_models("Laptop").await.unwrap_err();
        assert!(matches!(err, SnipeError::Api(ApiError::AuthenticationFailed { .. })));
    }

    #[tokio::test]
    async fn test_server_error_is_request_failure() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/models"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server.uri()).find_models("Laptop").await.unwrap_err();
        assert!(matches!(
            err,
            SnipeError::Api(ApiError::RequestFailed { status: 502, .. })
        ));
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        // Nothing listens on port 9 (discard) in the test environment.
        let err = client_for("http://127.0.0.1:9").find_models("Laptop").await.unwrap_err();
        assert!(matches!(err, SnipeError::Api(ApiError::Network { .. })));
    }

    #[test]
    fn test_rejects_non_base_url() {
        let result = SnipeItClient::new(&Connection {
            snipe_url: String::from("mailto:admin@example.com"),
            api_key: String::from("t"),
            timeout_secs: None,
        });
        assert!(matches!(result, Err(SnipeError::Config(_))));
    }
}
