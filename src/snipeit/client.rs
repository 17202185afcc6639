//! Snipe-IT REST client.

use super::types::{ListResponse, WriteResponse};
use super::{
    ApiError, AssetPayload, AssetService, CheckoutRequest, ModelPayload, ModelUpdate, NamedRef,
    RemoteModel, RemoteRecord, SEARCH_LIMIT,
};
use crate::config::ServerConfig;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Longest error body excerpt carried in an `ApiError`.
const MAX_ERROR_BODY: usize = 200;

/// Snipe-IT API client.
///
/// Talks to `{base_url}/api/v1` with bearer authentication:
/// - Hardware via `/hardware`, `/hardware/{id}`, `/hardware/{id}/checkout|checkin`
/// - Reference data via `/manufacturers`, `/models`, `/models/{id}`
pub struct SnipeItClient {
    /// Instance root without `/api/v1`
    base_url: String,
    timeout_seconds: u64,
    client: Client,
}

impl SnipeItClient {
    /// Build a client from connection settings.
    pub fn new(config: &ServerConfig) -> Result<Self, ApiError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key.trim()))
            .map_err(|_| ApiError::Configuration("API key contains invalid characters".into()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(concat!("sniper-agent/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_seconds))
            .danger_accept_invalid_certs(!config.verify_ssl)
            .build()
            .map_err(|e| ApiError::Configuration(e.to_string()))?;

        Ok(Self {
            base_url: normalize_base_url(&config.url),
            timeout_seconds: config.timeout_seconds,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/api/v1{}", self.base_url, endpoint)
    }

    async fn send(&self, request: RequestBuilder, endpoint: &str) -> Result<Value, ApiError> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout(self.timeout_seconds)
            } else {
                ApiError::Connection(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status.as_u16(), endpoint, &body));
        }

        response.json().await.map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse {} response: {}", endpoint, e))
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let request = self.client.get(self.url(endpoint)).query(query);
        let body = self.send(request, endpoint).await?;

        // Lookups of missing records answer 200 with an error envelope.
        if body.get("status").and_then(Value::as_str) == Some("error") {
            let messages = body.get("messages").cloned().unwrap_or(Value::Null);
            return Err(ApiError::Rejected(super::types::flatten_messages(&messages)));
        }

        serde_json::from_value(body).map_err(|e| {
            ApiError::InvalidResponse(format!("Unexpected {} response: {}", endpoint, e))
        })
    }

    async fn write<B: Serialize + ?Sized>(
        &self,
        method: reqwest::Method,
        endpoint: &str,
        body: &B,
    ) -> Result<Option<u64>, ApiError> {
        let request = self.client.request(method, self.url(endpoint)).json(body);
        let body = self.send(request, endpoint).await?;
        let response: WriteResponse = serde_json::from_value(body).map_err(|e| {
            ApiError::InvalidResponse(format!("Unexpected {} response: {}", endpoint, e))
        })?;
        response.into_result()
    }

    async fn create(&self, endpoint: &str, body: &impl Serialize) -> Result<u64, ApiError> {
        self.write(reqwest::Method::POST, endpoint, body)
            .await?
            .ok_or_else(|| {
                ApiError::InvalidResponse(format!("{} response carried no record id", endpoint))
            })
    }
}

/// Strip trailing slashes and an `/api/v1` suffix so endpoints can be appended.
pub fn normalize_base_url(url: &str) -> String {
    let url = url.trim().trim_end_matches('/');
    let url = url.strip_suffix("/api/v1").unwrap_or(url);
    url.trim_end_matches('/').to_string()
}

fn status_error(status: u16, endpoint: &str, body: &str) -> ApiError {
    let message: String = body.chars().take(MAX_ERROR_BODY).collect();
    match status {
        401 => ApiError::Authentication,
        403 => ApiError::PermissionDenied(endpoint.to_string()),
        404 => ApiError::NotFound(endpoint.to_string()),
        429 => ApiError::RateLimited,
        500..=599 => ApiError::Server { status, message },
        _ => ApiError::Upstream { status, message },
    }
}

#[async_trait]
impl AssetService for SnipeItClient {
    async fn search_manufacturers(&self, query: &str) -> Result<Vec<NamedRef>, ApiError> {
        let params = [("search", query.to_string()), ("limit", SEARCH_LIMIT.to_string())];
        let list: ListResponse<NamedRef> = self.get("/manufacturers", &params).await?;
        Ok(list.rows)
    }

    async fn create_manufacturer(&self, name: &str) -> Result<u64, ApiError> {
        self.create("/manufacturers", &serde_json::json!({ "name": name }))
            .await
    }

    async fn search_models(&self, query: &str) -> Result<Vec<RemoteModel>, ApiError> {
        let params = [("search", query.to_string()), ("limit", SEARCH_LIMIT.to_string())];
        let list: ListResponse<RemoteModel> = self.get("/models", &params).await?;
        Ok(list.rows)
    }

    async fn create_model(&self, model: &ModelPayload) -> Result<u64, ApiError> {
        self.create("/models", model).await
    }

    async fn get_model_by_id(&self, id: u64) -> Result<RemoteModel, ApiError> {
        self.get(&format!("/models/{}", id), &[]).await
    }

    async fn update_model(&self, id: u64, update: &ModelUpdate) -> Result<(), ApiError> {
        self.write(reqwest::Method::PATCH, &format!("/models/{}", id), update)
            .await
            .map(|_| ())
    }

    async fn search_hardware_page(
        &self,
        query: &str,
        limit: u32,
        offset: u32,
        category_id: Option<u64>,
    ) -> Result<ListResponse<RemoteRecord>, ApiError> {
        let mut params = vec![
            ("search", query.to_string()),
            ("limit", limit.to_string()),
            ("offset", offset.to_string()),
        ];
        if let Some(category_id) = category_id {
            params.push(("category_id", category_id.to_string()));
        }
        self.get("/hardware", &params).await
    }

    async fn get_hardware_by_id(&self, id: u64) -> Result<RemoteRecord, ApiError> {
        self.get(&format!("/hardware/{}", id), &[]).await
    }

    async fn create_hardware(&self, payload: &AssetPayload) -> Result<u64, ApiError> {
        self.create("/hardware", payload).await
    }

    async fn update_hardware(&self, id: u64, payload: &AssetPayload) -> Result<(), ApiError> {
        self.write(reqwest::Method::PATCH, &format!("/hardware/{}", id), payload)
            .await
            .map(|_| ())
    }

    async fn checkout_hardware(
        &self,
        id: u64,
        request: &CheckoutRequest,
    ) -> Result<(), ApiError> {
        self.write(
            reqwest::Method::POST,
            &format!("/hardware/{}/checkout", id),
            request,
        )
        .await
        .map(|_| ())
    }

    async fn checkin_hardware(&self, id: u64, note: Option<&str>) -> Result<(), ApiError> {
        let body = match note {
            Some(note) => serde_json::json!({ "note": note }),
            None => serde_json::json!({}),
        };
        self.write(
            reqwest::Method::POST,
            &format!("/hardware/{}/checkin", id),
            &body,
        )
        .await
        .map(|_| ())
    }

    async fn test_connection(&self) -> Result<u64, ApiError> {
        let list: ListResponse<RemoteRecord> =
            self.get("/hardware", &[("limit", "1".to_string())]).await?;
        Ok(list.total)
    }
}
