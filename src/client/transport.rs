//! Network Transport Module
//!
//! Object-safe transport seam between the cached fetch wrapper and the
//! HTTP layer, plus the reqwest-backed production implementation.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::error;

use crate::error::{ClientError, Result};

// == Transport Trait ==
/// JSON transport to the dealership API.
///
/// Implementations reject with an error on any non-2xx status; 401 maps
/// to `ClientError::AuthRequired` so the caching layer can refuse to
/// mask credential problems with stale data.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetches a JSON document.
    async fn get_json(&self, url: &str) -> Result<Value>;

    /// Posts a JSON payload and returns the JSON response.
    async fn post_json(&self, url: &str, body: &Value) -> Result<Value>;
}

// == HTTP Transport ==
/// Production transport over reqwest with bearer authentication.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    api_key: Option<String>,
}

impl HttpTransport {
    /// Creates a transport; `api_key`, when present, is sent as a bearer
    /// token with every request.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
        }
    }

    fn apply_headers(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let builder = builder
            .header("Accept", "application/json")
            .header("Content-Type", "application/json");
        match &self.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }

    async fn handle_response(response: reqwest::Response) -> Result<Value> {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            error!("API authentication error: invalid or missing API key");
            return Err(ClientError::AuthRequired);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Prefer the backend's own message field when the error body
            // is JSON.
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|parsed| {
                    parsed
                        .get("message")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                })
                .unwrap_or(body);
            error!(status = status.as_u16(), %message, "API request failed");
            return Err(ClientError::Http {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|err| ClientError::Decode(err.to_string()))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_json(&self, url: &str) -> Result<Value> {
        let response = self
            .apply_headers(self.http.get(url))
            .send()
            .await
            .map_err(|err| ClientError::Network(err.to_string()))?;
        Self::handle_response(response).await
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<Value> {
        let response = self
            .apply_headers(self.http.post(url))
            .json(body)
            .send()
            .await
            .map_err(|err| ClientError::Network(err.to_string()))?;
        Self::handle_response(response).await
    }
}
