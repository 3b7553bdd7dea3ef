//! reqwest-backed gateway to the Solana Tracker API.

use super::{UpstreamGateway, UpstreamRequest};
use crate::with_timeout;
use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde_json::Value;
use solscope_config::UpstreamConfig;
use solscope_core::{SolscopeError, SolscopeResult};
use std::time::Duration;
use tracing::{debug, warn};

/// Header carrying the provider credential.
const API_KEY_HEADER: &str = "x-api-key";

/// Longest slice of an error body kept in error messages.
const MAX_ERROR_BODY: usize = 200;

/// HTTP gateway to the upstream provider.
pub struct HttpGateway {
    client: Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl HttpGateway {
    /// Creates a gateway from the upstream configuration.
    pub fn new(config: &UpstreamConfig) -> SolscopeResult<Self> {
        let client = Client::builder()
            .pool_max_idle_per_host(32)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| SolscopeError::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self::with_client(client, &config.base_url, &config.api_key, config.timeout()))
    }

    /// Creates a gateway around an existing client.
    #[must_use]
    pub fn with_client(client: Client, base_url: &str, api_key: &str, timeout: Duration) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            timeout,
        }
    }

    /// Per-call timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: &UpstreamRequest) -> SolscopeResult<Value> {
        let response = self
            .client
            .get(self.url(&request.path))
            .query(&request.params)
            .header(API_KEY_HEADER, &self.api_key)
            .header(header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| self.map_transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_http_error(status, &body));
        }

        response.json::<Value>().await.map_err(|e| {
            if e.is_decode() {
                SolscopeError::upstream(Some(status.as_u16()), format!("Invalid JSON body: {}", e))
            } else {
                self.map_transport_error(&e)
            }
        })
    }

    fn map_transport_error(&self, err: &reqwest::Error) -> SolscopeError {
        if err.is_timeout() {
            SolscopeError::Timeout(self.timeout)
        } else {
            SolscopeError::network(err.to_string())
        }
    }
}

#[async_trait]
impl UpstreamGateway for HttpGateway {
    async fn call(&self, request: &UpstreamRequest) -> SolscopeResult<Value> {
        debug!(endpoint = request.endpoint, path = %request.path, "Calling upstream");

        let result = with_timeout(self.timeout, || self.send(request)).await;

        if let Err(e) = &result {
            warn!(
                endpoint = request.endpoint,
                path = %request.path,
                error = %e,
                "Upstream call failed"
            );
        }

        result
    }
}

fn map_http_error(status: StatusCode, body: &str) -> SolscopeError {
    let reason = status.canonical_reason().unwrap_or("Unknown status");
    let body = body.trim();

    let message = if body.is_empty() {
        format!("{} {}", status.as_u16(), reason)
    } else {
        let snippet: String = body.chars().take(MAX_ERROR_BODY).collect();
        format!("{} {}: {}", status.as_u16(), reason, snippet)
    };

    SolscopeError::upstream(Some(status.as_u16()), message)
}
