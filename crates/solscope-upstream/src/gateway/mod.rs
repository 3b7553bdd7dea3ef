//! Upstream gateway abstraction.

mod http;

pub use http::HttpGateway;

use async_trait::async_trait;
use serde_json::Value;
use solscope_core::SolscopeResult;
use std::collections::BTreeMap;

/// One call to the upstream provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRequest {
    /// Route name used for metrics and per-route settings (`stats`, `pnl`, ...).
    pub endpoint: &'static str,
    /// Path appended to the provider base URL, e.g. `/stats/<token>`.
    pub path: String,
    /// Query parameters, ordered by name.
    pub params: BTreeMap<String, String>,
}

impl UpstreamRequest {
    /// Creates a request without query parameters.
    #[must_use]
    pub fn new(endpoint: &'static str, path: impl Into<String>) -> Self {
        Self {
            endpoint,
            path: path.into(),
            params: BTreeMap::new(),
        }
    }

    /// Adds a query parameter.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }
}

/// Transport to the upstream provider.
///
/// Implementations never retry and never touch the response cache or the
/// in-flight table; the caller owns both.
#[async_trait]
pub trait UpstreamGateway: Send + Sync {
    /// Performs the call and returns the provider's JSON body.
    async fn call(&self, request: &UpstreamRequest) -> SolscopeResult<Value>;
}
