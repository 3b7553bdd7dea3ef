//! Market data service implementation.

use crate::endpoint::{Endpoint, MarketQuery};
use crate::market_data_service::MarketDataService;
use async_trait::async_trait;
use futures::future::{self, FutureExt};
use solscope_cache::{BoundaryMetrics, CacheKey, InFlightRequests, TtlCache};
use solscope_config::CacheConfig;
use solscope_core::{BoxFuture, Payload, SolscopeError, SolscopeResult};
use solscope_upstream::{UpstreamGateway, UpstreamRequest};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Cache-first market data service.
///
/// Owns the response cache and the in-flight table it is given; nothing else
/// should write to either.
pub struct MarketDataServiceImpl {
    gateway: Arc<dyn UpstreamGateway>,
    cache: Arc<TtlCache>,
    in_flight: InFlightRequests,
    ttls: HashMap<Endpoint, Duration>,
}

impl MarketDataServiceImpl {
    /// Creates a new market data service.
    pub fn new(
        gateway: Arc<dyn UpstreamGateway>,
        cache: Arc<TtlCache>,
        in_flight: InFlightRequests,
        cache_config: &CacheConfig,
    ) -> Self {
        let ttls = Endpoint::ALL
            .iter()
            .map(|endpoint| (*endpoint, cache_config.ttl_for(endpoint.name())))
            .collect();

        Self {
            gateway,
            cache,
            in_flight,
            ttls,
        }
    }

    /// TTL applied to responses of `endpoint`.
    #[must_use]
    pub fn ttl(&self, endpoint: Endpoint) -> Duration {
        self.ttls.get(&endpoint).copied().unwrap_or(Duration::from_secs(60))
    }

    async fn fetch(&self, query: MarketQuery<'_>) -> SolscopeResult<Payload> {
        let endpoint = query.endpoint();

        let request = query.into_request().map_err(|e| {
            if let SolscopeError::Validation { kind, message } = &e {
                debug!(endpoint = endpoint.name(), param = kind.name(), %message, "Rejected request");
                BoundaryMetrics::validation_failed(kind.name());
            }
            e
        })?;
        let key = CacheKey::new(&request.path, &request.params);

        if let Some(hit) = self.cache.get(&key) {
            debug!(endpoint = endpoint.name(), key = %key, "Cache hit");
            BoundaryMetrics::cache_hit(endpoint.name());
            return Ok(hit);
        }

        debug!(endpoint = endpoint.name(), key = %key, "Cache miss");
        BoundaryMetrics::cache_miss(endpoint.name());

        let ttl = self.ttl(endpoint);
        let call = self
            .in_flight
            .dedupe(&key, || self.start_call(key.clone(), request, ttl));

        call.await
    }

    /// Builds the upstream call for a key.
    ///
    /// Runs under the in-flight table lock. A call that settled between the
    /// caller's cache miss and now has already written the cache, so that
    /// entry is served instead of issuing a second call.
    fn start_call(&self, key: CacheKey, request: UpstreamRequest, ttl: Duration) -> BoxFuture<'static, Payload> {
        if let Some(hit) = self.cache.get(&key) {
            return future::ready(Ok(hit)).boxed();
        }

        let gateway = Arc::clone(&self.gateway);
        let cache = Arc::clone(&self.cache);

        async move {
            let started = Instant::now();
            let result = gateway.call(&request).await;
            let elapsed = started.elapsed();
            BoundaryMetrics::upstream_call(request.endpoint, outcome_label(&result), elapsed);

            let payload = Arc::new(result?);
            cache.put(key, Arc::clone(&payload), ttl);

            info!(
                endpoint = request.endpoint,
                path = %request.path,
                duration_ms = elapsed.as_millis() as u64,
                "Upstream response cached"
            );
            Ok::<_, SolscopeError>(payload)
        }
        .boxed()
    }
}

fn outcome_label<T>(result: &SolscopeResult<T>) -> &'static str {
    match result {
        Ok(_) => "success",
        Err(SolscopeError::Timeout(_)) => "timeout",
        Err(SolscopeError::Upstream { .. }) => "upstream_error",
        Err(SolscopeError::Network(_)) => "network_error",
        Err(_) => "error",
    }
}

#[async_trait]
impl MarketDataService for MarketDataServiceImpl {
    async fn token(&self, token: &str) -> SolscopeResult<Payload> {
        self.fetch(MarketQuery::Token { token }).await
    }

    async fn stats(&self, token: &str, interval: Option<&str>) -> SolscopeResult<Payload> {
        self.fetch(MarketQuery::Stats { token, interval }).await
    }

    async fn chart(&self, token: &str, interval: Option<&str>) -> SolscopeResult<Payload> {
        self.fetch(MarketQuery::Chart { token, interval }).await
    }

    async fn pnl(&self, wallet: &str, token: &str) -> SolscopeResult<Payload> {
        self.fetch(MarketQuery::Pnl { wallet, token }).await
    }

    async fn top_traders(&self, token: &str) -> SolscopeResult<Payload> {
        self.fetch(MarketQuery::TopTraders { token }).await
    }

    async fn search(&self, query: &str) -> SolscopeResult<Payload> {
        self.fetch(MarketQuery::Search { query }).await
    }
}
