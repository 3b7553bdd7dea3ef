//! Application builder.

use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use solscope_cache::{CacheSweeper, InFlightRequests, TtlCache};
use solscope_config::{format_validation_errors, AppConfig, ConfigValidator};
use solscope_core::{SolscopeError, SolscopeResult};
use solscope_rest::{create_router, AppState};
use solscope_service::MarketDataServiceImpl;
use solscope_upstream::{HttpGateway, UpstreamGateway};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Application builder for constructing the server.
#[derive(Default)]
pub struct AppBuilder {
    config: Option<AppConfig>,
    gateway: Option<Arc<dyn UpstreamGateway>>,
    metrics: Option<PrometheusHandle>,
}

impl AppBuilder {
    /// Creates a new application builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration.
    #[must_use]
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Replaces the HTTP gateway built from `upstream` configuration.
    #[must_use]
    pub fn with_gateway(mut self, gateway: Arc<dyn UpstreamGateway>) -> Self {
        self.gateway = Some(gateway);
        self
    }

    /// Serves the given Prometheus handle at the metrics path.
    #[must_use]
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Builds the application.
    ///
    /// The configuration is validated first; without one, the defaults are
    /// used and fail for lack of an upstream credential.
    pub fn build(self) -> SolscopeResult<App> {
        let config = self.config.unwrap_or_default();
        ConfigValidator::validate(&config)
            .map_err(|errors| SolscopeError::Configuration(format_validation_errors(&errors)))?;

        let gateway = match self.gateway {
            Some(gateway) => gateway,
            None => Arc::new(HttpGateway::new(&config.upstream)?),
        };

        let cache = Arc::new(TtlCache::new());
        let service = MarketDataServiceImpl::new(
            gateway,
            Arc::clone(&cache),
            InFlightRequests::new(),
            &config.cache,
        );

        let mut state = AppState::new(Arc::new(service), config.app.clone());
        if let Some(handle) = self.metrics {
            state = state.with_metrics(handle);
        }

        let router = create_router(state, &config.server, &config.observability);
        let sweeper = CacheSweeper::new(cache, config.cache.sweep_interval());

        Ok(App {
            config,
            router,
            sweeper,
        })
    }
}

/// A fully wired application, ready to serve.
pub struct App {
    config: AppConfig,
    router: Router,
    sweeper: CacheSweeper,
}

impl App {
    /// Configuration the application was built from.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Router serving every HTTP route.
    #[must_use]
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Binds the configured address and serves until `shutdown` completes.
    pub async fn run<F>(self, shutdown: F) -> SolscopeResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.server.addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| SolscopeError::internal(format!("Failed to bind {}: {}", addr, e)))?;

        self.serve(listener, shutdown).await
    }

    /// Serves on an already bound listener until `shutdown` completes.
    ///
    /// The cache sweeper runs for as long as the server does.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> SolscopeResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let sweeper_handle = self.sweeper.spawn();

        if let Ok(local) = listener.local_addr() {
            info!("Starting REST server on http://{}", local);
        }

        let result = axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| SolscopeError::internal(format!("REST server error: {}", e)));

        self.sweeper.stop();
        if let Some(handle) = sweeper_handle {
            let _ = handle.await;
        }

        info!("Server shutdown complete");
        result
    }
}
