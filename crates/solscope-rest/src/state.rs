//! Application state for Axum handlers.

use metrics_exporter_prometheus::PrometheusHandle;
use solscope_config::AppMetadata;
use solscope_service::MarketDataService;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub market: Arc<dyn MarketDataService>,
    pub app: Arc<AppMetadata>,
    /// Renders `/metrics`; `None` when the exporter is disabled.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(market: Arc<dyn MarketDataService>, app: AppMetadata) -> Self {
        Self {
            market,
            app: Arc::new(app),
            metrics: None,
        }
    }

    /// Attaches the Prometheus handle served at `/metrics`.
    #[must_use]
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
