//! Main application router.

use crate::{
    controllers::{health_controller, market_controller, metrics_controller},
    middleware::logging_middleware,
    openapi::ApiDoc,
    state::AppState,
};
use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::get,
    Router,
};
use solscope_config::{ObservabilityConfig, ServerConfig};
use std::path::Path;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    services::{ServeDir, ServeFile},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Creates the main application router.
pub fn create_router(
    state: AppState,
    server_config: &ServerConfig,
    observability: &ObservabilityConfig,
) -> Router {
    let production = state.app.is_production();
    let cors = create_cors_layer(server_config, production);

    let mut app = Router::new()
        // Health endpoints
        .merge(health_controller::router())
        // Market data
        .nest("/api/solana", market_controller::router());

    if state.metrics.is_some() {
        app = app.route(&observability.metrics_path, get(metrics_controller::render_metrics));
    }

    let mut router = app
        .with_state(state)
        // Swagger UI and OpenAPI document
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    if production {
        if let Some(dir) = &server_config.static_dir {
            let index = Path::new(dir).join("index.html");
            router = router.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)));
            info!(static_dir = %dir, "Serving dashboard assets");
        }
    }

    let router = router
        // Add middleware layers
        .layer(RequestBodyLimitLayer::new(server_config.max_body_bytes))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(logging_middleware));

    info!("Router created with /api/solana endpoints and Swagger UI at /swagger-ui");
    router
}

/// Creates a CORS layer admitting the dashboard origin for the environment.
fn create_cors_layer(server_config: &ServerConfig, production: bool) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    match server_config.allowed_origin(production).map(HeaderValue::from_str) {
        Some(Ok(origin)) => cors.allow_origin(origin),
        Some(Err(e)) => {
            warn!(error = %e, "Ignoring unparseable CORS origin");
            cors
        }
        None => cors,
    }
}
