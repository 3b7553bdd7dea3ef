//! Router tests driving the full stack against a scripted gateway.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::{json, Value};
use solscope_cache::{InFlightRequests, TtlCache};
use solscope_config::{AppMetadata, CacheConfig, ObservabilityConfig, ServerConfig};
use solscope_core::{SolscopeError, SolscopeResult};
use solscope_rest::{create_router, AppState};
use solscope_service::MarketDataServiceImpl;
use solscope_upstream::{UpstreamGateway, UpstreamRequest};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt; // for `oneshot`

const TOKEN: &str = "So11111111111111111111111111111111111111112";
const WALLET: &str = "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM";

/// Gateway answering by path: `missing` tokens give 404, `slow` tokens time out.
#[derive(Default)]
struct ScriptedGateway {
    calls: AtomicUsize,
}

#[async_trait]
impl UpstreamGateway for ScriptedGateway {
    async fn call(&self, request: &UpstreamRequest) -> SolscopeResult<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if request.path.contains("MissingToken") {
            return Err(SolscopeError::upstream(Some(404), "404 Not Found"));
        }
        if request.path.contains("SlowToken") {
            return Err(SolscopeError::Timeout(Duration::from_millis(5000)));
        }
        Ok(json!({ "path": request.path, "params": request.params }))
    }
}

fn state(gateway: Arc<ScriptedGateway>, environment: &str) -> AppState {
    let service = MarketDataServiceImpl::new(
        gateway,
        Arc::new(TtlCache::new()),
        InFlightRequests::new(),
        &CacheConfig::default(),
    );
    let app = AppMetadata {
        environment: environment.to_string(),
        ..AppMetadata::default()
    };
    AppState::new(Arc::new(service), app)
}

fn app(gateway: Arc<ScriptedGateway>) -> Router {
    create_router(
        state(gateway, "development"),
        &ServerConfig::default(),
        &ObservabilityConfig::default(),
    )
}

async fn get(app: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes().to_vec();
    (status, headers, body)
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let (status, _, body) = get(app, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_health_check() {
    let (status, body) = get_json(app(Arc::default()), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["environment"], "development");
    assert!(body["timestamp"].as_str().is_some_and(|t| !t.is_empty()));
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_ready_and_live() {
    let (status, _, _) = get(app(Arc::default()), "/ready").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _, _) = get(app(Arc::default()), "/live").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_token_passthrough() {
    let gateway = Arc::new(ScriptedGateway::default());
    let (status, body) = get_json(app(gateway.clone()), &format!("/api/solana/tokens/{TOKEN}")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["path"], format!("/tokens/{TOKEN}"));
    assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_invalid_token_is_bad_request() {
    let gateway = Arc::new(ScriptedGateway::default());
    let (status, body) = get_json(app(gateway.clone()), "/api/solana/tokens/abc").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert_eq!(body["message"], "Invalid token address format");
    assert_eq!(body["param"], "tokenAddress");
    assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_stats_interval_handling() {
    let gateway = Arc::new(ScriptedGateway::default());
    let router = app(gateway.clone());

    let (status, body) = get_json(router.clone(), &format!("/api/solana/stats/{TOKEN}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["params"]["interval"], "24h");

    let (status, body) = get_json(router.clone(), &format!("/api/solana/stats/{TOKEN}?interval=7d")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["params"]["interval"], "7d");

    let (status, body) = get_json(router, &format!("/api/solana/stats/{TOKEN}?interval=1w")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["param"], "interval");
    assert_eq!(gateway.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_chart_default_interval() {
    let (status, body) = get_json(app(Arc::default()), &format!("/api/solana/chart/{TOKEN}?interval=")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["params"]["interval"], "1d");
}

#[tokio::test]
async fn test_pnl_and_top_traders() {
    let router = app(Arc::default());

    let (status, body) = get_json(router.clone(), &format!("/api/solana/pnl/{WALLET}/{TOKEN}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["path"], format!("/pnl/{WALLET}/{TOKEN}"));

    let (status, body) = get_json(router.clone(), &format!("/api/solana/pnl/short/{TOKEN}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["param"], "walletAddress");

    let (status, body) = get_json(router, &format!("/api/solana/top-traders/{TOKEN}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["path"], format!("/top-traders/{TOKEN}"));
}

#[tokio::test]
async fn test_search_forwards_query() {
    let gateway = Arc::new(ScriptedGateway::default());
    let router = app(gateway.clone());

    let (status, body) = get_json(router.clone(), "/api/solana/search?q=wrapped%20sol").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["path"], "/search");
    assert_eq!(body["params"]["query"], "wrapped sol");

    let (status, _) = get_json(router, "/api/solana/search?q=wrapped%20sol").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_search_requires_query() {
    let gateway = Arc::new(ScriptedGateway::default());
    let router = app(gateway.clone());

    for uri in ["/api/solana/search", "/api/solana/search?q=", "/api/solana/search?q=%20%20"] {
        let (status, body) = get_json(router.clone(), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["param"], "q");
    }
    assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unknown_api_route_is_json_not_found() {
    let (status, body) = get_json(app(Arc::default()), "/api/solana/holders/abc").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
    assert_eq!(body["message"], "No API route for /api/solana/holders/abc");
}

#[tokio::test]
async fn test_repeat_request_served_from_cache() {
    let gateway = Arc::new(ScriptedGateway::default());
    let router = app(gateway.clone());
    let uri = format!("/api/solana/top-traders/{TOKEN}");

    let (first_status, first) = get_json(router.clone(), &uri).await;
    let (second_status, second) = get_json(router, &uri).await;

    assert_eq!(first_status, StatusCode::OK);
    assert_eq!(second_status, StatusCode::OK);
    assert_eq!(first, second);
    assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_upstream_failure_is_bad_gateway() {
    let token = "MissingToken1111111111111111111111111111111";
    let (status, body) = get_json(app(Arc::default()), &format!("/api/solana/tokens/{token}")).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "UPSTREAM_ERROR");
    assert_eq!(body["upstream_status"], 404);
}

#[tokio::test]
async fn test_upstream_timeout_is_gateway_timeout() {
    let token = "SlowToken11111111111111111111111111111111111";
    let (status, body) = get_json(app(Arc::default()), &format!("/api/solana/chart/{token}")).await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["error"], "TIMEOUT");
    assert_eq!(body["message"], "Upstream request timed out after 5000ms");
}

#[tokio::test]
async fn test_security_headers() {
    let (_, headers, _) = get(app(Arc::default()), "/health").await;

    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "SAMEORIGIN");
    assert_eq!(headers["referrer-policy"], "no-referrer");
}

#[tokio::test]
async fn test_cors_allows_dev_origin() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri(format!("/api/solana/tokens/{TOKEN}"))
        .header(header::ORIGIN, "http://localhost:4567")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .body(Body::empty())
        .unwrap();

    let response = app(Arc::default()).oneshot(request).await.unwrap();
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:4567"
    );
}

#[tokio::test]
async fn test_metrics_route() {
    let (status, _, _) = get(app(Arc::default()), "/metrics").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let handle = PrometheusBuilder::new().build_recorder().handle();
    let router = create_router(
        state(Arc::default(), "development").with_metrics(handle),
        &ServerConfig::default(),
        &ObservabilityConfig::default(),
    );
    let (status, headers, _) = get(router, "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(headers[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/plain"));
}

#[tokio::test]
async fn test_production_serves_dashboard_with_fallback() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<html>dashboard</html>").unwrap();

    let server = ServerConfig {
        cors_origin: Some("https://dash.example.com".to_string()),
        static_dir: Some(dir.path().to_string_lossy().into_owned()),
        ..ServerConfig::default()
    };
    let router = create_router(
        state(Arc::default(), "production"),
        &server,
        &ObservabilityConfig::default(),
    );

    let (status, _, body) = get(router.clone(), "/charts/some-client-route").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"<html>dashboard</html>");

    let (status, body) = get_json(router.clone(), "/api/solana/unknown-route").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");

    let (status, body) = get_json(router, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["environment"], "production");
}
