//! Market data controller.
//!
//! Each handler forwards its path and query parameters to the market data
//! service, which validates them before anything else happens.

use crate::{
    responses::{ApiResult, JsonPayload},
    state::AppState,
};
use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use solscope_core::ErrorResponse;
use tracing::debug;
use utoipa::IntoParams;

/// Creates the market data router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tokens/:token_address", get(get_token))
        .route("/stats/:token_address", get(get_stats))
        .route("/chart/:token_address", get(get_chart))
        .route("/pnl/:wallet_address/:token_address", get(get_pnl))
        .route("/top-traders/:token_address", get(get_top_traders))
        .route("/search", get(search_tokens))
        .fallback(api_not_found)
}

/// Optional time interval.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IntervalQuery {
    /// Time interval; omitted or empty selects the endpoint default.
    pub interval: Option<String>,
}

/// Token search text.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Name, symbol or address fragment; required, at most 100 characters.
    pub q: Option<String>,
}

/// Get token metadata.
#[utoipa::path(
    get,
    path = "/api/solana/tokens/{token_address}",
    tag = "market",
    params(("token_address" = String, Path, description = "Token mint address")),
    responses(
        (status = 200, description = "Token metadata from the provider"),
        (status = 400, description = "Invalid token address", body = solscope_core::ErrorResponse),
        (status = 502, description = "Provider failure", body = solscope_core::ErrorResponse),
        (status = 504, description = "Provider timed out", body = solscope_core::ErrorResponse)
    )
)]
pub async fn get_token(State(state): State<AppState>, Path(token_address): Path<String>) -> ApiResult {
    debug!("Get token request: {}", token_address);

    let payload = state.market.token(&token_address).await?;
    Ok(JsonPayload(payload))
}

/// Get trading statistics.
#[utoipa::path(
    get,
    path = "/api/solana/stats/{token_address}",
    tag = "market",
    params(
        ("token_address" = String, Path, description = "Token mint address"),
        IntervalQuery
    ),
    responses(
        (status = 200, description = "Statistics for 1h, 24h or 7d (default 24h)"),
        (status = 400, description = "Invalid token address or interval", body = solscope_core::ErrorResponse),
        (status = 502, description = "Provider failure", body = solscope_core::ErrorResponse),
        (status = 504, description = "Provider timed out", body = solscope_core::ErrorResponse)
    )
)]
pub async fn get_stats(
    State(state): State<AppState>,
    Path(token_address): Path<String>,
    Query(query): Query<IntervalQuery>,
) -> ApiResult {
    debug!("Get stats request: {} {:?}", token_address, query.interval);

    let payload = state
        .market
        .stats(&token_address, query.interval.as_deref())
        .await?;
    Ok(JsonPayload(payload))
}

/// Get price chart data.
#[utoipa::path(
    get,
    path = "/api/solana/chart/{token_address}",
    tag = "market",
    params(
        ("token_address" = String, Path, description = "Token mint address"),
        IntervalQuery
    ),
    responses(
        (status = 200, description = "Chart for 1h, 1d, 1w or 1m (default 1d)"),
        (status = 400, description = "Invalid token address or interval", body = solscope_core::ErrorResponse),
        (status = 502, description = "Provider failure", body = solscope_core::ErrorResponse),
        (status = 504, description = "Provider timed out", body = solscope_core::ErrorResponse)
    )
)]
pub async fn get_chart(
    State(state): State<AppState>,
    Path(token_address): Path<String>,
    Query(query): Query<IntervalQuery>,
) -> ApiResult {
    debug!("Get chart request: {} {:?}", token_address, query.interval);

    let payload = state
        .market
        .chart(&token_address, query.interval.as_deref())
        .await?;
    Ok(JsonPayload(payload))
}

/// Get a wallet's profit and loss for a token.
#[utoipa::path(
    get,
    path = "/api/solana/pnl/{wallet_address}/{token_address}",
    tag = "market",
    params(
        ("wallet_address" = String, Path, description = "Wallet address"),
        ("token_address" = String, Path, description = "Token mint address")
    ),
    responses(
        (status = 200, description = "PnL from the provider"),
        (status = 400, description = "Invalid wallet or token address", body = solscope_core::ErrorResponse),
        (status = 502, description = "Provider failure", body = solscope_core::ErrorResponse),
        (status = 504, description = "Provider timed out", body = solscope_core::ErrorResponse)
    )
)]
pub async fn get_pnl(
    State(state): State<AppState>,
    Path((wallet_address, token_address)): Path<(String, String)>,
) -> ApiResult {
    debug!("Get pnl request: {} {}", wallet_address, token_address);

    let payload = state.market.pnl(&wallet_address, &token_address).await?;
    Ok(JsonPayload(payload))
}

/// Get the top traders of a token.
#[utoipa::path(
    get,
    path = "/api/solana/top-traders/{token_address}",
    tag = "market",
    params(("token_address" = String, Path, description = "Token mint address")),
    responses(
        (status = 200, description = "Top traders from the provider"),
        (status = 400, description = "Invalid token address", body = solscope_core::ErrorResponse),
        (status = 502, description = "Provider failure", body = solscope_core::ErrorResponse),
        (status = 504, description = "Provider timed out", body = solscope_core::ErrorResponse)
    )
)]
pub async fn get_top_traders(
    State(state): State<AppState>,
    Path(token_address): Path<String>,
) -> ApiResult {
    debug!("Get top traders request: {}", token_address);

    let payload = state.market.top_traders(&token_address).await?;
    Ok(JsonPayload(payload))
}

/// Search tokens.
#[utoipa::path(
    get,
    path = "/api/solana/search",
    tag = "market",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching tokens from the provider"),
        (status = 400, description = "Missing, blank or oversized query", body = solscope_core::ErrorResponse),
        (status = 502, description = "Provider failure", body = solscope_core::ErrorResponse),
        (status = 504, description = "Provider timed out", body = solscope_core::ErrorResponse)
    )
)]
pub async fn search_tokens(State(state): State<AppState>, Query(query): Query<SearchQuery>) -> ApiResult {
    debug!("Search request: {:?}", query.q);

    let payload = state.market.search(query.q.as_deref().unwrap_or_default()).await?;
    Ok(JsonPayload(payload))
}

/// JSON 404 for unknown market routes, so API callers never get the dashboard page.
async fn api_not_found(OriginalUri(uri): OriginalUri) -> impl IntoResponse {
    let body = ErrorResponse {
        error: "NOT_FOUND".to_string(),
        message: format!("No API route for {}", uri.path()),
        param: None,
        upstream_status: None,
    };
    (StatusCode::NOT_FOUND, Json(body))
}
