//! OpenAPI documentation configuration.

use crate::controllers::health_controller::HealthResponse;
use solscope_core::ErrorResponse;
use utoipa::OpenApi;

/// OpenAPI documentation for the SolScope API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "SolScope API",
        version = "0.1.0",
        description = "Solana token analytics backed by the Solana Tracker API. \
                       Successful responses are the provider's JSON, passed through unchanged.",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    paths(
        // Market endpoints
        crate::controllers::market_controller::get_token,
        crate::controllers::market_controller::get_stats,
        crate::controllers::market_controller::get_chart,
        crate::controllers::market_controller::get_pnl,
        crate::controllers::market_controller::get_top_traders,
        crate::controllers::market_controller::search_tokens,
        // Health endpoints
        crate::controllers::health_controller::health_check,
        crate::controllers::health_controller::readiness_check,
        crate::controllers::health_controller::liveness_check,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
        )
    ),
    tags(
        (name = "market", description = "Market data proxied from the provider"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;
