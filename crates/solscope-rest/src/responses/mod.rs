//! API response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use solscope_core::{ErrorResponse, Payload, SolscopeError};
use tracing::warn;

/// Upstream JSON body returned to the caller unmodified.
#[derive(Debug, Clone)]
pub struct JsonPayload(pub Payload);

impl IntoResponse for JsonPayload {
    fn into_response(self) -> Response {
        Json(self.0.as_ref()).into_response()
    }
}

/// Application error type for Axum.
#[derive(Debug)]
pub struct AppError(pub SolscopeError);

impl From<SolscopeError> for AppError {
    fn from(err: SolscopeError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            warn!(status = status.as_u16(), error = %self.0, "Request failed");
        }

        (status, Json(ErrorResponse::from_error(&self.0))).into_response()
    }
}

/// Result type for market data handlers.
pub type ApiResult = Result<JsonPayload, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use solscope_core::ParamKind;
    use std::time::Duration;

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (SolscopeError::validation(ParamKind::TokenAddress, "bad"), StatusCode::BAD_REQUEST),
            (SolscopeError::Timeout(Duration::from_secs(5)), StatusCode::GATEWAY_TIMEOUT),
            (SolscopeError::upstream(Some(404), "missing"), StatusCode::BAD_GATEWAY),
            (SolscopeError::network("refused"), StatusCode::BAD_GATEWAY),
            (SolscopeError::internal("oops"), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected) in cases {
            assert_eq!(AppError(error).into_response().status(), expected);
        }
    }

    #[test]
    fn test_payload_response_is_json() {
        let response = JsonPayload(std::sync::Arc::new(serde_json::json!({"ok": true}))).into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[axum::http::header::CONTENT_TYPE],
            "application/json"
        );
    }
}
