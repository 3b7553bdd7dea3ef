//! Unified error type for the data-access boundary layer.

use crate::ParamKind;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Every failure the boundary layer can hand back to a caller.
///
/// The type is `Clone` because a single upstream outcome is delivered to
/// every caller that attached to the same in-flight request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolscopeError {
    // ============ Caller Errors ============
    /// A path or query parameter failed its validation rule.
    #[error("{message}")]
    Validation { kind: ParamKind, message: String },

    // ============ Upstream Errors ============
    /// The upstream provider did not answer within the configured bound.
    #[error("Upstream request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// The upstream provider answered with a failure status, or with a body
    /// that is not JSON.
    #[error("Upstream request failed: {message}")]
    Upstream { status: Option<u16>, message: String },

    /// The request never reached the upstream provider (DNS, refused, reset).
    #[error("Network error: {0}")]
    Network(String),

    // ============ Internal Errors ============
    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SolscopeError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::Timeout(_) => 504,
            Self::Upstream { .. } | Self::Network(_) => 502,
            Self::Configuration(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::Upstream { .. } => "UPSTREAM_ERROR",
            Self::Network(_) => "NETWORK_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Creates a validation error for a parameter kind.
    #[must_use]
    pub fn validation<T: Into<String>>(kind: ParamKind, message: T) -> Self {
        Self::Validation {
            kind,
            message: message.into(),
        }
    }

    /// Creates an upstream error.
    #[must_use]
    pub fn upstream<T: Into<String>>(status: Option<u16>, message: T) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }

    /// Creates a network error.
    #[must_use]
    pub fn network<T: Into<String>>(message: T) -> Self {
        Self::Network(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }

    /// Checks if a caller may safely repeat the request.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Network(_))
    }
}

impl From<serde_json::Error> for SolscopeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON serialization error: {}", err))
    }
}

/// JSON body returned to HTTP callers on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorResponse {
    /// Machine-readable error kind
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Parameter that failed validation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
    /// Status returned by the upstream provider
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_status: Option<u16>,
}

impl ErrorResponse {
    /// Creates a new error response from a `SolscopeError`.
    #[must_use]
    pub fn from_error(error: &SolscopeError) -> Self {
        let (param, upstream_status) = match error {
            SolscopeError::Validation { kind, .. } => (Some(kind.name().to_string()), None),
            SolscopeError::Upstream { status, .. } => (None, *status),
            _ => (None, None),
        };

        Self {
            error: error.error_code().to_string(),
            message: error.to_string(),
            param,
            upstream_status,
        }
    }
}

impl From<&SolscopeError> for ErrorResponse {
    fn from(error: &SolscopeError) -> Self {
        Self::from_error(error)
    }
}
