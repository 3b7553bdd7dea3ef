//! Result type aliases for SolScope.

use crate::SolscopeError;

/// A specialized `Result` type for boundary-layer operations.
pub type SolscopeResult<T> = Result<T, SolscopeError>;

/// A boxed future returning a `SolscopeResult`.
pub type BoxFuture<'a, T> =
    std::pin::Pin<Box<dyn std::future::Future<Output = SolscopeResult<T>> + Send + 'a>>;

/// Upstream JSON body, passed through without interpretation.
///
/// Shared behind an `Arc` so the cache and every coalesced caller can hold the
/// same body without copying it.
pub type Payload = std::sync::Arc<serde_json::Value>;
