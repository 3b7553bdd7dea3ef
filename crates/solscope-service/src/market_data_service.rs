//! Market data service trait definition.

use async_trait::async_trait;
use solscope_core::{Payload, SolscopeResult};

/// Market data lookups backing the dashboard.
///
/// Every method returns the provider's JSON body unmodified. Callers cannot
/// tell whether it came from the cache, a shared call, or a fresh call.
#[async_trait]
pub trait MarketDataService: Send + Sync {
    /// Gets token metadata.
    async fn token(&self, token: &str) -> SolscopeResult<Payload>;

    /// Gets trading statistics; `interval` defaults to `24h`.
    async fn stats(&self, token: &str, interval: Option<&str>) -> SolscopeResult<Payload>;

    /// Gets price chart data; `interval` defaults to `1d`.
    async fn chart(&self, token: &str, interval: Option<&str>) -> SolscopeResult<Payload>;

    /// Gets a wallet's profit and loss for a token.
    async fn pnl(&self, wallet: &str, token: &str) -> SolscopeResult<Payload>;

    /// Gets the top traders of a token.
    async fn top_traders(&self, token: &str) -> SolscopeResult<Payload>;

    /// Searches tokens by name, symbol or address.
    async fn search(&self, query: &str) -> SolscopeResult<Payload>;
}
