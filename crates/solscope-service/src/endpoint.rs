//! Route table for the market data endpoints.

use solscope_core::validation::{
    self, CHART_INTERVALS, SEARCH_QUERY, STATS_INTERVALS, TOKEN_ADDRESS, WALLET_ADDRESS,
};
use solscope_core::{Schema, SolscopeResult};
use solscope_upstream::UpstreamRequest;

/// Market data endpoints proxied to the upstream provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Token metadata.
    Token,
    /// Trading statistics over an interval.
    Stats,
    /// Price chart over an interval.
    Chart,
    /// Profit and loss of a wallet for a token.
    Pnl,
    /// Most profitable traders of a token.
    TopTraders,
    /// Tokens matching free search text.
    Search,
}

impl Endpoint {
    /// Every endpoint, in route order.
    pub const ALL: [Self; 6] = [
        Self::Token,
        Self::Stats,
        Self::Chart,
        Self::Pnl,
        Self::TopTraders,
        Self::Search,
    ];

    /// Name used in metrics, logs and `cache.route_ttl_secs`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Token => "token",
            Self::Stats => "stats",
            Self::Chart => "chart",
            Self::Pnl => "pnl",
            Self::TopTraders => "top-traders",
            Self::Search => "search",
        }
    }

    /// Interval schema and default value, for endpoints taking an interval.
    #[must_use]
    pub const fn interval(self) -> Option<(Schema, &'static str)> {
        match self {
            Self::Stats => Some((Schema::interval(STATS_INTERVALS), "24h")),
            Self::Chart => Some((Schema::interval(CHART_INTERVALS), "1d")),
            Self::Token | Self::Pnl | Self::TopTraders | Self::Search => None,
        }
    }
}

/// One validated-on-demand market data lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketQuery<'a> {
    Token { token: &'a str },
    Stats { token: &'a str, interval: Option<&'a str> },
    Chart { token: &'a str, interval: Option<&'a str> },
    Pnl { wallet: &'a str, token: &'a str },
    TopTraders { token: &'a str },
    Search { query: &'a str },
}

impl<'a> MarketQuery<'a> {
    /// Endpoint this query targets.
    #[must_use]
    pub const fn endpoint(&self) -> Endpoint {
        match self {
            Self::Token { .. } => Endpoint::Token,
            Self::Stats { .. } => Endpoint::Stats,
            Self::Chart { .. } => Endpoint::Chart,
            Self::Pnl { .. } => Endpoint::Pnl,
            Self::TopTraders { .. } => Endpoint::TopTraders,
            Self::Search { .. } => Endpoint::Search,
        }
    }

    /// Validates every parameter and builds the upstream request.
    ///
    /// A missing or empty interval takes the endpoint default.
    pub fn into_request(self) -> SolscopeResult<UpstreamRequest> {
        let endpoint = self.endpoint();
        let name = endpoint.name();

        let request = match self {
            Self::Token { token } => {
                let token = validation::validate(&TOKEN_ADDRESS, token)?;
                UpstreamRequest::new(name, format!("/tokens/{}", token))
            }
            Self::Stats { token, interval } | Self::Chart { token, interval } => {
                let token = validation::validate(&TOKEN_ADDRESS, token)?;
                let interval = resolve_interval(endpoint, interval)?;
                UpstreamRequest::new(name, format!("/{}/{}", name, token)).with_param("interval", interval)
            }
            Self::Pnl { wallet, token } => {
                let wallet = validation::validate(&WALLET_ADDRESS, wallet)?;
                let token = validation::validate(&TOKEN_ADDRESS, token)?;
                UpstreamRequest::new(name, format!("/pnl/{}/{}", wallet, token))
            }
            Self::TopTraders { token } => {
                let token = validation::validate(&TOKEN_ADDRESS, token)?;
                UpstreamRequest::new(name, format!("/top-traders/{}", token))
            }
            Self::Search { query } => {
                let query = validation::validate(&SEARCH_QUERY, query)?;
                UpstreamRequest::new(name, "/search").with_param("query", query)
            }
        };

        Ok(request)
    }
}

fn resolve_interval(endpoint: Endpoint, raw: Option<&str>) -> SolscopeResult<&str> {
    let Some((schema, default)) = endpoint.interval() else {
        return Ok("");
    };

    match raw {
        None | Some("") => Ok(default),
        Some(value) => schema.validate(value),
    }
}
