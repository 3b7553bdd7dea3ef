//! # SolScope REST
//!
//! REST API layer using Axum for SolScope.
//! Exposes the market data endpoints under `/api/solana`, health checks,
//! Prometheus metrics and the built dashboard in production.

pub mod controllers;
pub mod middleware;
pub mod openapi;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
