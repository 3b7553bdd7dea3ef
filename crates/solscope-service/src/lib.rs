//! # SolScope Service
//!
//! Orchestrates every market data lookup: validate the parameters, serve
//! from the response cache when possible, otherwise share a single upstream
//! call between all concurrent callers and cache its result.

pub mod endpoint;
pub mod r#impl;
pub mod market_data_service;

pub use endpoint::{Endpoint, MarketQuery};
pub use market_data_service::*;
pub use r#impl::MarketDataServiceImpl;
