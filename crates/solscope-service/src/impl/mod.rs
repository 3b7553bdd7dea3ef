//! Market data service implementations.
//!
//! Trait definitions live in the parent module (`market_data_service.rs`).

pub mod market_data_service_impl;

pub use market_data_service_impl::MarketDataServiceImpl;
