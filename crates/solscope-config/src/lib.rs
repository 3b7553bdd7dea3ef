//! # SolScope Config
//!
//! Configuration management for SolScope.
//! Supports layered configuration from files and environment variables,
//! including the unprefixed deployment variables (`PORT`, `NODE_ENV`, ...).

mod app_config;
mod loader;
mod validation;

pub use app_config::*;
pub use loader::*;
pub use validation::*;
