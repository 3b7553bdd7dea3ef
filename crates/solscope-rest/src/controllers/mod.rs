//! REST API controllers.

pub mod health_controller;
pub mod market_controller;
pub mod metrics_controller;

pub use health_controller::*;
