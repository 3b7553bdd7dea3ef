//! # SolScope Upstream
//!
//! Gateway to the upstream data provider.
//! Every call is bounded by a timeout and every failure is normalized into
//! the shared error taxonomy. No retries happen here.

pub mod gateway;
pub mod timeout;

pub use gateway::*;
pub use timeout::*;
