//! # SolScope Server Library
//!
//! Wires configuration, the upstream gateway, the response cache and the
//! REST router into a runnable application.

pub mod app;
pub mod startup;

pub use app::{App, AppBuilder};
