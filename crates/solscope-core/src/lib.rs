//! # SolScope Core
//!
//! Core types shared by every SolScope crate: the error taxonomy surfaced to
//! dashboard callers, the input validation schemas that guard the upstream
//! provider, and logging initialisation.

pub mod error;
pub mod result;
pub mod telemetry;
pub mod validation;

pub use error::*;
pub use result::*;
pub use validation::{ParamKind, Rule, Schema};
