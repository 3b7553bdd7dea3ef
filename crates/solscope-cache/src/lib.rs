//! # SolScope Cache
//!
//! In-process storage in front of the upstream provider:
//!
//! - [`TtlCache`] keeps successful response bodies until their TTL runs out
//! - [`InFlightRequests`] lets concurrent identical requests share one upstream call
//! - [`CacheSweeper`] evicts dead entries in the background
//!
//! Both tables are keyed by [`CacheKey`].

pub mod cache_keys;
pub mod coalescer;
pub mod metrics;
pub mod sweeper;
pub mod ttl_cache;

pub use cache_keys::CacheKey;
pub use coalescer::{InFlightRequests, SharedCall};
pub use metrics::{register_metrics, BoundaryMetrics};
pub use sweeper::CacheSweeper;
pub use ttl_cache::{TtlCache, MAX_ENTRY_TTL};
