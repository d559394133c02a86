//! Congestion data collaborators.
//!
//! The planner consumes crowding levels through [`CongestionProvider`].
//! Implementations here: an in-memory table, a TTL cache wrapper, and an
//! HTTP client with a per-request timeout.

mod cache;
mod client;
mod error;
mod provider;

pub use cache::{CachedCongestion, CongestionCacheConfig};
pub use client::{CongestionClient, CongestionClientConfig};
pub use error::CongestionError;
pub use provider::{CongestionProvider, StaticCongestion, level_or_default};
