//! Cache Module
//!
//! Provides in-memory caching with TTL expiration, read either lazily on
//! lookup or in bulk by the background sweeper.

mod entry;
mod stats;
mod store;
mod ttl;


// Re-export public types
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::{CacheStore, Lookup};
pub use ttl::TtlCache;
