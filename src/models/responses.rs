//! Response DTOs for the gateway API
//!
//! Defines the structure of outgoing HTTP response bodies that are not plain
//! beer listings.

use serde::Serialize;

use crate::beer::ServiceStats;

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub cache_expired: u64,
    pub cache_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub cache_hit_rate: f64,
    pub admitted: u64,
    pub rate_limited: u64,
    pub available_tokens: f64,
}

impl From<ServiceStats> for StatsResponse {
    fn from(stats: ServiceStats) -> Self {
        Self {
            cache_hits: stats.cache.hits,
            cache_misses: stats.cache.misses,
            cache_expired: stats.cache.expired,
            cache_entries: stats.cache.total_entries,
            cache_hit_rate: stats.hit_rate,
            admitted: stats.admission.admitted,
            rate_limited: stats.admission.denied,
            available_tokens: stats.admission.available_tokens,
        }
    }
}
