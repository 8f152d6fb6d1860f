//! Configuration Module
//!
//! Handles loading and managing gateway configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

/// Gateway configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Cache entry lifetime in seconds
    pub cache_ttl: u64,
    /// Background sweep interval in seconds
    pub sweep_interval: u64,
    /// Seconds needed to replenish one admission token
    pub rate_limit_interval: u64,
    /// Admission bucket capacity
    pub rate_limit_burst: u32,
    /// Number of beers the fake upstream lists
    pub upstream_items: usize,
    /// Simulated upstream latency in milliseconds
    pub upstream_latency_ms: u64,
    /// Name token matched by the `includeIpa` filter
    pub name_marker: String,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 8000)
    /// - `CACHE_TTL` - Cache TTL in seconds (default: 120)
    /// - `SWEEP_INTERVAL` - Sweep frequency in seconds (default: 60)
    /// - `RATE_LIMIT_INTERVAL` - Seconds per replenished token (default: 60)
    /// - `RATE_LIMIT_BURST` - Admission burst size (default: 10)
    /// - `UPSTREAM_ITEMS` - Fake upstream listing size (default: 500)
    /// - `UPSTREAM_LATENCY_MS` - Fake upstream latency (default: 0)
    /// - `NAME_MARKER` - Name filter token (default: "ipa")
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cache_ttl: env_or("CACHE_TTL", defaults.cache_ttl),
            sweep_interval: env_or("SWEEP_INTERVAL", defaults.sweep_interval),
            rate_limit_interval: env_or("RATE_LIMIT_INTERVAL", defaults.rate_limit_interval),
            rate_limit_burst: env_or("RATE_LIMIT_BURST", defaults.rate_limit_burst),
            upstream_items: env_or("UPSTREAM_ITEMS", defaults.upstream_items),
            upstream_latency_ms: env_or("UPSTREAM_LATENCY_MS", defaults.upstream_latency_ms),
            name_marker: env::var("NAME_MARKER")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.name_marker),
        }
    }

    /// Rejects values the cache, sweeper or admission gate cannot run with.
    ///
    /// A zero TTL is allowed: every cached entry is then stale on its next read.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sweep_interval == 0 {
            return Err(ConfigError::Zero("SWEEP_INTERVAL"));
        }
        if self.rate_limit_interval == 0 {
            return Err(ConfigError::Zero("RATE_LIMIT_INTERVAL"));
        }
        if self.rate_limit_burst == 0 {
            return Err(ConfigError::Zero("RATE_LIMIT_BURST"));
        }
        if self.name_marker.trim().is_empty() {
            return Err(ConfigError::Empty("NAME_MARKER"));
        }
        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval)
    }

    pub fn rate_limit_interval(&self) -> Duration {
        Duration::from_secs(self.rate_limit_interval)
    }

    pub fn upstream_latency(&self) -> Duration {
        Duration::from_millis(self.upstream_latency_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 8000,
            cache_ttl: 120,
            sweep_interval: 60,
            rate_limit_interval: 60,
            rate_limit_burst: 10,
            upstream_items: 500,
            upstream_latency_ms: 0,
            name_marker: "ipa".to_string(),
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
