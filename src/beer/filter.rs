//! Filter Criteria
//!
//! Request-scoped filter settings and the cache key derived from them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// == Sort Order ==
/// Ordering applied to shaped results by ABV.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Keep upstream order
    #[default]
    None,
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::None => "none",
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(SortOrder::None),
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!(
                "unknown sort order '{}', expected asc, desc or none",
                other
            )),
        }
    }
}

// == Filter Criteria ==
/// Filters and ordering for one request. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FilterCriteria {
    /// Keep only beers whose name contains the configured marker
    pub include_only_matching_name: bool,
    /// Keep only beers first brewed after this year; 0 disables the filter
    pub min_year_exclusive: i32,
    /// Keep only beers paired with this food; empty disables the filter
    pub required_food_pairing: String,
    pub abv_sort_order: SortOrder,
}

impl FilterCriteria {
    /// Filters applied by the HTTP layer before query overrides.
    pub fn service_defaults() -> Self {
        Self {
            include_only_matching_name: true,
            min_year_exclusive: 2015,
            required_food_pairing: "wolf".to_string(),
            abv_sort_order: SortOrder::Asc,
        }
    }

    /// True when no filter or ordering is requested.
    pub fn is_unset(&self) -> bool {
        *self == Self::default()
    }

    // == Cache Key ==
    /// Deterministic key joining every field in a fixed order.
    ///
    /// The food pairing is the only free-form field and comes last, after
    /// three colon-free tokens, so distinct criteria never collide.
    pub fn cache_key(&self) -> String {
        format!(
            "{}:{}:{}:{}",
            self.include_only_matching_name,
            self.min_year_exclusive,
            self.abv_sort_order,
            self.required_food_pairing
        )
    }
}

// == Cache Policy ==
/// Whether a filtered request may be served from, and stored in, the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    Use,
    Bypass,
}

// == Filter Request ==
/// A filtered listing request.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterRequest {
    pub criteria: FilterCriteria,
    pub cache: CachePolicy,
}

impl FilterRequest {
    /// Builds a request that uses the cache, unless no criteria are set.
    pub fn new(criteria: FilterCriteria) -> Self {
        let cache = if criteria.is_unset() {
            CachePolicy::Bypass
        } else {
            CachePolicy::Use
        };
        Self { criteria, cache }
    }

    /// Builds a request that always goes to the upstream.
    pub fn bypassing_cache(criteria: FilterCriteria) -> Self {
        Self {
            criteria,
            cache: CachePolicy::Bypass,
        }
    }

    /// Key to read and populate, or `None` when the cache is bypassed.
    pub fn cache_key(&self) -> Option<String> {
        match self.cache {
            CachePolicy::Use => Some(self.criteria.cache_key()),
            CachePolicy::Bypass => None,
        }
    }
}
