//! Request DTOs for the gateway API
//!
//! Defines the query parameters accepted by the filtered listing endpoint.

use serde::Deserialize;

use crate::beer::{FilterCriteria, SortOrder};

/// Query string for `GET /beer/getFiltered`
///
/// Every parameter is optional; supplied values override
/// [`FilterCriteria::service_defaults`]. Values are kept as raw strings so
/// malformed input can be reported with a JSON error body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterQuery {
    pub include_ipa: Option<String>,
    pub year: Option<String>,
    pub has_food: Option<String>,
    pub abv_sort_order: Option<String>,
}

impl FilterQuery {
    /// Applies the query on top of the default filters.
    ///
    /// Returns an error message naming the first malformed parameter.
    pub fn into_criteria(self) -> Result<FilterCriteria, String> {
        let mut criteria = FilterCriteria::service_defaults();

        if let Some(raw) = non_empty(self.include_ipa) {
            criteria.include_only_matching_name = parse_bool(&raw)
                .ok_or_else(|| format!("includeIpa: invalid boolean '{}'", raw))?;
        }

        if let Some(raw) = non_empty(self.year) {
            criteria.min_year_exclusive = raw
                .parse()
                .map_err(|_| format!("year: invalid integer '{}'", raw))?;
        }

        if let Some(food) = non_empty(self.has_food) {
            criteria.required_food_pairing = food;
        }

        if let Some(raw) = non_empty(self.abv_sort_order) {
            criteria.abv_sort_order = raw
                .parse::<SortOrder>()
                .map_err(|e| format!("abvSortOrder: {}", e))?;
        }

        Ok(criteria)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Accepts the usual spellings of a boolean flag.
fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
