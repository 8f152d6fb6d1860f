//! Result Shaper
//!
//! Filters and orders a beer listing according to request criteria.

use crate::beer::{Beer, FilterCriteria, SortOrder};

/// Applies name, year and food filters, then the ABV ordering.
#[derive(Debug, Clone)]
pub struct Shaper {
    /// Lower-case token searched for in beer names
    name_marker: String,
}

impl Shaper {
    pub fn new(name_marker: impl Into<String>) -> Self {
        Self {
            name_marker: name_marker.into().to_lowercase(),
        }
    }

    pub fn name_marker(&self) -> &str {
        &self.name_marker
    }

    /// Shapes `items` for `criteria`.
    ///
    /// Steps run in a fixed order: name, year, food, sort. Sorting is stable,
    /// so beers with equal ABV keep their upstream order.
    pub fn shape<I>(&self, items: I, criteria: &FilterCriteria) -> Vec<Beer>
    where
        I: IntoIterator<Item = Beer>,
    {
        let food = criteria.required_food_pairing.to_lowercase();

        let mut shaped: Vec<Beer> = items
            .into_iter()
            .filter(|beer| self.matches_name(beer, criteria))
            .filter(|beer| matches_year(beer, criteria.min_year_exclusive))
            .filter(|beer| matches_food(beer, &food))
            .collect();

        match criteria.abv_sort_order {
            SortOrder::Asc => shaped.sort_by(|a, b| a.abv.total_cmp(&b.abv)),
            SortOrder::Desc => shaped.sort_by(|a, b| b.abv.total_cmp(&a.abv)),
            SortOrder::None => {}
        }

        shaped
    }

    fn matches_name(&self, beer: &Beer, criteria: &FilterCriteria) -> bool {
        !criteria.include_only_matching_name
            || beer.name.to_lowercase().contains(&self.name_marker)
    }
}

fn matches_year(beer: &Beer, min_year_exclusive: i32) -> bool {
    min_year_exclusive == 0 || beer.first_brewed_year() > min_year_exclusive
}

// Pairing tags are stored lower-case; membership is exact.
fn matches_food(beer: &Beer, food: &str) -> bool {
    food.is_empty() || beer.food_pairing.iter().any(|f| f == food)
}
