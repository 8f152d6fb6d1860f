//! Beer Model
//!
//! Catalogue item as listed by the upstream source.

use serde::{Deserialize, Serialize};

/// A beer listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beer {
    pub id: u32,
    pub name: String,
    pub tagline: String,
    /// First production month, `YYYY-MM`
    pub first_brewed: String,
    pub description: String,
    /// Alcohol by volume, in percent
    pub abv: f64,
    pub ingredients: Ingredients,
    /// Lower-case pairing tags
    pub food_pairing: Vec<String>,
    pub brewers_tips: String,
    pub contributed_by: String,
}

impl Beer {
    /// Year of first production, taken from the first four characters of
    /// `first_brewed`. Anything that is not four ASCII digits yields 0.
    pub fn first_brewed_year(&self) -> i32 {
        let trimmed = self.first_brewed.trim();
        match trimmed.get(..4) {
            Some(year) if year.bytes().all(|b| b.is_ascii_digit()) => {
                year.parse().unwrap_or(0)
            }
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ingredients {
    pub malt: Vec<Malt>,
    pub hops: Vec<Hops>,
    pub yeast: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Amount {
    pub value: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Malt {
    pub name: String,
    pub amount: Amount,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hops {
    pub name: String,
    pub amount: Amount,
    pub add: String,
    pub attribute: String,
}

#[cfg(test)]
pub(crate) fn sample_beer(id: u32, name: &str, first_brewed: &str, abv: f64, foods: &[&str]) -> Beer {
    Beer {
        id,
        name: name.to_string(),
        tagline: String::new(),
        first_brewed: first_brewed.to_string(),
        description: String::new(),
        abv,
        ingredients: Ingredients::default(),
        food_pairing: foods.iter().map(|f| f.to_string()).collect(),
        brewers_tips: String::new(),
        contributed_by: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brewed(date: &str) -> i32 {
        sample_beer(1, "x", date, 5.0, &[]).first_brewed_year()
    }

    #[test]
    fn test_year_from_well_formed_date() {
        assert_eq!(brewed("2016-01"), 2016);
        assert_eq!(brewed(" 1999-12 "), 1999);
        assert_eq!(brewed("2007"), 2007);
    }

    #[test]
    fn test_year_from_malformed_date_is_zero() {
        assert_eq!(brewed("abcd-01"), 0);
        assert_eq!(brewed("+201-01"), 0);
        assert_eq!(brewed("20"), 0);
        assert_eq!(brewed(""), 0);
        assert_eq!(brewed("ü201"), 0);
    }

    #[test]
    fn test_beer_json_field_names() {
        let beer = sample_beer(7, "Punk IPA", "2007-04", 5.6, &["spicy carne asada"]);
        let json = serde_json::to_value(&beer).unwrap();

        assert_eq!(json["first_brewed"], "2007-04");
        assert_eq!(json["food_pairing"][0], "spicy carne asada");
        assert_eq!(json["abv"], 5.6);
    }
}
