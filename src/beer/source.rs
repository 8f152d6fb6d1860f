//! Upstream Beer Source
//!
//! The data source the gateway protects, and a randomised stand-in for it.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Datelike;
use rand::seq::SliceRandom;
use rand::Rng;
use tokio_util::sync::CancellationToken;

use crate::beer::model::{Amount, Beer, Hops, Ingredients, Malt};
use crate::error::UpstreamError;

/// A possibly slow, possibly failing catalogue listing.
///
/// Implementations should give up with [`UpstreamError::Cancelled`] once
/// `cancel` fires; timeouts and retries are theirs to decide.
#[async_trait]
pub trait BeerSource: Send + Sync {
    async fn list_all(&self, cancel: &CancellationToken) -> Result<Vec<Beer>, UpstreamError>;
}

const DEFAULT_COUNT: usize = 50;

const ADJECTIVES: &[&str] = &[
    "Hazy", "Golden", "Dark", "Wild", "Hoppy", "Crimson", "Midnight", "Smoked", "Twisted",
    "Old", "Electric", "Lazy",
];

const STYLES: &[&str] = &[
    "IPA", "Double IPA", "Session IPA", "Lager", "Pilsner", "Stout", "Porter", "Pale Ale",
    "Saison", "Wheat Beer", "Sour", "Amber Ale",
];

const PAIRINGS: &[&str] = &[
    "wolf", "fox", "horse", "pig", "cow", "sheep", "chicken", "rabbit", "goat", "llama",
    "panda", "turtle", "salmon", "cod", "frog", "bee",
];

const BREWERS: &[&str] = &[
    "Sam Mason", "Ali Skinner", "Matt Ball", "Jo Ingram", "Kim Hart", "Lee Paton",
];

/// In-process source producing `count` random beers per listing.
#[derive(Debug, Clone)]
pub struct FakeBeerSource {
    count: usize,
    latency: Duration,
}

impl FakeBeerSource {
    /// A zero `count` falls back to 50 beers.
    pub fn new(count: usize) -> Self {
        Self {
            count: if count == 0 { DEFAULT_COUNT } else { count },
            latency: Duration::ZERO,
        }
    }

    /// Delays every listing by `latency`, abandoning it on cancellation.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn count(&self) -> usize {
        self.count
    }

    fn generate(&self) -> Vec<Beer> {
        let mut rng = rand::thread_rng();
        let this_year = chrono::Utc::now().year();
        (1..=self.count as u32)
            .map(|id| fake_beer(&mut rng, id, this_year))
            .collect()
    }
}

#[async_trait]
impl BeerSource for FakeBeerSource {
    async fn list_all(&self, cancel: &CancellationToken) -> Result<Vec<Beer>, UpstreamError> {
        if cancel.is_cancelled() {
            return Err(UpstreamError::Cancelled);
        }

        if !self.latency.is_zero() {
            tokio::select! {
                _ = cancel.cancelled() => return Err(UpstreamError::Cancelled),
                _ = tokio::time::sleep(self.latency) => {}
            }
        }

        Ok(self.generate())
    }
}

fn fake_beer<R: Rng>(rng: &mut R, id: u32, this_year: i32) -> Beer {
    let year = rng.gen_range(this_year - 34..=this_year - 4);
    let month = rng.gen_range(1..=12);
    let abv = (rng.gen_range(1.0..=15.0_f64) * 10.0).round() / 10.0;

    let pairings = rng.gen_range(1..=5);
    let food_pairing = (0..pairings)
        .filter_map(|_| PAIRINGS.choose(rng))
        .map(|f| f.to_string())
        .collect();

    let adjective = ADJECTIVES.choose(rng).copied().unwrap_or("House");
    let style = STYLES.choose(rng).copied().unwrap_or("Ale");

    Beer {
        id,
        name: format!("{} {}", adjective, style),
        tagline: format!("A {} for every season.", style.to_lowercase()),
        first_brewed: format!("{:04}-{:02}", year, month),
        description: format!("{} {} brewed in small batches.", adjective, style),
        abv,
        ingredients: Ingredients {
            malt: vec![Malt {
                name: "Extra Pale".to_string(),
                amount: Amount {
                    value: 5.0,
                    unit: "kilograms".to_string(),
                },
            }],
            hops: vec![
                Hops {
                    name: "Cascade".to_string(),
                    amount: Amount {
                        value: 25.0,
                        unit: "grams".to_string(),
                    },
                    add: "start".to_string(),
                    attribute: "bitter".to_string(),
                },
                Hops {
                    name: "Citra".to_string(),
                    amount: Amount {
                        value: 25.0,
                        unit: "grams".to_string(),
                    },
                    add: "end".to_string(),
                    attribute: "aroma".to_string(),
                },
            ],
            yeast: "Wyeast 1056 - American Ale".to_string(),
        },
        food_pairing,
        brewers_tips: "Keep the fermentation temperature steady.".to_string(),
        contributed_by: BREWERS.choose(rng).copied().unwrap_or("Anonymous").to_string(),
    }
}
