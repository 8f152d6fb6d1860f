//! Beer Module
//!
//! The beer catalogue domain: listing model, filter criteria, result
//! shaping, the upstream source and the read-through service on top of it.

mod filter;
pub(crate) mod model;
mod service;
mod shaper;
mod source;


pub use filter::{CachePolicy, FilterCriteria, FilterRequest, SortOrder};
pub use model::{Amount, Beer, Hops, Ingredients, Malt};
pub use service::{BeerService, Listing, ServiceStats};
pub use shaper::Shaper;
pub use source::{BeerSource, FakeBeerSource};
