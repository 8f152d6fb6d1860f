//! Beer Gateway - A read-through catalogue gateway
//!
//! Serves beer listings from an upstream source it does not control, with
//! TTL caching, token-bucket admission control and post-fetch shaping.

pub mod admission;
pub mod api;
pub mod beer;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use beer::BeerService;
pub use config::Config;
pub use tasks::Sweeper;
