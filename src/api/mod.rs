//! API Module
//!
//! HTTP handlers and routing for the gateway REST API.
//!
//! # Endpoints
//! - `GET /beer/getAll` - List the whole catalogue
//! - `GET /beer/getFiltered` - List the filtered, sorted catalogue
//! - `GET /stats` - Get cache and rate limiter statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
