//! API Handlers
//!
//! HTTP request handlers for each gateway endpoint.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tokio_util::sync::CancellationToken;

use crate::beer::{Beer, BeerService, FilterRequest};
use crate::config::Config;
use crate::error::{Result, ServiceError};
use crate::models::{FilterQuery, HealthResponse, StatsResponse};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<BeerService>,
}

impl AppState {
    pub fn new(service: BeerService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Starts the cache sweeper, so it must be called inside a tokio runtime.
    pub fn from_config(config: &Config) -> Self {
        Self::new(BeerService::from_config(config))
    }
}

/// Token that fires when the handler future is dropped, e.g. because the
/// client went away, so the upstream can stop early.
fn request_token() -> (CancellationToken, tokio_util::sync::DropGuard) {
    let token = CancellationToken::new();
    let guard = token.clone().drop_guard();
    (token, guard)
}

fn listing_response(beers: Vec<Beer>) -> Response {
    if beers.is_empty() {
        StatusCode::NO_CONTENT.into_response()
    } else {
        Json(beers).into_response()
    }
}

/// Handler for GET /beer/getAll
///
/// Lists the whole catalogue straight from the upstream.
pub async fn list_all_handler(State(state): State<AppState>) -> Result<Response> {
    let (token, _guard) = request_token();
    let beers = state.service.fetch_all(&token).await?;
    Ok(listing_response(beers))
}

/// Handler for GET /beer/getFiltered
///
/// Lists the catalogue through the cache and admission gate, shaped by the
/// default filters overridden with any query parameters.
pub async fn filtered_handler(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Result<Response> {
    let criteria = query
        .into_criteria()
        .map_err(ServiceError::InvalidRequest)?;

    let (token, _guard) = request_token();
    let beers = state
        .service
        .filtered(&FilterRequest::new(criteria), &token)
        .await?;

    Ok(listing_response(beers))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.service.stats().await))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
