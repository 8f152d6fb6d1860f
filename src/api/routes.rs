//! API Routes
//!
//! Configures the Axum router with all gateway endpoints.

use axum::{
    http::{header, HeaderValue},
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use super::handlers::{
    filtered_handler, health_handler, list_all_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /beer/getAll` - Whole catalogue, uncached
/// - `GET /beer/getFiltered` - Cached, rate-limited, shaped catalogue
/// - `GET /stats` - Cache and admission statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - Security headers: `nosniff` and `DENY` framing on every response
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let beer = Router::new()
        .route("/getAll", get(list_all_handler))
        .route("/getFiltered", get(filtered_handler));

    Router::new()
        .nest("/beer", beer)
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
