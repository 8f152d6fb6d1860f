//! Error types for the beer gateway
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Upstream Error Enum ==
/// Failures reported by an upstream beer source.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    /// The upstream could not produce a listing
    #[error("Upstream unavailable: {0}")]
    Unavailable(String),

    /// The caller gave up before the upstream answered
    #[error("Upstream request cancelled")]
    Cancelled,
}

// == Service Error Enum ==
/// Unified error type for the gateway's request paths.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Admission gate denied the upstream call
    #[error("API rate limit exceeded")]
    RateLimitExceeded,

    /// Upstream failure, surfaced unchanged
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// Malformed request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServiceError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            ServiceError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Config Error Enum ==
/// Rejected configuration values.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("{0} must not be empty")]
    Empty(&'static str),
}

// == Result Type Alias ==
/// Convenience Result type for the gateway.
pub type Result<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_maps_to_429() {
        let response = ServiceError::RateLimitExceeded.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn test_upstream_maps_to_500() {
        let err: ServiceError = UpstreamError::Unavailable("boom".to_string()).into();
        assert_eq!(err.to_string(), "Upstream unavailable: boom");
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_invalid_request_maps_to_400() {
        let response = ServiceError::InvalidRequest("year".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
