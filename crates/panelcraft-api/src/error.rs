//! Panelcraft — API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use panelcraft_core::error::StoryError;
use panelcraft_proxy::ProxyError;
use serde::Serialize;
use thiserror::Error;

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer wrapper around `StoryError` that implements `IntoResponse`.
#[derive(Debug)]
pub struct ApiError(pub StoryError);

impl From<StoryError> for ApiError {
    fn from(err: StoryError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self.0 {
            StoryError::InvalidTransition { .. } => (StatusCode::CONFLICT, "invalid_transition"),
            StoryError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            StoryError::Configuration(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "configuration_error")
            }
            StoryError::Upstream { .. } => (StatusCode::BAD_GATEWAY, "upstream_error"),
            StoryError::UnsupportedShape => (StatusCode::BAD_GATEWAY, "unsupported_shape"),
        };

        let body = ErrorBody {
            error: error_code,
            message: self.0.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// JSON body returned by the proxy endpoints when forwarding fails.
#[derive(Debug, Serialize)]
pub struct ProxyErrorBody {
    /// The failure message.
    pub error: String,
}

/// HTTP-layer wrapper around `ProxyError`: always a 500 with `{ error }`.
#[derive(Debug)]
pub struct ProxyFailure(pub ProxyError);

impl From<ProxyError> for ProxyFailure {
    fn from(err: ProxyError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ProxyFailure {
    fn into_response(self) -> Response {
        let body = ProxyErrorBody {
            error: self.0.to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
