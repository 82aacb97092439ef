// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Token refresh failed: {0}")]
    TokenRefreshFailed(String),

    #[error("Activity fetch failed: {0}")]
    ActivityFetchFailed(String),

    #[error("Weather unavailable: {0}")]
    WeatherUnavailable(String),

    #[error("Activity update failed: {0}")]
    ActivityUpdateFailed(String),

    #[error("Persistence failed: {0}")]
    PersistenceFailed(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// True for failures caused by an upstream HTTP API rather than by us.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            AppError::TokenRefreshFailed(_)
                | AppError::ActivityFetchFailed(_)
                | AppError::WeatherUnavailable(_)
                | AppError::ActivityUpdateFailed(_)
        )
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "forbidden", None),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::TokenRefreshFailed(msg)
            | AppError::ActivityFetchFailed(msg)
            | AppError::WeatherUnavailable(msg)
            | AppError::ActivityUpdateFailed(msg) => {
                (StatusCode::BAD_GATEWAY, "upstream_error", Some(msg.clone()))
            }
            AppError::PersistenceFailed(msg) => {
                tracing::error!(error = %msg, "Persistence error");
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
