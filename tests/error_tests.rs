// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::http::StatusCode;
use axum::response::IntoResponse;
use stamp_weather::error::AppError;

#[test]
fn test_upstream_errors_are_flagged() {
    assert!(AppError::TokenRefreshFailed("x".to_string()).is_upstream());
    assert!(AppError::ActivityFetchFailed("x".to_string()).is_upstream());
    assert!(AppError::WeatherUnavailable("x".to_string()).is_upstream());
    assert!(AppError::ActivityUpdateFailed("x".to_string()).is_upstream());
}

#[test]
fn test_local_errors_are_not_upstream() {
    assert!(!AppError::PersistenceFailed("x".to_string()).is_upstream());
    assert!(!AppError::NotFound("x".to_string()).is_upstream());
    assert!(!AppError::Forbidden.is_upstream());
}

#[test]
fn test_error_status_codes() {
    assert_eq!(
        AppError::WeatherUnavailable("x".to_string())
            .into_response()
            .status(),
        StatusCode::BAD_GATEWAY
    );
    assert_eq!(AppError::Forbidden.into_response().status(), StatusCode::FORBIDDEN);
    assert_eq!(
        AppError::PersistenceFailed("x".to_string())
            .into_response()
            .status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}
