// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time parsing.

use crate::error::AppError;
use chrono::DateTime;

/// Parse an RFC3339 activity start date into Unix seconds.
pub fn parse_start_epoch(start_date: &str) -> Result<i64, AppError> {
    DateTime::parse_from_rfc3339(start_date)
        .map(|dt| dt.timestamp())
        .map_err(|e| AppError::BadRequest(format!("Invalid start_date {:?}: {}", start_date, e)))
}
