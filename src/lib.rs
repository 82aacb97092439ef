// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Stamp-Weather: annotate Strava activities with the weather at their start.
//!
//! This crate provides the webhook backend that receives "activity created"
//! events, looks up point-in-time weather for the activity's start location
//! and appends a short weather stamp to the activity description.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use services::AnnotationQueue;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub queue: AnnotationQueue,
}
