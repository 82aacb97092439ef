// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Strava activity model as returned by `GET /activities/{id}`.

use serde::Deserialize;

/// Detailed Strava activity, fetched fresh for every pipeline run.
///
/// Only the fields the annotation pipeline reads are modelled; unknown
/// fields are ignored. Flags that Strava may omit are kept optional so
/// the provider default is applied explicitly rather than by accident.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityRecord {
    pub id: u64,
    #[serde(default)]
    pub description: Option<String>,
    /// Start time (ISO 8601, UTC)
    #[serde(default)]
    pub start_date: String,
    /// `[lat, lng]`, empty or null when the activity has no GPS fix
    #[serde(default)]
    pub start_latlng: Option<Vec<f64>>,
    /// Provider default: false
    #[serde(default)]
    pub manual: Option<bool>,
    /// Provider default: false
    #[serde(default)]
    pub trainer: Option<bool>,
    /// Activity kind (Ride, Run, VirtualRide, ...)
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl ActivityRecord {
    pub fn is_manual(&self) -> bool {
        self.manual.unwrap_or(false)
    }

    pub fn is_trainer(&self) -> bool {
        self.trainer.unwrap_or(false)
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    /// Start location, or `None` when absent or the all-zero pair.
    pub fn start_location(&self) -> Option<(f64, f64)> {
        match self.start_latlng.as_deref() {
            Some([lat, lng, ..]) if !(*lat == 0.0 && *lng == 0.0) => Some((*lat, *lng)),
            _ => None,
        }
    }
}
