// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use stamp_weather::config::Config;
use stamp_weather::db::FirestoreDb;
use stamp_weather::models::Credential;
use stamp_weather::routes::create_router;
use stamp_weather::services::{AnnotationPipeline, AnnotationQueue, JobFailure, UserDeletion};
use stamp_weather::AppState;
use std::sync::Arc;
use tokio::sync::mpsc;

#[allow(dead_code)]
pub const ATHLETE_ID: u64 = 8675309;
#[allow(dead_code)]
pub const ACTIVITY_ID: u64 = 4242;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Test config with every upstream pointed at `base` (a wiremock server).
#[allow(dead_code)]
pub fn config_for(base: &str) -> Config {
    Config {
        strava_api_url: format!("{}/api/v3", base),
        strava_oauth_url: format!("{}/oauth/token", base),
        weather_api_url: format!("{}/data/3.0/onecall/timemachine", base),
        ..Config::test_default()
    }
}

/// Current Unix time.
#[allow(dead_code)]
pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

#[allow(dead_code)]
pub fn credential(access_token: &str, refresh_token: &str, expires_at: i64) -> Credential {
    Credential {
        athlete_id: ATHLETE_ID,
        access_token: access_token.to_string(),
        refresh_token: refresh_token.to_string(),
        expires_at,
    }
}

/// A fresh in-memory store holding one credential.
#[allow(dead_code)]
pub async fn db_with(credential: &Credential) -> FirestoreDb {
    let db = FirestoreDb::new_in_memory();
    db.set_credential(credential).await.unwrap();
    db
}

/// Activity JSON as Strava returns it, outdoor ride with GPS.
#[allow(dead_code)]
pub fn outdoor_ride(description: &str) -> serde_json::Value {
    serde_json::json!({
        "id": ACTIVITY_ID,
        "name": "Morning Ride",
        "description": description,
        "start_date": "2024-05-01T08:00:00Z",
        "start_date_local": "2024-05-01T01:00:00Z",
        "start_latlng": [37.4, -122.1],
        "manual": false,
        "trainer": false,
        "type": "Ride",
        "sport_type": "Ride"
    })
}

/// Time machine response with one observation.
#[allow(dead_code)]
pub fn weather_body() -> serde_json::Value {
    serde_json::json!({
        "lat": 37.4,
        "lon": -122.1,
        "timezone": "America/Los_Angeles",
        "timezone_offset": -25200,
        "data": [{
            "dt": 1714550400,
            "temp": 18.42,
            "feels_like": 17.9,
            "pressure": 1015,
            "humidity": 65,
            "dew_point": 11.7,
            "uvi": 0.2,
            "clouds": 40,
            "visibility": 10000,
            "wind_speed": 3.2,
            "wind_gust": 5.1,
            "wind_deg": 100,
            "weather": [{"id": 802, "main": "Clouds", "description": "scattered clouds"}]
        }]
    })
}

/// Create a test app backed by `db`.
/// Returns the router, the shared state and the worker failure channel.
#[allow(dead_code)]
pub fn create_test_app(
    config: Config,
    db: FirestoreDb,
) -> (axum::Router, Arc<AppState>, mpsc::UnboundedReceiver<JobFailure>) {
    let pipeline = AnnotationPipeline::from_config(&config, db.clone());
    let (queue, failures) = AnnotationQueue::spawn(pipeline, UserDeletion::new(db));

    let state = Arc::new(AppState { config, queue });

    (create_router(state.clone()), state, failures)
}
