// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Loaded once at startup and handed to each component at construction.
//! Nothing below `main` reads the process environment.

use std::env;
use std::str::FromStr;

/// Default Strava REST API base.
pub const STRAVA_API_URL: &str = "https://www.strava.com/api/v3";
/// Default Strava OAuth token endpoint.
pub const STRAVA_OAUTH_URL: &str = "https://www.strava.com/oauth/token";
/// Default OpenWeather point-in-time endpoint.
pub const WEATHER_API_URL: &str = "https://api.openweathermap.org/data/3.0/onecall/timemachine";

/// Service tag used for analytics events from this integration.
pub const SERVICE_TAG: &str = "strava";

/// Which storage backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Firestore,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "firestore" => Ok(StorageBackend::Firestore),
            "memory" => Ok(StorageBackend::Memory),
            _ => Err(ConfigError::Invalid("STORAGE_BACKEND", s.to_string())),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Strava OAuth client ID (public)
    pub strava_client_id: String,
    /// Expected webhook subscription ID; events for other subscriptions are rejected
    pub strava_subscription_id: Option<u64>,
    /// GCP project ID
    pub gcp_project_id: String,
    /// Storage backend
    pub storage_backend: StorageBackend,
    /// Server port
    pub port: u16,
    pub strava_api_url: String,
    pub strava_oauth_url: String,
    pub weather_api_url: String,

    // --- Secrets ---
    /// Strava OAuth client secret
    pub strava_client_secret: String,
    /// OpenWeather API key
    pub weather_api_key: String,
    /// Webhook verification token
    pub webhook_verify_token: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let strava_subscription_id = match env::var("STRAVA_SUBSCRIPTION_ID") {
            Ok(v) => Some(
                v.trim()
                    .parse()
                    .map_err(|_| ConfigError::Invalid("STRAVA_SUBSCRIPTION_ID", v.clone()))?,
            ),
            Err(_) => None,
        };

        Ok(Self {
            strava_client_id: env::var("STRAVA_CLIENT_ID")
                .map_err(|_| ConfigError::Missing("STRAVA_CLIENT_ID"))?,
            strava_subscription_id,
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            storage_backend: env::var("STORAGE_BACKEND")
                .unwrap_or_else(|_| "firestore".to_string())
                .parse()?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            strava_api_url: env::var("STRAVA_API_URL")
                .unwrap_or_else(|_| STRAVA_API_URL.to_string()),
            strava_oauth_url: env::var("STRAVA_OAUTH_URL")
                .unwrap_or_else(|_| STRAVA_OAUTH_URL.to_string()),
            weather_api_url: env::var("WEATHER_API_URL")
                .unwrap_or_else(|_| WEATHER_API_URL.to_string()),

            strava_client_secret: env::var("STRAVA_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STRAVA_CLIENT_SECRET"))?,
            weather_api_key: env::var("WEATHER_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("WEATHER_API_KEY"))?,
            webhook_verify_token: env::var("STRAVA_VERIFY_TOKEN")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STRAVA_VERIFY_TOKEN"))?,
        })
    }

    /// Fixed configuration for tests.
    pub fn test_default() -> Self {
        Self {
            strava_client_id: "test_client_id".to_string(),
            strava_subscription_id: Some(12345),
            gcp_project_id: "test-project".to_string(),
            storage_backend: StorageBackend::Memory,
            port: 8080,
            strava_api_url: STRAVA_API_URL.to_string(),
            strava_oauth_url: STRAVA_OAUTH_URL.to_string(),
            weather_api_url: WEATHER_API_URL.to_string(),
            strava_client_secret: "test_secret".to_string(),
            weather_api_key: "test_weather_key".to_string(),
            webhook_verify_token: "test_verify_token".to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
