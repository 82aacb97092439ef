// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava API client for fetching and updating activities.
//!
//! Handles:
//! - Activity fetching
//! - Activity description updates
//! - OAuth token refresh
//!
//! No call is retried; a failed request is reported to the caller once.

use crate::config::Config;
use crate::error::AppError;
use crate::models::{ActivityRecord, Credential};
use serde::Deserialize;

/// Strava API client.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    base_url: String,
    oauth_url: String,
    client_id: String,
    client_secret: String,
}

impl StravaClient {
    /// Create a new Strava client with OAuth credentials.
    pub fn new(
        base_url: impl Into<String>,
        oauth_url: impl Into<String>,
        client_id: String,
        client_secret: String,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            oauth_url: oauth_url.into(),
            client_id,
            client_secret,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.strava_api_url.clone(),
            config.strava_oauth_url.clone(),
            config.strava_client_id.clone(),
            config.strava_client_secret.clone(),
        )
    }

    /// Get a detailed activity by ID.
    pub async fn get_activity(
        &self,
        activity_id: u64,
        credential: &Credential,
    ) -> Result<ActivityRecord, AppError> {
        tracing::debug!(activity_id, athlete_id = credential.athlete_id, "Fetching activity");

        let url = format!("{}/activities/{}", self.base_url, activity_id);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&credential.access_token)
            .send()
            .await
            .map_err(|e| AppError::ActivityFetchFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(activity_id, status = status.as_u16(), "Activity fetch rejected");
            return Err(AppError::ActivityFetchFailed(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::ActivityFetchFailed(format!("JSON parse error: {}", e)))
    }

    /// Update an activity's description.
    ///
    /// Anything other than 200 is a failure.
    pub async fn update_activity_description(
        &self,
        activity_id: u64,
        description: &str,
        credential: &Credential,
    ) -> Result<(), AppError> {
        tracing::info!(
            activity_id,
            athlete_id = credential.athlete_id,
            "Updating activity description"
        );

        let url = format!("{}/activities/{}", self.base_url, activity_id);

        let body = serde_json::json!({
            "description": description
        });

        let response = self
            .http
            .put(&url)
            .bearer_auth(&credential.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::ActivityUpdateFailed(e.to_string()))?;

        let status = response.status();
        tracing::info!(activity_id, status = status.as_u16(), "Activity update response");

        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                activity_id,
                status = status.as_u16(),
                "Unexpected activity update status"
            );
            return Err(AppError::ActivityUpdateFailed(format!("HTTP {}: {}", status, body)));
        }

        Ok(())
    }

    /// Exchange a refresh token for a new token set.
    pub async fn refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<TokenRefreshResponse, AppError> {
        let response = self
            .http
            .post(&self.oauth_url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|e| {
                AppError::TokenRefreshFailed(format!("Token refresh request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::TokenRefreshFailed(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::TokenRefreshFailed(format!("JSON parse error: {}", e)))
    }
}

/// Token refresh response from Strava.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRefreshResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
}

impl TokenRefreshResponse {
    /// Attach the response to the athlete whose token was refreshed.
    pub fn into_credential(self, athlete_id: u64) -> Credential {
        Credential {
            athlete_id,
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at: self.expires_at,
        }
    }
}
