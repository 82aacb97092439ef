// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth token lifecycle: lazy refresh with write-back.

use crate::db::FirestoreDb;
use crate::error::AppError;
use crate::models::Credential;
use crate::services::StravaClient;
use chrono::{DateTime, Utc};

/// Keeps an athlete's stored credential usable.
///
/// Refresh is best effort: if Strava cannot be reached or rejects the
/// refresh, the stored credential is handed back as-is and the next API
/// call reports the real failure.
#[derive(Clone)]
pub struct TokenManager {
    client: StravaClient,
    db: FirestoreDb,
}

impl TokenManager {
    pub fn new(client: StravaClient, db: FirestoreDb) -> Self {
        Self { client, db }
    }

    /// Return a credential for `athlete_id`, refreshing it if expired.
    pub async fn ensure_valid(&self, athlete_id: u64) -> Result<Credential, AppError> {
        self.ensure_valid_at(athlete_id, Utc::now()).await
    }

    /// Same as [`ensure_valid`](Self::ensure_valid) with an explicit clock.
    pub async fn ensure_valid_at(
        &self,
        athlete_id: u64,
        now: DateTime<Utc>,
    ) -> Result<Credential, AppError> {
        let stored = self
            .db
            .get_credential(athlete_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Credential for athlete {}", athlete_id)))?;

        Ok(self.refresh_if_expired(stored, now).await)
    }

    /// Refresh `stored` when it has expired at `now`.
    ///
    /// Never fails: on any refresh error the input is returned unchanged.
    pub async fn refresh_if_expired(&self, stored: Credential, now: DateTime<Utc>) -> Credential {
        let athlete_id = stored.athlete_id;

        if stored.is_valid_at(now) {
            tracing::debug!(athlete_id, "Stored tokens are still valid");
            return stored;
        }

        tracing::info!(
            athlete_id,
            expires_at = stored.expires_at,
            "Access token expired, refreshing"
        );

        let refreshed = match self.client.refresh_token(&stored.refresh_token).await {
            Ok(response) => response.into_credential(athlete_id),
            Err(e) => {
                tracing::warn!(
                    athlete_id,
                    error = %e,
                    "Token refresh failed, continuing with stored tokens"
                );
                return stored;
            }
        };

        if refreshed.expires_at > stored.expires_at {
            match self.db.set_credential(&refreshed).await {
                Ok(()) => tracing::info!(
                    athlete_id,
                    expires_at = refreshed.expires_at,
                    "Refreshed tokens persisted"
                ),
                Err(e) => {
                    tracing::warn!(athlete_id, error = %e, "Failed to persist refreshed tokens")
                }
            }
        } else {
            tracing::warn!(
                athlete_id,
                stored_expires_at = stored.expires_at,
                refreshed_expires_at = refreshed.expires_at,
                "Refresh returned no newer expiry, not persisting"
            );
        }

        refreshed
    }
}
