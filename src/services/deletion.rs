// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Local cleanup after an athlete revokes access.

use crate::config::SERVICE_TAG;
use crate::db::FirestoreDb;
use crate::services::events::{EventRecorder, DELETE_USER_EVENT};

/// Removes an athlete's stored data. Each step is best effort.
#[derive(Clone)]
pub struct UserDeletion {
    db: FirestoreDb,
    events: EventRecorder,
}

impl UserDeletion {
    pub fn new(db: FirestoreDb) -> Self {
        Self {
            events: EventRecorder::new(db.clone()),
            db,
        }
    }

    /// Delete credentials and settings, then record the unsubscribe.
    pub async fn delete_user(&self, athlete_id: u64) {
        tracing::info!(athlete_id, "Removing user");

        if let Err(e) = self.db.delete_credential(athlete_id).await {
            tracing::error!(athlete_id, error = %e, "Failed to delete credentials");
        }

        if let Err(e) = self.db.delete_settings(athlete_id).await {
            tracing::error!(athlete_id, error = %e, "Failed to delete settings");
        }

        self.events
            .record_raw(athlete_id, SERVICE_TAG, DELETE_USER_EVENT.to_string())
            .await;
    }
}
