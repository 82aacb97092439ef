// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! De-identified analytics events.

use crate::db::FirestoreDb;
use crate::models::AnalyticsEvent;
use sha2::{Digest, Sha256};

/// Payload recorded when a user revokes access.
pub const DELETE_USER_EVENT: &str = r#"{"event_type":"user_unsubscribed"}"#;

/// One-way identifier for an athlete within a service.
pub fn anonymize(athlete_id: u64, service: &str) -> String {
    let digest = Sha256::digest(format!("{}-{}", athlete_id, service).as_bytes());
    hex::encode(digest)
}

/// Appends analytics rows. Failures are logged, never returned.
#[derive(Clone)]
pub struct EventRecorder {
    db: FirestoreDb,
}

impl EventRecorder {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Record `payload` for `athlete_id` under `service`.
    pub async fn record(&self, athlete_id: u64, service: &str, payload: &serde_json::Value) {
        self.record_raw(athlete_id, service, payload.to_string()).await;
    }

    /// Record an already-serialized JSON payload.
    pub async fn record_raw(&self, athlete_id: u64, service: &str, payload: String) {
        let anonymous_id = anonymize(athlete_id, service);
        let event = AnalyticsEvent {
            event_time: chrono::Utc::now().timestamp(),
            anonymous_id: anonymous_id.clone(),
            service: service.to_string(),
            event: payload,
        };

        match self.db.append_event(&event).await {
            Ok(()) => tracing::debug!(anonymous_id = %anonymous_id, "Analytics event recorded"),
            Err(e) => tracing::warn!(
                anonymous_id = %anonymous_id,
                error = %e,
                "Failed to record analytics event"
            ),
        }
    }
}
