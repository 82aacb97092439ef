//! Analytics event rows.

use serde::{Deserialize, Serialize};

/// One append-only analytics row.
///
/// Only the anonymized id is stored; the athlete ID never appears here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    /// When the event was recorded (Unix seconds)
    pub event_time: i64,
    /// Hex SHA-256 of `"{athlete_id}-{service}"`
    pub anonymous_id: String,
    pub service: String,
    /// Event payload, serialized JSON
    pub event: String,
}
