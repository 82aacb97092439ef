//! OAuth credential model for storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user's OAuth credentials, one document per athlete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Strava athlete ID (also used as document ID)
    pub athlete_id: u64,
    pub access_token: String,
    pub refresh_token: String,
    /// When the access token expires (Unix seconds)
    pub expires_at: i64,
}

impl Credential {
    /// Whether the access token is still usable at `now`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now.timestamp()
    }
}
