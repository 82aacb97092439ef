// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity weather annotation pipeline.
//!
//! Handles the core workflow for one "activity created" event:
//! 1. Ensure the athlete's tokens are usable (refreshing if expired)
//! 2. Fetch the activity from Strava
//! 3. Decide whether it is eligible for a stamp
//! 4. Look up the weather at the start point and time
//! 5. Append the stamp to the activity description on Strava
//! 6. Record a de-identified analytics event
//!
//! A failed step halts the run. Work already done is kept; refreshed
//! tokens in particular stay persisted.

use crate::config::{Config, SERVICE_TAG};
use crate::db::FirestoreDb;
use crate::error::AppError;
use crate::services::policy::{should_annotate, Decision};
use crate::services::{EventRecorder, StravaClient, TokenManager, WeatherClient};
use crate::time_utils::parse_start_epoch;
use std::fmt;
use std::time::Instant;

/// Progress through a single run; the state reached when a step fails is
/// reported with the error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Start,
    TokensEnsured,
    ActivityFetched,
    PolicyEvaluated,
    WeatherObtained,
    DescriptionUpdated,
    EventRecorded,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Start => "start",
            PipelineState::TokensEnsured => "tokens_ensured",
            PipelineState::ActivityFetched => "activity_fetched",
            PipelineState::PolicyEvaluated => "policy_evaluated",
            PipelineState::WeatherObtained => "weather_obtained",
            PipelineState::DescriptionUpdated => "description_updated",
            PipelineState::EventRecorded => "event_recorded",
        };
        f.write_str(name)
    }
}

/// A run that stopped before completing.
#[derive(Debug, thiserror::Error)]
#[error("annotation halted at {state}: {source}")]
pub struct PipelineError {
    pub state: PipelineState,
    #[source]
    pub source: AppError,
}

fn halt_at(state: PipelineState) -> impl FnOnce(AppError) -> PipelineError {
    move |source| PipelineError { state, source }
}

/// Terminal result of a run that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    Skipped(Decision),
    Done { stamp: String, description: String },
}

/// Composes token management, Strava, weather and analytics.
#[derive(Clone)]
pub struct AnnotationPipeline {
    tokens: TokenManager,
    strava: StravaClient,
    weather: WeatherClient,
    events: EventRecorder,
    db: FirestoreDb,
}

impl AnnotationPipeline {
    pub fn new(
        tokens: TokenManager,
        strava: StravaClient,
        weather: WeatherClient,
        events: EventRecorder,
        db: FirestoreDb,
    ) -> Self {
        Self {
            tokens,
            strava,
            weather,
            events,
            db,
        }
    }

    /// Wire up all collaborators from configuration.
    pub fn from_config(config: &Config, db: FirestoreDb) -> Self {
        let strava = StravaClient::from_config(config);
        Self::new(
            TokenManager::new(strava.clone(), db.clone()),
            strava,
            WeatherClient::from_config(config),
            EventRecorder::new(db.clone()),
            db,
        )
    }

    /// Annotate a newly created activity.
    pub async fn run(
        &self,
        athlete_id: u64,
        activity_id: u64,
    ) -> Result<PipelineOutcome, PipelineError> {
        let started = Instant::now();
        tracing::info!(athlete_id, activity_id, "Adding weather details");

        let credential = self
            .tokens
            .ensure_valid(athlete_id)
            .await
            .map_err(halt_at(PipelineState::Start))?;

        let activity = self
            .strava
            .get_activity(activity_id, &credential)
            .await
            .map_err(halt_at(PipelineState::TokensEnsured))?;

        let decision = should_annotate(&activity);
        tracing::info!(athlete_id, activity_id, decision = %decision, "Policy evaluated");

        let (lat, lng) = match (decision, activity.start_location()) {
            (Decision::Annotate, Some(location)) => location,
            (Decision::Annotate, None) => {
                return Ok(PipelineOutcome::Skipped(Decision::SkipNoLocation))
            }
            (skip, _) => return Ok(PipelineOutcome::Skipped(skip)),
        };

        let start_epoch = parse_start_epoch(&activity.start_date)
            .map_err(halt_at(PipelineState::PolicyEvaluated))?;
        let units = self.db.get_unit_system(athlete_id).await;

        let stamp = self
            .weather
            .build_stamp(lat, lng, start_epoch, units)
            .await
            .map_err(halt_at(PipelineState::PolicyEvaluated))?;
        tracing::info!(activity_id, stamp = %stamp, "Weather stamp built");

        let description = append_stamp(activity.description(), &stamp);
        self.strava
            .update_activity_description(activity_id, &description, &credential)
            .await
            .map_err(halt_at(PipelineState::WeatherObtained))?;

        let event = serde_json::json!({
            "event_type": activity.kind,
            "event_time": start_epoch,
            "lat": lat,
            "lng": lng,
            "weather_stamp": stamp,
            "duration": started.elapsed().as_millis() as u64,
        });
        self.events.record(athlete_id, SERVICE_TAG, &event).await;

        tracing::info!(
            athlete_id,
            activity_id,
            duration_ms = started.elapsed().as_millis() as u64,
            "Weather details added"
        );

        Ok(PipelineOutcome::Done { stamp, description })
    }
}

/// Append the stamp on its own line after the existing description.
fn append_stamp(existing: &str, stamp: &str) -> String {
    let trimmed = existing.trim_end();
    if trimmed.is_empty() {
        stamp.to_string()
    } else {
        format!("{}\n{}", trimmed, stamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STAMP: &str = "18.4°C, clouds: 40%, humidity: 65%, wind: 3.2 km/h →";

    #[test]
    fn test_append_stamp_to_empty_description() {
        assert_eq!(append_stamp("", STAMP), STAMP);
    }

    #[test]
    fn test_append_stamp_to_whitespace_description() {
        assert_eq!(append_stamp("  \n ", STAMP), STAMP);
    }

    #[test]
    fn test_append_stamp_trims_trailing_whitespace() {
        assert_eq!(
            append_stamp("Great ride!   ", STAMP),
            format!("Great ride!\n{}", STAMP)
        );
    }

    #[test]
    fn test_append_stamp_keeps_multiline_description() {
        assert_eq!(
            append_stamp("Great ride!\nPerfect weather.\n", STAMP),
            format!("Great ride!\nPerfect weather.\n{}", STAMP)
        );
    }

    #[test]
    fn test_pipeline_error_names_state() {
        let err = halt_at(PipelineState::TokensEnsured)(AppError::ActivityFetchFailed(
            "HTTP 404".to_string(),
        ));
        assert_eq!(err.state, PipelineState::TokensEnsured);
        assert!(err.to_string().contains("tokens_ensured"));
    }
}
