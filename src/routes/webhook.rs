// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Webhook routes for Strava events.

use crate::error::AppError;
use crate::services::Job;
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{Json, Query, State},
    http::StatusCode,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Webhook routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/webhook", get(verify).post(handle_event))
}

/// Strava webhook verification query params.
#[derive(Deserialize)]
struct VerifyParams {
    #[serde(rename = "hub.mode")]
    mode: String,
    #[serde(rename = "hub.challenge")]
    challenge: String,
    #[serde(rename = "hub.verify_token")]
    verify_token: String,
}

/// Verification response.
#[derive(Serialize, Default)]
struct VerifyResponse {
    #[serde(rename = "hub.challenge")]
    challenge: String,
}

/// Verify webhook subscription (GET).
async fn verify(
    State(state): State<Arc<AppState>>,
    Query(params): Query<VerifyParams>,
) -> (StatusCode, Json<VerifyResponse>) {
    if params.mode == "subscribe" && params.verify_token == state.config.webhook_verify_token {
        tracing::info!("Webhook subscription verified");
        (
            StatusCode::OK,
            Json(VerifyResponse {
                challenge: params.challenge,
            }),
        )
    } else {
        tracing::warn!(
            mode = %params.mode,
            "Webhook verification failed: invalid token"
        );
        (StatusCode::FORBIDDEN, Json(VerifyResponse::default()))
    }
}

/// Strava webhook event payload.
#[derive(Deserialize, Debug)]
struct WebhookEvent {
    object_type: String, // "activity" or "athlete"
    object_id: u64,
    aspect_type: String, // "create", "update", "delete"
    owner_id: u64,
    #[serde(default)]
    subscription_id: Option<u64>,
    /// For athlete events, contains {"authorized": "false"} on deauthorization
    #[serde(default)]
    updates: Option<std::collections::HashMap<String, serde_json::Value>>,
}

/// Check if a webhook event represents an athlete deauthorization.
fn is_deauthorization(event: &WebhookEvent) -> bool {
    event
        .updates
        .as_ref()
        .and_then(|u| u.get("authorized"))
        .is_some_and(|v| v == false || v == "false")
}

/// Map an event to the job it triggers, if any.
fn job_for(event: &WebhookEvent) -> Option<Job> {
    if event.object_type == "activity" && event.aspect_type == "create" {
        Some(Job::Annotate {
            athlete_id: event.owner_id,
            activity_id: event.object_id,
        })
    } else if is_deauthorization(event) {
        Some(Job::DeleteUser {
            athlete_id: event.owner_id,
        })
    } else {
        None
    }
}

/// Handle incoming webhook events (POST).
async fn handle_event(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    tracing::info!(
        payload = %String::from_utf8_lossy(&body),
        "Webhook event received (raw)"
    );

    // Parsed here rather than by the Json extractor: Strava must get a 200 for any body.
    let event: WebhookEvent = match serde_json::from_slice(&body) {
        Ok(e) => e,
        Err(e) => {
            tracing::error!(error = %e, "Failed to parse webhook event");
            return Ok(StatusCode::OK); // Still return 200 to Strava to avoid retries
        }
    };

    if let Some(expected) = state.config.strava_subscription_id {
        if event.subscription_id != Some(expected) {
            tracing::warn!(
                received_id = ?event.subscription_id,
                expected_id = expected,
                "Security Alert: Webhook subscription ID mismatch"
            );
            return Err(AppError::Forbidden);
        }
    }

    tracing::info!(
        object_type = %event.object_type,
        object_id = event.object_id,
        aspect_type = %event.aspect_type,
        owner_id = event.owner_id,
        "Webhook event parsed successfully"
    );

    match job_for(&event) {
        Some(job) => {
            if let Err(e) = state.queue.submit(job) {
                tracing::error!(error = %e, job = ?job, "Failed to queue job");
            }
        }
        None => {
            tracing::debug!(
                object_type = %event.object_type,
                aspect_type = %event.aspect_type,
                "Ignoring unhandled event type"
            );
        }
    }

    // Always return 200 OK quickly (Strava requirement)
    Ok(StatusCode::OK)
}
