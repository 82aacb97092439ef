// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Integration tests for webhook handling.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::json;
use stamp_weather::config::Config;
use stamp_weather::db::FirestoreDb;
use stamp_weather::services::Job;
use std::time::Duration;
use tower::ServiceExt;

mod common;
use common::create_test_app;

fn post_event(event: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/webhook")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(event).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn test_webhook_verification() {
    let (app, _, _) = create_test_app(Config::test_default(), FirestoreDb::new_in_memory());

    let challenge = "test_challenge_123";
    let verify_token = "test_verify_token"; // Matches Config::test_default()

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!(
                    "/webhook?hub.mode=subscribe&hub.challenge={}&hub.verify_token={}",
                    challenge, verify_token
                ))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), 1024)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["hub.challenge"], challenge);
}

#[tokio::test]
async fn test_webhook_verification_wrong_token() {
    let (app, _, _) = create_test_app(Config::test_default(), FirestoreDb::new_in_memory());

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/webhook?hub.mode=subscribe&hub.challenge=abc&hub.verify_token=wrong_token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = axum::body::to_bytes(response.into_body(), 1024)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["hub.challenge"], ""); // Empty challenge = rejection
}

#[tokio::test]
async fn test_webhook_event_create_activity_queues_annotation() {
    // No credential stored, so the queued job fails at its first step and
    // shows up on the failure channel.
    let (app, _, mut failures) =
        create_test_app(Config::test_default(), FirestoreDb::new_in_memory());

    let event = json!({
        "aspect_type": "create",
        "event_time": 1234567890,
        "object_id": 12345678901_u64,
        "object_type": "activity",
        "owner_id": 123456,
        "subscription_id": 12345,
        "updates": {}
    });

    let response = app.oneshot(post_event(&event)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let failure = tokio::time::timeout(Duration::from_secs(5), failures.recv())
        .await
        .expect("job should finish")
        .expect("failure channel open");
    assert_eq!(
        failure.job,
        Job::Annotate {
            athlete_id: 123456,
            activity_id: 12345678901
        }
    );
    assert!(failure.reason.contains("start"), "{}", failure.reason);
}

#[tokio::test]
async fn test_webhook_event_update_activity_is_ignored() {
    let (app, _, mut failures) =
        create_test_app(Config::test_default(), FirestoreDb::new_in_memory());

    let event = json!({
        "aspect_type": "update",
        "event_time": 1234567890,
        "object_id": 12345678901_u64,
        "object_type": "activity",
        "owner_id": 123456,
        "subscription_id": 12345,
        "updates": {"title": "New Title"}
    });

    let response = app.oneshot(post_event(&event)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Nothing was queued, so nothing can fail.
    let next = tokio::time::timeout(Duration::from_millis(200), failures.recv()).await;
    assert!(!matches!(next, Ok(Some(_))));
}

#[tokio::test]
async fn test_webhook_event_athlete_deauthorize_deletes_user() {
    let db = FirestoreDb::new_in_memory();
    db.set_credential(&common::credential("a", "r", common::now() + 3600))
        .await
        .unwrap();
    let (app, _, _) = create_test_app(Config::test_default(), db.clone());

    let event = json!({
        "aspect_type": "update",
        "event_time": 1234567890,
        "object_id": common::ATHLETE_ID,
        "object_type": "athlete",
        "owner_id": common::ATHLETE_ID,
        "subscription_id": 12345,
        "updates": {"authorized": "false"}
    });

    let response = app.oneshot(post_event(&event)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let deleted = tokio::time::timeout(Duration::from_secs(5), async {
        while db.get_credential(common::ATHLETE_ID).await.unwrap().is_some() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;
    assert!(deleted.is_ok(), "credential should be removed");
}

#[tokio::test]
async fn test_webhook_event_wrong_subscription_is_forbidden() {
    let (app, _, _) = create_test_app(Config::test_default(), FirestoreDb::new_in_memory());

    let event = json!({
        "aspect_type": "create",
        "event_time": 1234567890,
        "object_id": 1,
        "object_type": "activity",
        "owner_id": 123456,
        "subscription_id": 99999
    });

    let response = app.oneshot(post_event(&event)).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_webhook_event_malformed_is_acknowledged() {
    let (app, _, _) = create_test_app(Config::test_default(), FirestoreDb::new_in_memory());

    let response = app
        .oneshot(post_event(&json!({"hello": "world"})))
        .await
        .unwrap();

    // Strava retries on non-200, so malformed events are still acknowledged.
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_webhook_event_invalid_json_is_acknowledged() {
    let (app, _, _) = create_test_app(Config::test_default(), FirestoreDb::new_in_memory());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/webhook")
                .header("content-type", "application/json")
                .body(Body::from("not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_webhook_event_without_content_type_is_processed() {
    let (app, _, mut failures) =
        create_test_app(Config::test_default(), FirestoreDb::new_in_memory());

    let event = json!({
        "aspect_type": "create",
        "event_time": 1234567890,
        "object_id": 777,
        "object_type": "activity",
        "owner_id": 4321,
        "subscription_id": 12345
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/webhook")
                .body(Body::from(event.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // No stored credential for this athlete, so the queued job fails.
    let failure = tokio::time::timeout(Duration::from_secs(5), failures.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        failure.job,
        Job::Annotate {
            athlete_id: 4321,
            activity_id: 777
        }
    );
}

#[tokio::test]
async fn test_webhook_event_unknown_type() {
    let (app, _, _) = create_test_app(Config::test_default(), FirestoreDb::new_in_memory());

    let event = json!({
        "aspect_type": "unknown_aspect",
        "event_time": 1234567890,
        "object_id": 12345,
        "object_type": "unknown_object",
        "owner_id": 123456,
        "subscription_id": 12345
    });

    let response = app.oneshot(post_event(&event)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _, _) = create_test_app(Config::test_default(), FirestoreDb::new_in_memory());

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), 1024)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");
}
