// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Stamp-Weather API Server
//!
//! Receives Strava webhook events and annotates new activities with the
//! weather conditions at their start.

use stamp_weather::{
    config::{Config, StorageBackend},
    db::FirestoreDb,
    services::{AnnotationPipeline, AnnotationQueue, UserDeletion},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Stamp-Weather API");

    // Initialize storage
    let db = match config.storage_backend {
        StorageBackend::Firestore => FirestoreDb::new(&config.gcp_project_id).await?,
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            FirestoreDb::new_in_memory()
        }
    };

    // Start the background worker
    let pipeline = AnnotationPipeline::from_config(&config, db.clone());
    let (queue, mut failures) = AnnotationQueue::spawn(pipeline, UserDeletion::new(db));
    tokio::spawn(async move {
        while let Some(failure) = failures.recv().await {
            tracing::error!(job = ?failure.job, reason = %failure.reason, "Background job failed");
        }
    });
    tracing::info!("Annotation worker started");

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        queue,
    });

    // Build router
    let app = stamp_weather::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("stamp_weather=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
