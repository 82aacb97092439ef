// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod annotation;
pub mod deletion;
pub mod events;
pub mod policy;
pub mod strava;
pub mod tokens;
pub mod weather;
pub mod worker;

pub use annotation::{AnnotationPipeline, PipelineError, PipelineOutcome, PipelineState};
pub use deletion::UserDeletion;
pub use events::EventRecorder;
pub use policy::Decision;
pub use strava::StravaClient;
pub use tokens::TokenManager;
pub use weather::WeatherClient;
pub use worker::{AnnotationQueue, Job, JobFailure};
