// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod credential;
pub mod event;
pub mod settings;

pub use activity::ActivityRecord;
pub use credential::Credential;
pub use event::AnalyticsEvent;
pub use settings::{UnitSystem, UserSettings};
