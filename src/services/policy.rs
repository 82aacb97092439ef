// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Eligibility rules for weather annotation.

use crate::models::ActivityRecord;
use std::fmt;

/// Text that marks a description as already stamped.
///
/// Matched as plain substrings, so any Celsius or Fahrenheit reading in the
/// description (stamped by us or typed by the athlete) suppresses a stamp.
const STAMP_MARKERS: [&str; 2] = ["°C", "°F"];

/// Activity kinds that never get a stamp regardless of other fields.
const INDOOR_KINDS: [&str; 1] = ["VirtualRide"];

/// Outcome of evaluating an activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Annotate,
    SkipManualOrIndoor,
    SkipAlreadyAnnotated,
    SkipNoLocation,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Annotate => "annotate",
            Decision::SkipManualOrIndoor => "skip_manual_or_indoor",
            Decision::SkipAlreadyAnnotated => "skip_already_annotated",
            Decision::SkipNoLocation => "skip_no_location",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decide whether `activity` should be annotated.
///
/// Rules apply in order: manual/indoor, then already stamped, then missing
/// location.
pub fn should_annotate(activity: &ActivityRecord) -> Decision {
    if activity.is_manual()
        || activity.is_trainer()
        || INDOOR_KINDS.contains(&activity.kind.as_str())
    {
        return Decision::SkipManualOrIndoor;
    }

    let description = activity.description();
    if STAMP_MARKERS.iter().any(|m| description.contains(m)) {
        return Decision::SkipAlreadyAnnotated;
    }

    if activity.start_location().is_none() {
        return Decision::SkipNoLocation;
    }

    Decision::Annotate
}
