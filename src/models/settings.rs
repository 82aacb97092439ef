//! Per-user display preferences.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unit system used for the weather query and the stamp text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Imperial,
    Metric,
}

impl UnitSystem {
    /// Value forwarded to the weather API `units` parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Imperial => "imperial",
            UnitSystem::Metric => "metric",
        }
    }

    /// Suffix after the degree sign.
    pub fn temperature_suffix(&self) -> &'static str {
        match self {
            UnitSystem::Imperial => "F",
            UnitSystem::Metric => "C",
        }
    }

    pub fn speed_unit(&self) -> &'static str {
        match self {
            UnitSystem::Imperial => "mph",
            UnitSystem::Metric => "km/h",
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings document stored per athlete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSettings {
    pub athlete_id: u64,
    pub units: UnitSystem,
}
