// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Point-in-time weather lookup and stamp formatting.
//!
//! Queries the OpenWeather "time machine" endpoint for the conditions at an
//! activity's start and renders them as a one-line stamp, e.g.
//! `18.4°C, clouds: 40%, humidity: 65%, wind: 3.2 (5.1 gust) km/h →`.
//! The stamp is written into the athlete's activity, so formatting must be
//! byte-for-byte stable.

use crate::config::Config;
use crate::error::AppError;
use crate::models::UnitSystem;
use serde::Deserialize;

/// Wind arrows indexed by `round(deg / 45) mod 8`.
const WIND_ARROWS: [&str; 8] = ["↑", "↗", "→", "↘", "↓", "↙", "←", "↖"];

/// A single weather observation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WeatherObservation {
    pub temp: f64,
    #[serde(default)]
    pub clouds: u32,
    #[serde(default)]
    pub humidity: u32,
    #[serde(default)]
    pub wind_speed: f64,
    #[serde(default)]
    pub wind_gust: Option<f64>,
    #[serde(default)]
    pub wind_deg: f64,
    #[serde(default)]
    pub feels_like: Option<f64>,
    #[serde(default)]
    pub dew_point: Option<f64>,
    #[serde(default)]
    pub pressure: Option<f64>,
    #[serde(default)]
    pub uvi: Option<f64>,
}

/// Time machine response. API 3.0 returns `data`; 2.5 returned `current`.
#[derive(Debug, Deserialize)]
struct TimeMachineResponse {
    #[serde(default)]
    data: Vec<WeatherObservation>,
    #[serde(default)]
    current: Option<WeatherObservation>,
}

impl TimeMachineResponse {
    fn into_first(self) -> Option<WeatherObservation> {
        self.data.into_iter().next().or(self.current)
    }
}

/// OpenWeather client.
#[derive(Clone)]
pub struct WeatherClient {
    http: reqwest::Client,
    url: String,
    api_key: String,
}

impl WeatherClient {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
            api_key: api_key.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.weather_api_url.clone(), config.weather_api_key.clone())
    }

    /// Fetch the first observation for a place and Unix time.
    pub async fn observation(
        &self,
        lat: f64,
        lon: f64,
        epoch_seconds: i64,
        units: UnitSystem,
    ) -> Result<WeatherObservation, AppError> {
        let response = self
            .http
            .get(&self.url)
            .query(&[
                ("lat", format!("{:.6}", lat)),
                ("lon", format!("{:.6}", lon)),
                ("dt", epoch_seconds.to_string()),
                ("units", units.as_str().to_string()),
                ("appid", self.api_key.clone()),
            ])
            .send()
            .await
            .map_err(|e| AppError::WeatherUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::WeatherUnavailable(format!("HTTP {}: {}", status, body)));
        }

        let parsed: TimeMachineResponse = response
            .json()
            .await
            .map_err(|e| AppError::WeatherUnavailable(format!("JSON parse error: {}", e)))?;

        parsed
            .into_first()
            .ok_or_else(|| AppError::WeatherUnavailable("No observations returned".to_string()))
    }

    /// Build the weather stamp for a place and Unix time.
    pub async fn build_stamp(
        &self,
        lat: f64,
        lon: f64,
        epoch_seconds: i64,
        units: UnitSystem,
    ) -> Result<String, AppError> {
        let observation = self.observation(lat, lon, epoch_seconds, units).await?;
        Ok(format_stamp(&observation, units))
    }
}

/// Arrow glyph for a wind direction in degrees.
pub fn wind_arrow(degrees: f64) -> &'static str {
    let index = ((degrees / 45.0).round() as i64).rem_euclid(WIND_ARROWS.len() as i64);
    WIND_ARROWS[index as usize]
}

/// Render an observation as a stamp.
pub fn format_stamp(observation: &WeatherObservation, units: UnitSystem) -> String {
    let mut stamp = format!(
        "{:.1}°{}, clouds: {}%, humidity: {}%, wind: {:.1}",
        observation.temp,
        units.temperature_suffix(),
        observation.clouds,
        observation.humidity,
        observation.wind_speed,
    );

    if let Some(gust) = observation.wind_gust.filter(|g| *g > 0.0) {
        stamp.push_str(&format!(" ({:.1} gust)", gust));
    }

    stamp.push(' ');
    stamp.push_str(units.speed_unit());
    stamp.push(' ');
    stamp.push_str(wind_arrow(observation.wind_deg));
    stamp
}
