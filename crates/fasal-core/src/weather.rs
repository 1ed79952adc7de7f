//! Current conditions from Open-Meteo.

use crate::error::FasalError;
use crate::model::{decimal_from_f64, WeatherSnapshot};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

pub const OPEN_METEO_BASE_URL: &str = "https://api.open-meteo.com";

const CURRENT_FIELDS: &str =
    "temperature_2m,relative_humidity_2m,weather_code,wind_speed_10m,wind_direction_10m";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    Sunny,
    PartlyCloudy,
    Cloudy,
    Foggy,
    Rainy,
    Thunderstorm,
}

impl WeatherCondition {
    /// Bucket a WMO weather interpretation code. Snow counts as rain and
    /// unknown codes as sunny.
    pub fn from_wmo(code: u16) -> Self {
        match code {
            0 => WeatherCondition::Sunny,
            1 | 2 => WeatherCondition::PartlyCloudy,
            3 => WeatherCondition::Cloudy,
            45..=48 => WeatherCondition::Foggy,
            51..=67 | 71..=77 | 80..=82 => WeatherCondition::Rainy,
            95..=99 => WeatherCondition::Thunderstorm,
            _ => WeatherCondition::Sunny,
        }
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WeatherCondition::Sunny => "sunny",
            WeatherCondition::PartlyCloudy => "partly cloudy",
            WeatherCondition::Cloudy => "cloudy",
            WeatherCondition::Foggy => "foggy",
            WeatherCondition::Rainy => "rainy",
            WeatherCondition::Thunderstorm => "thunderstorm",
        };
        f.write_str(s)
    }
}

pub fn wmo_description(code: u16) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        71 => "Slight snow fall",
        73 => "Moderate snow fall",
        75 => "Heavy snow fall",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Clear sky",
    }
}

/// Eight-point compass label for a bearing in degrees.
pub fn compass_direction(degrees: f64) -> &'static str {
    const POINTS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];
    let index = (degrees.rem_euclid(360.0) / 45.0).round() as usize % 8;
    POINTS[index]
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    pub temperature_celsius: Decimal,
    pub humidity_percent: Decimal,
    pub wind_speed_kmh: Decimal,
    pub wind_direction: &'static str,
    pub weather_code: u16,
    pub condition: WeatherCondition,
    pub description: &'static str,
}

impl WeatherReport {
    pub fn to_snapshot(&self) -> WeatherSnapshot {
        WeatherSnapshot {
            temperature_celsius: self.temperature_celsius,
            humidity_percent: self.humidity_percent,
        }
    }
}

#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current(&self, latitude: Decimal, longitude: Decimal)
        -> Result<WeatherReport, FasalError>;
}

pub struct OpenMeteoClient {
    client: reqwest::Client,
    base_url: String,
}

impl OpenMeteoClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FasalError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FasalError::Config(format!("cannot build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[derive(Deserialize)]
struct ForecastResponse {
    current: CurrentBlock,
}

#[derive(Deserialize)]
struct CurrentBlock {
    temperature_2m: f64,
    relative_humidity_2m: f64,
    weather_code: u16,
    wind_speed_10m: f64,
    #[serde(default)]
    wind_direction_10m: f64,
}

fn report_from(current: CurrentBlock) -> Result<WeatherReport, FasalError> {
    let snapshot = WeatherSnapshot::from_f64(current.temperature_2m, current.relative_humidity_2m)?;
    Ok(WeatherReport {
        temperature_celsius: snapshot.temperature_celsius,
        humidity_percent: snapshot.humidity_percent,
        wind_speed_kmh: decimal_from_f64("wind speed", current.wind_speed_10m)?,
        wind_direction: compass_direction(current.wind_direction_10m),
        weather_code: current.weather_code,
        condition: WeatherCondition::from_wmo(current.weather_code),
        description: wmo_description(current.weather_code),
    })
}

#[async_trait]
impl WeatherProvider for OpenMeteoClient {
    async fn current(
        &self,
        latitude: Decimal,
        longitude: Decimal,
    ) -> Result<WeatherReport, FasalError> {
        let url = format!("{}/v1/forecast", self.base_url);
        let response = self
            .client
            .get(url)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("current", CURRENT_FIELDS.to_string()),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await
            .map_err(|e| FasalError::RemoteUnavailable(format!("weather request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(FasalError::RemoteUnavailable(format!(
                "weather service returned {}",
                response.status()
            )));
        }

        let body: ForecastResponse = response.json().await.map_err(|e| {
            FasalError::RemoteUnavailable(format!("unreadable weather response: {e}"))
        })?;
        let report = report_from(body.current)?;
        tracing::debug!(
            temperature = %report.temperature_celsius,
            humidity = %report.humidity_percent,
            condition = %report.condition,
            "fetched current weather"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_wmo_buckets() {
        assert_eq!(WeatherCondition::from_wmo(0), WeatherCondition::Sunny);
        assert_eq!(WeatherCondition::from_wmo(2), WeatherCondition::PartlyCloudy);
        assert_eq!(WeatherCondition::from_wmo(3), WeatherCondition::Cloudy);
        assert_eq!(WeatherCondition::from_wmo(48), WeatherCondition::Foggy);
        assert_eq!(WeatherCondition::from_wmo(63), WeatherCondition::Rainy);
        assert_eq!(WeatherCondition::from_wmo(75), WeatherCondition::Rainy);
        assert_eq!(WeatherCondition::from_wmo(81), WeatherCondition::Rainy);
        assert_eq!(WeatherCondition::from_wmo(96), WeatherCondition::Thunderstorm);
        assert_eq!(WeatherCondition::from_wmo(70), WeatherCondition::Sunny);
    }

    #[test]
    fn test_descriptions() {
        assert_eq!(wmo_description(65), "Heavy rain");
        assert_eq!(wmo_description(4), "Clear sky");
    }

    #[test]
    fn test_compass() {
        assert_eq!(compass_direction(0.0), "N");
        assert_eq!(compass_direction(44.0), "NE");
        assert_eq!(compass_direction(350.0), "N");
        assert_eq!(compass_direction(225.0), "SW");
        assert_eq!(compass_direction(-90.0), "W");
    }

    #[test]
    fn test_report_from_response() {
        let body: ForecastResponse = serde_json::from_str(
            r#"{ "current": { "time": "2024-01-01T12:00", "temperature_2m": 24.5,
                 "relative_humidity_2m": 61, "weather_code": 61,
                 "wind_speed_10m": 7.2, "wind_direction_10m": 90 } }"#,
        )
        .unwrap();
        let report = report_from(body.current).unwrap();
        assert_eq!(report.condition, WeatherCondition::Rainy);
        assert_eq!(report.description, "Slight rain");
        assert_eq!(report.wind_direction, "E");
        let snapshot = report.to_snapshot();
        assert_eq!(snapshot.temperature_celsius, dec!(24.5));
        assert_eq!(snapshot.humidity_percent, dec!(61));
    }

    #[test]
    fn test_report_rejects_bad_humidity() {
        let body: ForecastResponse = serde_json::from_str(
            r#"{ "current": { "temperature_2m": 20, "relative_humidity_2m": 140,
                 "weather_code": 0, "wind_speed_10m": 1 } }"#,
        )
        .unwrap();
        assert!(report_from(body.current).is_err());
    }
}
