use crate::error::FasalError;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Soil nutrient and pH readings. Nutrients are in kg/ha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoilSample {
    pub nitrogen: Decimal,
    pub phosphorus: Decimal,
    pub potassium: Decimal,
    pub ph: Decimal,
}

impl SoilSample {
    /// Build a sample from floating point readings, rejecting NaN and infinities.
    pub fn from_f64(
        nitrogen: f64,
        phosphorus: f64,
        potassium: f64,
        ph: f64,
    ) -> Result<Self, FasalError> {
        let sample = SoilSample {
            nitrogen: decimal_from_f64("nitrogen", nitrogen)?,
            phosphorus: decimal_from_f64("phosphorus", phosphorus)?,
            potassium: decimal_from_f64("potassium", potassium)?,
            ph: decimal_from_f64("ph", ph)?,
        };
        sample.validate()?;
        Ok(sample)
    }

    pub fn validate(&self) -> Result<(), FasalError> {
        for (name, value) in [
            ("nitrogen", self.nitrogen),
            ("phosphorus", self.phosphorus),
            ("potassium", self.potassium),
        ] {
            if value < Decimal::ZERO {
                return Err(FasalError::InvalidInput(format!(
                    "{name} must not be negative (got {value})"
                )));
            }
        }
        if self.ph < Decimal::ZERO || self.ph > Decimal::from(14) {
            return Err(FasalError::InvalidInput(format!(
                "ph must be between 0 and 14 (got {})",
                self.ph
            )));
        }
        Ok(())
    }
}

/// A farm location. Only used to derive a region label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationPoint {
    pub latitude: Decimal,
    pub longitude: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl LocationPoint {
    pub fn new(latitude: Decimal, longitude: Decimal) -> Self {
        Self {
            latitude,
            longitude,
            state: None,
        }
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// The state name, ignoring blank values.
    pub fn state_name(&self) -> Option<&str> {
        self.state
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn validate(&self) -> Result<(), FasalError> {
        if self.latitude.abs() > Decimal::from(90) {
            return Err(FasalError::InvalidInput(format!(
                "latitude must be between -90 and 90 (got {})",
                self.latitude
            )));
        }
        if self.longitude.abs() > Decimal::from(180) {
            return Err(FasalError::InvalidInput(format!(
                "longitude must be between -180 and 180 (got {})",
                self.longitude
            )));
        }
        Ok(())
    }
}

/// Current conditions used for temperature and humidity matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temperature_celsius: Decimal,
    pub humidity_percent: Decimal,
}

impl WeatherSnapshot {
    pub fn from_f64(temperature_celsius: f64, humidity_percent: f64) -> Result<Self, FasalError> {
        let snapshot = WeatherSnapshot {
            temperature_celsius: decimal_from_f64("temperature", temperature_celsius)?,
            humidity_percent: decimal_from_f64("humidity", humidity_percent)?,
        };
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn validate(&self) -> Result<(), FasalError> {
        if self.humidity_percent < Decimal::ZERO || self.humidity_percent > Decimal::ONE_HUNDRED {
            return Err(FasalError::InvalidInput(format!(
                "humidity must be between 0 and 100 (got {})",
                self.humidity_percent
            )));
        }
        Ok(())
    }
}

/// Everything the scorer reads for one recommendation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationInput {
    pub soil: SoilSample,
    pub location: LocationPoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<WeatherSnapshot>,
}

impl RecommendationInput {
    pub fn validate(&self) -> Result<(), FasalError> {
        self.soil.validate()?;
        self.location.validate()?;
        if let Some(weather) = &self.weather {
            weather.validate()?;
        }
        Ok(())
    }
}

/// A scored attribute of a crop recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Nitrogen,
    Phosphorus,
    Potassium,
    Ph,
    Temperature,
    Humidity,
    Region,
}

impl Attribute {
    pub fn unit(&self) -> &'static str {
        match self {
            Attribute::Nitrogen | Attribute::Phosphorus | Attribute::Potassium => " kg/ha",
            Attribute::Temperature => "°C",
            Attribute::Humidity => "%",
            Attribute::Ph | Attribute::Region => "",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attribute::Nitrogen => write!(f, "Nitrogen"),
            Attribute::Phosphorus => write!(f, "Phosphorus"),
            Attribute::Potassium => write!(f, "Potassium"),
            Attribute::Ph => write!(f, "pH"),
            Attribute::Temperature => write!(f, "Temperature"),
            Attribute::Humidity => write!(f, "Humidity"),
            Attribute::Region => write!(f, "Region"),
        }
    }
}

/// Convert a float reading into an exact decimal.
pub fn decimal_from_f64(name: &str, value: f64) -> Result<Decimal, FasalError> {
    if !value.is_finite() {
        return Err(FasalError::InvalidInput(format!(
            "{name} must be a finite number (got {value})"
        )));
    }
    Decimal::from_f64(value).ok_or_else(|| {
        FasalError::InvalidInput(format!("{name} is out of range (got {value})"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_soil_from_f64() {
        let soil = SoilSample::from_f64(100.0, 45.0, 60.0, 6.5).unwrap();
        assert_eq!(soil.ph, dec!(6.5));
        assert_eq!(soil.nitrogen, dec!(100));
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(matches!(
            SoilSample::from_f64(f64::NAN, 45.0, 60.0, 6.5),
            Err(FasalError::InvalidInput(_))
        ));
        assert!(matches!(
            WeatherSnapshot::from_f64(f64::INFINITY, 50.0),
            Err(FasalError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_ph_out_of_range_rejected() {
        assert!(SoilSample::from_f64(100.0, 45.0, 60.0, 14.5).is_err());
        assert!(SoilSample::from_f64(100.0, 45.0, 60.0, 14.0).is_ok());
    }

    #[test]
    fn test_negative_nutrient_rejected() {
        assert!(SoilSample::from_f64(-1.0, 45.0, 60.0, 6.5).is_err());
    }

    #[test]
    fn test_blank_state_is_absent() {
        let loc = LocationPoint::new(dec!(20), dec!(78)).with_state("   ");
        assert_eq!(loc.state_name(), None);
    }

    #[test]
    fn test_humidity_bounds() {
        assert!(WeatherSnapshot::from_f64(25.0, 101.0).is_err());
        assert!(WeatherSnapshot::from_f64(-5.0, 0.0).is_ok());
    }
}
