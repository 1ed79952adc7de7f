use crate::error::FasalError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An acceptable range for one attribute with its optimal point.
///
/// Invariant: `min <= optimal <= max` and `min < max`. Checked on
/// construction and deserialization, so a loaded catalog never holds a
/// malformed band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBand")]
pub struct Band {
    min: Decimal,
    optimal: Decimal,
    max: Decimal,
}

#[derive(Deserialize)]
struct RawBand {
    min: Decimal,
    optimal: Decimal,
    max: Decimal,
}

impl TryFrom<RawBand> for Band {
    type Error = FasalError;

    fn try_from(raw: RawBand) -> Result<Self, Self::Error> {
        Band::new(raw.min, raw.optimal, raw.max)
    }
}

impl Band {
    pub fn new(min: Decimal, optimal: Decimal, max: Decimal) -> Result<Self, FasalError> {
        if min >= max {
            return Err(FasalError::InvalidInput(format!(
                "band min {min} must be below max {max}"
            )));
        }
        if optimal < min || optimal > max {
            return Err(FasalError::InvalidInput(format!(
                "band optimal {optimal} lies outside {min}-{max}"
            )));
        }
        Ok(Self { min, optimal, max })
    }

    pub fn min(&self) -> Decimal {
        self.min
    }

    pub fn optimal(&self) -> Decimal {
        self.optimal
    }

    pub fn max(&self) -> Decimal {
        self.max
    }

    pub fn contains(&self, value: Decimal) -> bool {
        value >= self.min && value <= self.max
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{} (optimal: {})", self.min, self.max, self.optimal)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CropCategory {
    Cereal,
    Pulse,
    Oilseed,
    Vegetable,
    Fruit,
    CashCrop,
    Other,
}

impl CropCategory {
    pub const ALL: [CropCategory; 7] = [
        CropCategory::Cereal,
        CropCategory::Pulse,
        CropCategory::Oilseed,
        CropCategory::Vegetable,
        CropCategory::Fruit,
        CropCategory::CashCrop,
        CropCategory::Other,
    ];

    pub fn from_str_loose(s: &str) -> Option<CropCategory> {
        let lower = s.trim().to_lowercase().replace([' ', '-'], "_");
        match lower.as_str() {
            "cereal" | "cereals" => Some(CropCategory::Cereal),
            "pulse" | "pulses" => Some(CropCategory::Pulse),
            "oilseed" | "oilseeds" => Some(CropCategory::Oilseed),
            "vegetable" | "vegetables" => Some(CropCategory::Vegetable),
            "fruit" | "fruits" => Some(CropCategory::Fruit),
            "cash_crop" | "cash_crops" | "cash" => Some(CropCategory::CashCrop),
            "other" => Some(CropCategory::Other),
            _ => None,
        }
    }
}

impl fmt::Display for CropCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CropCategory::Cereal => write!(f, "Cereals"),
            CropCategory::Pulse => write!(f, "Pulses"),
            CropCategory::Oilseed => write!(f, "Oilseeds"),
            CropCategory::Vegetable => write!(f, "Vegetables"),
            CropCategory::Fruit => write!(f, "Fruits"),
            CropCategory::CashCrop => write!(f, "Cash Crops"),
            CropCategory::Other => write!(f, "Other"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaterRequirement {
    Low,
    Medium,
    High,
}

impl fmt::Display for WaterRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaterRequirement::Low => write!(f, "low"),
            WaterRequirement::Medium => write!(f, "medium"),
            WaterRequirement::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdealConditions {
    pub nitrogen: Band,
    pub phosphorus: Band,
    pub potassium: Band,
    pub ph: Band,
    pub temperature: Band,
    pub humidity: Band,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowingSeason {
    pub sowing: Vec<String>,
    pub harvesting: Vec<String>,
    /// Human-readable duration, e.g. "120-150 days".
    pub duration: String,
}

/// A crop and the conditions it grows best in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropDefinition {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_name: Option<String>,
    pub category: CropCategory,
    pub ideal_conditions: IdealConditions,
    /// Regions and states where the crop is commonly grown.
    pub regions: Vec<String>,
    pub water_requirement: WaterRequirement,
    pub growing_season: GrowingSeason,
    pub yield_per_hectare: String,
    #[serde(default)]
    pub tips: Vec<String>,
}

/// The full crop table, in authoring order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropCatalog {
    pub name: String,
    pub version: String,
    pub crops: Vec<CropDefinition>,
}

impl CropCatalog {
    pub fn get(&self, id: &str) -> Option<&CropDefinition> {
        self.crops.iter().find(|c| c.id.eq_ignore_ascii_case(id))
    }

    pub fn len(&self) -> usize {
        self.crops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crops.is_empty()
    }
}
