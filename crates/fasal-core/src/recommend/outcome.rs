use crate::catalog::schema::CropDefinition;
use crate::model::Attribute;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Optimal,
    Good,
    Marginal,
    Poor,
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStatus::Optimal => write!(f, "optimal"),
            MatchStatus::Good => write!(f, "good"),
            MatchStatus::Marginal => write!(f, "marginal"),
            MatchStatus::Poor => write!(f, "poor"),
        }
    }
}

/// What was compared: a reading, or a label such as a region name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measured {
    Value(Decimal),
    Label(String),
}

impl fmt::Display for Measured {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Measured::Value(v) => write!(f, "{v}"),
            Measured::Label(s) => write!(f, "{s}"),
        }
    }
}

/// How well one attribute fits a crop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchDetail {
    pub status: MatchStatus,
    pub measured: Measured,
    /// Human-readable ideal, e.g. "5.5-7.5 (optimal: 6.5)".
    pub optimal: String,
    /// Score in [0, 100].
    pub score: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasonPolarity {
    Positive,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reason {
    pub polarity: ReasonPolarity,
    pub text: String,
}

impl Reason {
    pub fn positive(text: impl Into<String>) -> Self {
        Self {
            polarity: ReasonPolarity::Positive,
            text: text.into(),
        }
    }

    pub fn neutral(text: impl Into<String>) -> Self {
        Self {
            polarity: ReasonPolarity::Neutral,
            text: text.into(),
        }
    }
}

/// A scored, explained crop suggestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropRecommendation {
    pub crop: CropDefinition,
    /// Overall suitability, 0-100.
    pub match_score: u8,
    pub reasons: Vec<Reason>,
    pub warnings: Vec<String>,
    /// Per-attribute match. Temperature and humidity are absent without weather.
    pub details: BTreeMap<Attribute, MatchDetail>,
}

impl CropRecommendation {
    pub fn detail(&self, attribute: Attribute) -> Option<&MatchDetail> {
        self.details.get(&attribute)
    }
}
