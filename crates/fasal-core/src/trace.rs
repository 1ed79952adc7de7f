use crate::catalog::schema::CropCatalog;
use crate::error::FasalError;
use crate::model::{Attribute, RecommendationInput};
use crate::recommend::engine::{score_all, weight, ScoreOptions, WeightPolicy};
use crate::recommend::outcome::{CropRecommendation, MatchStatus};
use crate::recommend::region::resolve_region;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const TRACE_SCHEMA_VERSION: &str = "1.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceStepType {
    RangeMatch,
    RegionMatch,
    WeightedSum,
    Threshold,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceStep {
    pub step_type: TraceStepType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<Attribute>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<Decimal>,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceDecision {
    Included,
    Excluded,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropTrace {
    pub crop_id: String,
    pub crop_name: String,
    pub match_score: u8,
    pub decision: TraceDecision,
    pub steps: Vec<TraceStep>,
}

/// Audit record of one recommendation run, in catalog order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceBundle {
    pub trace_schema_version: String,
    pub catalog: String,
    pub region: String,
    pub weather_used: bool,
    pub weight_policy: WeightPolicy,
    pub min_score: u8,
    pub crops: Vec<CropTrace>,
}

impl TraceBundle {
    pub fn included(&self) -> impl Iterator<Item = &CropTrace> {
        self.crops
            .iter()
            .filter(|c| c.decision == TraceDecision::Included)
    }
}

/// Score the catalog and record how each crop's score came about.
pub fn build_trace(
    catalog: &CropCatalog,
    input: &RecommendationInput,
    options: &ScoreOptions,
) -> Result<TraceBundle, FasalError> {
    let scored = score_all(catalog, input, options)?;
    let crops = scored
        .iter()
        .map(|rec| crop_trace(rec, options.min_score))
        .collect();

    Ok(TraceBundle {
        trace_schema_version: TRACE_SCHEMA_VERSION.to_string(),
        catalog: format!("{} v{}", catalog.name, catalog.version),
        region: resolve_region(&input.location),
        weather_used: input.weather.is_some(),
        weight_policy: options.weight_policy,
        min_score: options.min_score,
        crops,
    })
}

fn crop_trace(rec: &CropRecommendation, min_score: u8) -> CropTrace {
    let mut steps: Vec<TraceStep> = rec
        .details
        .iter()
        .map(|(attribute, detail)| {
            let (step_type, message) = match attribute {
                Attribute::Region => (
                    TraceStepType::RegionMatch,
                    if detail.status == MatchStatus::Optimal {
                        format!("Region '{}' listed for crop", detail.measured)
                    } else {
                        format!(
                            "Region '{}' not in [{}]; soft penalty applied",
                            detail.measured, detail.optimal
                        )
                    },
                ),
                _ => (
                    TraceStepType::RangeMatch,
                    format!(
                        "{} {} against {} -> {} ({})",
                        attribute,
                        detail.measured,
                        detail.optimal,
                        detail.score.normalize(),
                        detail.status
                    ),
                ),
            };
            TraceStep {
                step_type,
                attribute: Some(*attribute),
                score: Some(detail.score),
                weight: Some(weight(*attribute)),
                message,
            }
        })
        .collect();

    let used: Vec<String> = rec.details.keys().map(|a| a.to_string()).collect();
    steps.push(TraceStep {
        step_type: TraceStepType::WeightedSum,
        attribute: None,
        score: Some(Decimal::from(rec.match_score)),
        weight: None,
        message: format!(
            "Weighted score {} over {}",
            rec.match_score,
            used.join(", ")
        ),
    });

    let decision = if rec.match_score >= min_score {
        TraceDecision::Included
    } else {
        TraceDecision::Excluded
    };
    steps.push(TraceStep {
        step_type: TraceStepType::Threshold,
        attribute: None,
        score: None,
        weight: None,
        message: match decision {
            TraceDecision::Included => {
                format!("{} >= minimum {}, included", rec.match_score, min_score)
            }
            TraceDecision::Excluded => {
                format!("{} < minimum {}, excluded", rec.match_score, min_score)
            }
        },
    });

    CropTrace {
        crop_id: rec.crop.id.clone(),
        crop_name: rec.crop.name.clone(),
        match_score: rec.match_score,
        decision,
        steps,
    }
}
