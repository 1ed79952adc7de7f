use crate::catalog::schema::{Band, CropCatalog, CropDefinition};
use crate::error::FasalError;
use crate::model::{Attribute, RecommendationInput};
use crate::recommend::matcher::match_band;
use crate::recommend::outcome::{CropRecommendation, MatchDetail, MatchStatus, Measured, Reason};
use crate::recommend::region::{region_matches, resolve_region};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Crops scoring below this are left out of results.
pub const DEFAULT_MIN_SCORE: u8 = 30;

const REGION_MATCH_SCORE: Decimal = dec!(100);
/// A region mismatch is a soft penalty; it never disqualifies a crop.
const REGION_MISMATCH_SCORE: Decimal = dec!(50);

/// How to weigh attributes when weather is missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightPolicy {
    /// Divide by the weights actually used, so soil and region carry the score.
    #[default]
    Renormalize,
    /// Always divide by the full weight sum; missing weather counts as zero.
    FixedWeights,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreOptions {
    pub weight_policy: WeightPolicy,
    pub min_score: u8,
}

impl Default for ScoreOptions {
    fn default() -> Self {
        Self {
            weight_policy: WeightPolicy::default(),
            min_score: DEFAULT_MIN_SCORE,
        }
    }
}

pub fn weight(attribute: Attribute) -> Decimal {
    match attribute {
        Attribute::Nitrogen | Attribute::Phosphorus | Attribute::Potassium => dec!(0.15),
        Attribute::Ph => dec!(0.20),
        Attribute::Temperature => dec!(0.15),
        Attribute::Humidity => dec!(0.10),
        Attribute::Region => dec!(0.10),
    }
}

/// Score every crop in catalog order, without threshold filtering or sorting.
pub fn score_all(
    catalog: &CropCatalog,
    input: &RecommendationInput,
    options: &ScoreOptions,
) -> Result<Vec<CropRecommendation>, FasalError> {
    input.validate()?;
    let region = resolve_region(&input.location);
    Ok(catalog
        .crops
        .iter()
        .map(|crop| score_crop(crop, input, &region, options.weight_policy))
        .collect())
}

/// Score, filter and rank the catalog for one input.
///
/// Results are sorted by descending score; equal scores keep catalog order.
/// An empty list means no crop reached `options.min_score`.
pub fn recommend(
    catalog: &CropCatalog,
    input: &RecommendationInput,
    options: &ScoreOptions,
) -> Result<Vec<CropRecommendation>, FasalError> {
    let scored = score_all(catalog, input, options)?;
    let total = scored.len();

    let mut recommendations: Vec<CropRecommendation> = scored
        .into_iter()
        .filter(|r| r.match_score >= options.min_score)
        .collect();
    // Vec::sort_by is stable, which keeps catalog order among ties
    recommendations.sort_by(|a, b| b.match_score.cmp(&a.match_score));

    tracing::debug!(
        scored = total,
        kept = recommendations.len(),
        min_score = options.min_score,
        weather = input.weather.is_some(),
        "scored crop catalog"
    );

    Ok(recommendations)
}

/// Score a single crop. `region` is the resolved region label.
pub fn score_crop(
    crop: &CropDefinition,
    input: &RecommendationInput,
    region: &str,
    policy: WeightPolicy,
) -> CropRecommendation {
    let ideal = &crop.ideal_conditions;
    let soil = &input.soil;

    let mut details = BTreeMap::new();
    details.insert(Attribute::Nitrogen, match_band(soil.nitrogen, &ideal.nitrogen));
    details.insert(
        Attribute::Phosphorus,
        match_band(soil.phosphorus, &ideal.phosphorus),
    );
    details.insert(
        Attribute::Potassium,
        match_band(soil.potassium, &ideal.potassium),
    );
    details.insert(Attribute::Ph, match_band(soil.ph, &ideal.ph));

    if let Some(weather) = &input.weather {
        details.insert(
            Attribute::Temperature,
            match_band(weather.temperature_celsius, &ideal.temperature),
        );
        details.insert(
            Attribute::Humidity,
            match_band(weather.humidity_percent, &ideal.humidity),
        );
    }

    let region_matched = region_matches(&crop.regions, region);
    details.insert(
        Attribute::Region,
        MatchDetail {
            status: if region_matched {
                MatchStatus::Optimal
            } else {
                MatchStatus::Marginal
            },
            measured: Measured::Label(region.to_string()),
            optimal: crop.regions.join(", "),
            score: if region_matched {
                REGION_MATCH_SCORE
            } else {
                REGION_MISMATCH_SCORE
            },
        },
    );

    let match_score = weighted_score(&details, policy);
    let reasons = build_reasons(crop, &details, region, region_matched);
    let warnings = build_warnings(crop, &details);

    CropRecommendation {
        crop: crop.clone(),
        match_score,
        reasons,
        warnings,
        details,
    }
}

/// Combine per-attribute scores into one 0-100 integer.
pub fn weighted_score(details: &BTreeMap<Attribute, MatchDetail>, policy: WeightPolicy) -> u8 {
    let mut sum = Decimal::ZERO;
    let mut used = Decimal::ZERO;
    for (attribute, detail) in details {
        let w = weight(*attribute);
        sum += detail.score * w;
        used += w;
    }

    let divisor = match policy {
        WeightPolicy::Renormalize => used,
        WeightPolicy::FixedWeights => ALL_ATTRIBUTES.iter().map(|a| weight(*a)).sum(),
    };
    if divisor.is_zero() {
        return 0;
    }

    (sum / divisor)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .clamp(Decimal::ZERO, dec!(100))
        .to_u8()
        .unwrap_or(0)
}

const ALL_ATTRIBUTES: [Attribute; 7] = [
    Attribute::Nitrogen,
    Attribute::Phosphorus,
    Attribute::Potassium,
    Attribute::Ph,
    Attribute::Temperature,
    Attribute::Humidity,
    Attribute::Region,
];

fn build_reasons(
    crop: &CropDefinition,
    details: &BTreeMap<Attribute, MatchDetail>,
    region: &str,
    region_matched: bool,
) -> Vec<Reason> {
    let mut reasons = Vec::new();

    for (attribute, detail) in details {
        let qualifies = match attribute {
            Attribute::Ph => matches!(detail.status, MatchStatus::Optimal | MatchStatus::Good),
            Attribute::Region => false,
            _ => detail.status == MatchStatus::Optimal,
        };
        if !qualifies {
            continue;
        }
        let text = match attribute {
            Attribute::Ph => format!(
                "pH {} is {} for {}",
                detail.measured, detail.status, crop.name
            ),
            Attribute::Temperature => format!(
                "Current {}°C is ideal for {}",
                detail.measured, crop.name
            ),
            Attribute::Humidity => {
                format!("Humidity {}% suits {}", detail.measured, crop.name)
            }
            _ => format!(
                "{} level {}{} matches {}'s needs",
                attribute,
                detail.measured,
                attribute.unit(),
                crop.name
            ),
        };
        reasons.push(Reason::positive(text));
    }

    if region_matched {
        reasons.push(Reason::positive(format!(
            "{} grows well in {}",
            crop.name, region
        )));
    } else {
        reasons.push(Reason::neutral(format!(
            "{} is not commonly grown in {}",
            crop.name, region
        )));
    }

    reasons
}

fn build_warnings(crop: &CropDefinition, details: &BTreeMap<Attribute, MatchDetail>) -> Vec<String> {
    let ideal = &crop.ideal_conditions;
    let mut warnings = Vec::new();

    for (attribute, detail) in details {
        if detail.status != MatchStatus::Poor {
            continue;
        }
        let band: &Band = match attribute {
            Attribute::Nitrogen => &ideal.nitrogen,
            Attribute::Phosphorus => &ideal.phosphorus,
            Attribute::Potassium => &ideal.potassium,
            Attribute::Ph => &ideal.ph,
            Attribute::Temperature => &ideal.temperature,
            Attribute::Humidity => &ideal.humidity,
            Attribute::Region => continue,
        };
        let Measured::Value(value) = detail.measured else {
            continue;
        };
        let direction = if value < band.min() {
            "too low"
        } else {
            "too high"
        };

        let warning = match attribute {
            Attribute::Temperature => format!(
                "Current temperature {}°C is {} for {} - best sown in {}",
                value,
                direction,
                crop.name,
                crop.growing_season.sowing.join("/")
            ),
            _ => format!(
                "{} {}{} is {} (recommended {}-{}{})",
                attribute,
                value,
                attribute.unit(),
                direction,
                band.min(),
                band.max(),
                attribute.unit()
            ),
        };
        warnings.push(warning);
    }

    warnings
}
