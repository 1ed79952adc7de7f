pub mod assistant;
pub mod catalog;
pub mod error;
pub mod model;
pub mod recommend;
pub mod records;
pub mod trace;
pub mod weather;

pub use recommend::{ScoreOptions, WeightPolicy, DEFAULT_MIN_SCORE};

use catalog::schema::{CropCatalog, CropCategory};
use error::FasalError;
use model::RecommendationInput;
use recommend::CropRecommendation;

/// Main API entry point: every crop scoring at least `options.min_score`,
/// best first.
///
/// An empty list is a valid answer; only malformed input is an error.
pub fn get_recommendations(
    catalog: &CropCatalog,
    input: &RecommendationInput,
    options: &ScoreOptions,
) -> Result<Vec<CropRecommendation>, FasalError> {
    recommend::recommend(catalog, input, options)
}

/// The best `count` recommendations.
pub fn get_top_recommendations(
    catalog: &CropCatalog,
    input: &RecommendationInput,
    options: &ScoreOptions,
    count: usize,
) -> Result<Vec<CropRecommendation>, FasalError> {
    let mut all = get_recommendations(catalog, input, options)?;
    all.truncate(count);
    Ok(all)
}

/// Recommendations restricted to one crop category, best first.
pub fn get_recommendations_by_category(
    catalog: &CropCatalog,
    input: &RecommendationInput,
    options: &ScoreOptions,
    category: CropCategory,
) -> Result<Vec<CropRecommendation>, FasalError> {
    let all = get_recommendations(catalog, input, options)?;
    Ok(recommend::by_category(&all, category)
        .into_iter()
        .cloned()
        .collect())
}
