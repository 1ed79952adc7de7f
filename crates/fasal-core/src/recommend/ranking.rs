use crate::catalog::schema::CropCategory;
use crate::recommend::outcome::CropRecommendation;

/// The first `n` of an already-ranked list. Never re-sorts.
pub fn top_n(recommendations: &[CropRecommendation], n: usize) -> &[CropRecommendation] {
    &recommendations[..n.min(recommendations.len())]
}

/// Recommendations in `category`, keeping their order.
pub fn by_category(
    recommendations: &[CropRecommendation],
    category: CropCategory,
) -> Vec<&CropRecommendation> {
    recommendations
        .iter()
        .filter(|r| r.crop.category == category)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::builtin::load_builtin_catalog;
    use crate::model::{LocationPoint, RecommendationInput, SoilSample};
    use crate::recommend::engine::{recommend, ScoreOptions};
    use rust_decimal_macros::dec;

    fn ranked() -> Vec<CropRecommendation> {
        let catalog = load_builtin_catalog().unwrap();
        let input = RecommendationInput {
            soil: SoilSample {
                nitrogen: dec!(100),
                phosphorus: dec!(45),
                potassium: dec!(60),
                ph: dec!(6.5),
            },
            location: LocationPoint::new(dec!(20.59), dec!(78.96)),
            weather: None,
        };
        recommend(&catalog, &input, &ScoreOptions::default()).unwrap()
    }

    #[test]
    fn test_top_n_is_prefix() {
        let all = ranked();
        let top = top_n(&all, 3);
        assert_eq!(top.len(), 3.min(all.len()));
        for (a, b) in top.iter().zip(all.iter()) {
            assert_eq!(a.crop.id, b.crop.id);
        }
    }

    #[test]
    fn test_top_n_larger_than_list() {
        let all = ranked();
        assert_eq!(top_n(&all, all.len() + 10).len(), all.len());
        assert!(top_n(&all, 0).is_empty());
    }

    #[test]
    fn test_by_category_preserves_order() {
        let all = ranked();
        let cereals = by_category(&all, CropCategory::Cereal);
        assert!(cereals.iter().all(|r| r.crop.category == CropCategory::Cereal));
        let positions: Vec<usize> = cereals
            .iter()
            .map(|c| all.iter().position(|r| r.crop.id == c.crop.id).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }
}
