use crate::catalog::schema::Band;
use crate::error::FasalError;
use crate::recommend::outcome::{MatchDetail, MatchStatus, Measured};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const HUNDRED: Decimal = dec!(100);
const IN_RANGE_SPAN: Decimal = dec!(50);
const OUT_OF_RANGE_CEILING: Decimal = dec!(40);

const OPTIMAL_FLOOR: Decimal = dec!(80);
const GOOD_FLOOR: Decimal = dec!(60);
/// Out-of-range scores above this are still marginal.
const MARGINAL_FLOOR: Decimal = dec!(20);

/// Score how well `value` fits `band`.
///
/// Inside the band the score falls linearly from 100 at the optimum to 50 at
/// the farther edge. Outside, it starts at 40 on the edge and reaches 0 one
/// full band width away.
pub fn match_band(value: Decimal, band: &Band) -> MatchDetail {
    let (score, status) = if band.contains(value) {
        let distance = if value >= band.optimal() {
            gap(value, band.optimal())
        } else {
            gap(band.optimal(), value)
        };
        let max_distance = gap(band.optimal(), band.min()).max(gap(band.max(), band.optimal()));
        let score = if max_distance.is_zero() {
            HUNDRED
        } else {
            HUNDRED - capped_ratio(distance, max_distance) * IN_RANGE_SPAN
        };
        let status = if score >= OPTIMAL_FLOOR {
            MatchStatus::Optimal
        } else if score >= GOOD_FLOOR {
            MatchStatus::Good
        } else {
            MatchStatus::Marginal
        };
        (score, status)
    } else {
        let outside = if value < band.min() {
            gap(band.min(), value)
        } else {
            gap(value, band.max())
        };
        let range_size = gap(band.max(), band.min());
        let score = OUT_OF_RANGE_CEILING - capped_ratio(outside, range_size) * OUT_OF_RANGE_CEILING;
        let status = if score > MARGINAL_FLOOR {
            MatchStatus::Marginal
        } else {
            MatchStatus::Poor
        };
        (score, status)
    };

    MatchDetail {
        status,
        measured: Measured::Value(value),
        optimal: band.to_string(),
        score,
    }
}

/// `high - low` for `high >= low`, saturating at `Decimal::MAX`.
fn gap(high: Decimal, low: Decimal) -> Decimal {
    high.checked_sub(low).unwrap_or(Decimal::MAX)
}

/// `part / whole` clamped to [0, 1]. `whole` is non-zero.
fn capped_ratio(part: Decimal, whole: Decimal) -> Decimal {
    part.checked_div(whole)
        .unwrap_or(Decimal::ONE)
        .clamp(Decimal::ZERO, Decimal::ONE)
}

/// Score `value` against loose bounds.
///
/// Fails with `InvalidInput` when the bounds do not form a valid band.
pub fn match_range(
    value: Decimal,
    min: Decimal,
    max: Decimal,
    optimal: Decimal,
) -> Result<MatchDetail, FasalError> {
    let band = Band::new(min, optimal, max)?;
    Ok(match_band(value, &band))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ph_band() -> Band {
        Band::new(dec!(5.5), dec!(6.5), dec!(7.5)).unwrap()
    }

    #[test]
    fn test_optimal_value_scores_100() {
        let m = match_band(dec!(6.5), &ph_band());
        assert_eq!(m.score, dec!(100));
        assert_eq!(m.status, MatchStatus::Optimal);
        assert_eq!(m.optimal, "5.5-7.5 (optimal: 6.5)");
    }

    #[test]
    fn test_near_optimal_is_optimal() {
        // 0.3 off over a max distance of 1 -> 85
        let m = match_band(dec!(6.2), &ph_band());
        assert_eq!(m.score, dec!(85));
        assert_eq!(m.status, MatchStatus::Optimal);
    }

    #[test]
    fn test_good_band() {
        let m = match_band(dec!(6.0), &ph_band());
        assert_eq!(m.score, dec!(75));
        assert_eq!(m.status, MatchStatus::Good);
    }

    #[test]
    fn test_edges_are_in_range() {
        let lo = match_band(dec!(5.5), &ph_band());
        let hi = match_band(dec!(7.5), &ph_band());
        assert_eq!(lo.score, dec!(50));
        assert_eq!(hi.score, dec!(50));
        assert_eq!(lo.status, MatchStatus::Marginal);
    }

    #[test]
    fn test_asymmetric_band_uses_farther_edge() {
        // optimal 10 in 0-100: max distance is 90
        let band = Band::new(dec!(0), dec!(10), dec!(100)).unwrap();
        let m = match_band(dec!(100), &band);
        assert_eq!(m.score, dec!(50));
        let m = match_band(dec!(0), &band);
        assert!(m.score > dec!(94) && m.score < dec!(95));
    }

    #[test]
    fn test_slightly_outside_is_marginal() {
        // 0.5 outside a band 2 wide -> 40 - 10 = 30
        let m = match_band(dec!(8.0), &ph_band());
        assert_eq!(m.score, dec!(30));
        assert_eq!(m.status, MatchStatus::Marginal);
    }

    #[test]
    fn test_score_of_exactly_20_is_poor() {
        let m = match_band(dec!(4.5), &ph_band());
        assert_eq!(m.score, dec!(20));
        assert_eq!(m.status, MatchStatus::Poor);
    }

    #[test]
    fn test_far_outside_clamps_to_zero() {
        let m = match_band(dec!(12), &ph_band());
        assert_eq!(m.score, Decimal::ZERO);
        assert_eq!(m.status, MatchStatus::Poor);
    }

    #[test]
    fn test_match_range_rejects_inverted_band() {
        let err = match_range(dec!(6), dec!(7.5), dec!(5.5), dec!(6.5)).unwrap_err();
        assert!(matches!(err, FasalError::InvalidInput(_)));
    }

    #[test]
    fn test_match_range_valid() {
        let m = match_range(dec!(120), dec!(80), dec!(160), dec!(120)).unwrap();
        assert_eq!(m.score, dec!(100));
        assert_eq!(m.measured, Measured::Value(dec!(120)));
    }

    #[test]
    fn test_huge_reading_scores_zero() {
        let band = Band::new(dec!(30), dec!(40), dec!(50)).unwrap();
        let m = match_band(Decimal::MAX, &band);
        assert_eq!(m.score, Decimal::ZERO);
        assert_eq!(m.status, MatchStatus::Poor);
    }

    #[test]
    fn test_extreme_negative_reading_saturates() {
        let band = Band::new(dec!(20), dec!(27), dec!(35)).unwrap();
        let m = match_band(Decimal::MIN, &band);
        assert_eq!(m.score, Decimal::ZERO);
        assert_eq!(m.measured, Measured::Value(Decimal::MIN));
    }

    #[test]
    fn test_band_spanning_decimal_range() {
        let band = Band::new(Decimal::MIN, Decimal::ZERO, Decimal::MAX).unwrap();
        assert_eq!(match_band(Decimal::ZERO, &band).score, dec!(100));
        let edge = match_band(Decimal::MAX, &band);
        assert!(edge.score >= dec!(50) && edge.score <= dec!(100));
    }
}
