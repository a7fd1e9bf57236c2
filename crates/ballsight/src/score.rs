//! Confidence scoring stage math.
//!
//! Stages only ever lower a candidate's confidence; the size-expectation
//! stage sets the starting value and every later stage either keeps it or
//! zeroes it out.

use crate::config::HistogramParams;

/// Ratio stand-in when the denominator channel has zero samples.
///
/// Keeps the markeryness computation finite; a box with no ball-colored
/// pixels at all scores as maximally marker-contaminated.
const RATIO_SENTINEL: f64 = 1e6;

/// Guard against a zero denominator in the greenness ratio.
const GREENNESS_EPS: f64 = 1e-6;

/// Size-expectation confidence for a candidate's pixel area.
///
/// Areas inside `[expected_min, expected_max]` score exactly 1.0; outside
/// the band the score decays as a unit-peak gaussian of the deviation
/// scaled by `variance`. `variance` must be positive (the detector disables
/// the stage otherwise).
pub fn gaussian_size_confidence(
    area: u32,
    expected_min: u32,
    expected_max: u32,
    variance: f64,
) -> f32 {
    let lo = expected_min.min(expected_max);
    let hi = expected_min.max(expected_max);
    let clamped = area.clamp(lo, hi);
    let deviation = area as f64 - clamped as f64;
    let x = deviation / variance;
    (-0.5 * x * x).exp() as f32
}

/// Marker-contamination score of a sampled box.
///
/// `(pink/orange + 1) * (yellow/orange + 1) - 1`; zero when the box holds
/// no pink or yellow pixels, growing with either contaminant.
pub fn markeryness(pink: u32, yellow: u32, orange: u32) -> f64 {
    let (pf, yf) = if orange == 0 {
        (RATIO_SENTINEL, RATIO_SENTINEL)
    } else {
        (
            pink as f64 / orange as f64,
            yellow as f64 / orange as f64,
        )
    };
    (pf + 1.0) * (yf + 1.0) - 1.0
}

/// Fraction of the non-ball surround classified as field color.
pub fn greenness(field: u32, orange: u32, sampled_total: u32) -> f64 {
    field as f64 / (sampled_total.saturating_sub(orange) as f64 + GREENNESS_EPS)
}

/// Histogram accept/reject decision.
///
/// A green-dominant surround accepts outright, overriding any markeryness;
/// otherwise clear marker contamination rejects; everything else accepts.
pub fn histogram_accepts(greenness: f64, markeryness: f64, params: &HistogramParams) -> bool {
    if greenness > params.min_greenness {
        return true;
    }
    if markeryness > params.max_markeryness {
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn area_inside_expected_band_scores_exactly_one() {
        assert_eq!(gaussian_size_confidence(35, 30, 40, 20.0), 1.0);
        assert_eq!(gaussian_size_confidence(30, 30, 40, 20.0), 1.0);
        assert_eq!(gaussian_size_confidence(40, 30, 40, 20.0), 1.0);
    }

    #[test]
    fn area_one_variance_outside_band_scores_half_gaussian() {
        let conf = gaussian_size_confidence(60, 30, 40, 20.0);
        assert_relative_eq!(conf as f64, (-0.5f64).exp(), epsilon = 1e-6);
    }

    #[test]
    fn undersized_area_decays_symmetrically() {
        let under = gaussian_size_confidence(10, 30, 40, 20.0);
        let over = gaussian_size_confidence(60, 30, 40, 20.0);
        assert_relative_eq!(under, over, epsilon = 1e-7);
    }

    #[test]
    fn markeryness_is_zero_without_contaminants() {
        assert_relative_eq!(markeryness(0, 0, 40), 0.0);
    }

    #[test]
    fn markeryness_grows_with_either_contaminant() {
        // pf = 1, yf = 0 -> (2)(1) - 1 = 1
        assert_relative_eq!(markeryness(40, 0, 40), 1.0);
        // pf = 1, yf = 1 -> (2)(2) - 1 = 3
        assert_relative_eq!(markeryness(40, 40, 40), 3.0);
    }

    #[test]
    fn zero_orange_count_saturates_markeryness() {
        let m = markeryness(3, 5, 0);
        assert!(m.is_finite());
        assert!(m > 1e6);
    }

    #[test]
    fn greenness_ignores_ball_pixels_in_denominator() {
        // 60 field pixels out of 100 non-orange sampled pixels
        let g = greenness(60, 44, 144);
        assert_relative_eq!(g, 0.6, epsilon = 1e-6);
    }

    #[test]
    fn greenness_guards_all_orange_box() {
        let g = greenness(0, 50, 50);
        assert!(g.is_finite());
        assert_relative_eq!(g, 0.0);
    }

    #[test]
    fn green_surround_overrides_markeryness() {
        let params = HistogramParams::default();
        assert!(histogram_accepts(0.6, 100.0, &params));
    }

    #[test]
    fn markery_box_without_green_cover_is_rejected() {
        let params = HistogramParams::default();
        assert!(!histogram_accepts(0.3, 3.0, &params));
    }

    #[test]
    fn unremarkable_box_is_accepted_by_default() {
        let params = HistogramParams::default();
        assert!(histogram_accepts(0.3, 1.0, &params));
    }
}
