//! Target-value suggester: 1-D grid search over a quality model
//!
//! The persisted classifiers are opaque (tree ensembles, logistic
//! regression, small nets) with no closed-form inverse, so the only
//! model-agnostic way to find a value the model would rate favorably is to
//! probe its decision surface on a grid.

use crate::features::FeatureRow;
use crate::model::QualityModel;
use crate::{CoachError, Result};

/// A proposed value for one feature, found by search
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub feature: String,
    /// The candidate whose predicted quality landed closest to the target
    pub value: f32,
    /// Predicted quality at that candidate
    pub confidence: f32,
}

fn probe<M: QualityModel + ?Sized>(model: &M, feature: &str, value: f32) -> Result<f32> {
    let mut row = FeatureRow::new();
    row.set(feature, value as f64);
    let input = row.align(model.expected_columns());
    model.quality_score(&input)
}

/// Search `[lo, hi)` at `step` increments for the value whose predicted
/// quality is closest to `target`.
///
/// Candidates are generated ascending, lower bound inclusive, upper bound
/// exclusive; ties on |predicted - target| keep the first (smallest)
/// candidate, so the search is fully deterministic. A suggestion is always
/// returned, even when no candidate improves on the caller's current value;
/// callers wanting strict-improvement semantics layer [`improves_on`] on
/// top.
pub fn suggest_target_value<M: QualityModel + ?Sized>(
    model: &M,
    feature: &str,
    target: f32,
    range: (f32, f32),
    step: f32,
) -> Result<Suggestion> {
    let (lo, hi) = range;
    if step <= 0.0 || hi <= lo {
        return Err(CoachError::Prediction(format!(
            "invalid search grid for '{}': range ({}, {}), step {}",
            feature, lo, hi, step
        )));
    }

    let mut best: Option<(f32, f32, f32)> = None; // (value, confidence, distance)
    let mut i = 0u32;
    loop {
        let value = lo + step * i as f32;
        if value >= hi {
            break;
        }
        let confidence = probe(model, feature, value)?;
        let distance = (confidence - target).abs();
        if best.map_or(true, |(_, _, d)| distance < d) {
            best = Some((value, confidence, distance));
        }
        i += 1;
    }

    // Non-empty by construction: lo < hi guarantees at least one candidate.
    let (value, confidence, _) = best.ok_or_else(|| {
        CoachError::Prediction(format!("search grid for '{}' produced no candidates", feature))
    })?;
    Ok(Suggestion {
        feature: feature.to_string(),
        value,
        confidence,
    })
}

/// Whether the model rates `suggested` strictly better than `current`.
pub fn improves_on<M: QualityModel + ?Sized>(
    model: &M,
    feature: &str,
    current: f32,
    suggested: f32,
) -> Result<bool> {
    let at_current = probe(model, feature, current)?;
    let at_suggested = probe(model, feature, suggested)?;
    Ok(at_suggested > at_current)
}

/// Clamp a suggested value into [0, 1] before boolean phrasing.
pub fn clamp_boolean(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::testing::StubQualityModel;

    #[test]
    fn test_picks_value_closest_to_target() {
        // Quality peaks at 30: exactly 0.8 there, 0.2 everywhere else.
        let model =
            StubQualityModel::with_proba("first_ward_time", |v| if v == 30.0 { 0.8 } else { 0.2 });
        let suggestion =
            suggest_target_value(&model, "first_ward_time", 0.8, (0.0, 100.0), 5.0).unwrap();
        assert_eq!(suggestion.value, 30.0);
        assert_eq!(suggestion.confidence, 0.8);
    }

    #[test]
    fn test_deterministic() {
        let model = StubQualityModel::with_proba("kda", |v| (v / 1000.0).min(1.0));
        let a = suggest_target_value(&model, "kda", 0.8, (0.0, 1000.0), 5.0).unwrap();
        let b = suggest_target_value(&model, "kda", 0.8, (0.0, 1000.0), 5.0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_tie_breaks_to_first_candidate() {
        // Every candidate scores identically; the first (lowest) wins.
        let model = StubQualityModel::with_proba("cs_diff_at_10", |_| 0.5);
        let suggestion =
            suggest_target_value(&model, "cs_diff_at_10", 0.8, (10.0, 50.0), 5.0).unwrap();
        assert_eq!(suggestion.value, 10.0);
    }

    #[test]
    fn test_range_lower_inclusive_upper_exclusive() {
        // Quality grows with value, so the best candidate is the largest
        // generated one, which must stop short of the upper bound.
        let model = StubQualityModel::with_proba("gold_diff_at_10", |v| v / 100.0);
        let suggestion =
            suggest_target_value(&model, "gold_diff_at_10", 1.0, (0.0, 100.0), 5.0).unwrap();
        assert_eq!(suggestion.value, 95.0);
    }

    #[test]
    fn test_raw_fallback_when_no_probability() {
        let model = StubQualityModel::raw_only("fight_impact_score", |v| {
            if v == 20.0 {
                0.8
            } else {
                0.0
            }
        });
        let suggestion =
            suggest_target_value(&model, "fight_impact_score", 0.8, (0.0, 100.0), 5.0).unwrap();
        assert_eq!(suggestion.value, 20.0);
    }

    #[test]
    fn test_invalid_grid_rejected() {
        let model = StubQualityModel::with_proba("kda", |_| 0.5);
        assert!(suggest_target_value(&model, "kda", 0.8, (0.0, 100.0), 0.0).is_err());
        assert!(suggest_target_value(&model, "kda", 0.8, (100.0, 0.0), 5.0).is_err());
    }

    #[test]
    fn test_improves_on() {
        let model = StubQualityModel::with_proba("first_ward_time", |v| 1.0 - v / 200.0);
        assert!(improves_on(&model, "first_ward_time", 95.0, 30.0).unwrap());
        assert!(!improves_on(&model, "first_ward_time", 30.0, 95.0).unwrap());
        assert!(!improves_on(&model, "first_ward_time", 30.0, 30.0).unwrap());
    }

    #[test]
    fn test_clamp_boolean() {
        assert_eq!(clamp_boolean(-3.0), 0.0);
        assert_eq!(clamp_boolean(5.0), 1.0);
        assert_eq!(clamp_boolean(0.4), 0.4);
    }
}
