//! Feedback synthesizer: per-feature verdicts rendered as categorized text
//!
//! Each tracked feature with a present value and a loaded quality model
//! yields exactly one feedback line; features with a null value or no model
//! are skipped without comment. A failure local to one feature (alignment,
//! predict, search) never aborts the batch: it degrades to the generic
//! "underperformed" line instead.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::features::{FeatureRow, FeatureType, FeatureTypeMap, FeedbackCategory, TRACKED_FEATURES};
use crate::feedback::suggest::{clamp_boolean, improves_on, suggest_target_value, Suggestion};
use crate::model::QualityModel;
use crate::{FeedbackPolicy, Result};

/// Feedback lines grouped under the four narrative buckets, in bucket order.
/// Rebuilt per request; lines within a bucket keep declared feature order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CategorizedFeedback {
    buckets: BTreeMap<FeedbackCategory, Vec<String>>,
}

impl CategorizedFeedback {
    pub fn new() -> Self {
        let mut buckets = BTreeMap::new();
        for category in FeedbackCategory::ALL {
            buckets.insert(category, Vec::new());
        }
        CategorizedFeedback { buckets }
    }

    pub fn push(&mut self, category: FeedbackCategory, line: String) {
        self.buckets.entry(category).or_default().push(line);
    }

    pub fn lines(&self, category: FeedbackCategory) -> &[String] {
        self.buckets.get(&category).map_or(&[], Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FeedbackCategory, &[String])> {
        self.buckets.iter().map(|(c, v)| (*c, v.as_slice()))
    }

    pub fn total_lines(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_lines() == 0
    }
}

impl Default for CategorizedFeedback {
    fn default() -> Self {
        CategorizedFeedback::new()
    }
}

/// Generate categorized feedback for one feature row.
///
/// Walks the declared tracked-feature list in order, so output ordering is
/// reproducible regardless of how `models` is keyed.
pub fn give_feedback<M: QualityModel>(
    row: &FeatureRow,
    models: &BTreeMap<String, M>,
    types: &FeatureTypeMap,
    policy: &FeedbackPolicy,
) -> CategorizedFeedback {
    let mut feedback = CategorizedFeedback::new();

    for &feature in TRACKED_FEATURES {
        let Some(model) = models.get(feature) else {
            continue;
        };
        let Some(value) = row.get(feature) else {
            continue;
        };

        let line = feature_line(feature, value.as_f32(), types.get(feature), model, policy);
        feedback.push(FeedbackCategory::for_feature(feature), line);
    }

    feedback
}

/// One feature's verdict. Infallible: any per-feature error collapses into
/// the generic fallback line.
fn feature_line<M: QualityModel>(
    feature: &str,
    value: f32,
    ftype: FeatureType,
    model: &M,
    policy: &FeedbackPolicy,
) -> String {
    match try_feature_line(feature, value, ftype, model, policy) {
        Ok(line) => line,
        Err(_) => underperformed(feature, value),
    }
}

fn try_feature_line<M: QualityModel>(
    feature: &str,
    value: f32,
    ftype: FeatureType,
    model: &M,
    policy: &FeedbackPolicy,
) -> Result<String> {
    let mut probe = FeatureRow::new();
    probe.set(feature, value as f64);
    let input = probe.align(model.expected_columns());
    let confidence = model.quality_score(&input)?;

    let suggestion = suggest_target_value(
        model,
        feature,
        policy.target_confidence,
        policy.search_range,
        policy.search_step,
    );

    if confidence >= policy.confidence_threshold {
        return Ok(high_confidence_line(feature, value, ftype, suggestion, policy));
    }

    match ftype {
        FeatureType::Boolean => {
            let suggestion = suggestion?;
            let target = clamp_boolean(suggestion.value) != 0.0;
            let actual = value != 0.0;
            if actual != target {
                Ok(format!(
                    "Consider taking action related to `{}` earlier or more often. \
                     Your value: {}. Intended: {}.",
                    feature, actual, target
                ))
            } else {
                Ok(correctly_handled(feature, actual))
            }
        }
        FeatureType::Numeric | FeatureType::Other => {
            let suggestion = suggestion?;
            if policy.require_improvement
                && !improves_on(model, feature, value, suggestion.value)?
            {
                // No candidate actually beats the current value; suppress
                // the suggestion rather than recommend a sideways move.
                return Ok(underperformed(feature, value));
            }
            if near_ideal(value, suggestion.value, policy.affirm_tolerance) {
                Ok(format!(
                    "`{}` was close to ideal - you had {:.1}, target is {:.1}. Nice!",
                    feature, value, suggestion.value
                ))
            } else {
                Ok(format!(
                    "Improve `{}` - try aiming for {:.1} (you had {:.1}).",
                    feature, suggestion.value, value
                ))
            }
        }
    }
}

/// Phrasing for features the model already rates good (>= threshold).
/// Booleans are never corrected here: the model judged the value good, so
/// the line only affirms it.
fn high_confidence_line(
    feature: &str,
    value: f32,
    ftype: FeatureType,
    suggestion: Result<Suggestion>,
    policy: &FeedbackPolicy,
) -> String {
    if ftype == FeatureType::Boolean {
        return correctly_handled(feature, value != 0.0);
    }

    match suggestion {
        Ok(s) if near_ideal(value, s.value, policy.affirm_tolerance) => format!(
            "`{}` was strong ({:.1}). Keep it up! Ideal value: {:.1}.",
            feature, value, s.value
        ),
        Ok(s) => format!(
            "`{}` helped overall, but {:.1} could be closer to ideal {:.1}.",
            feature, value, s.value
        ),
        Err(_) => format!("`{}` was strong ({:.1}). Keep it up!", feature, value),
    }
}

fn correctly_handled(feature: &str, actual: bool) -> String {
    format!(
        "`{}` was correctly handled ({}). Keep doing that!",
        feature, actual
    )
}

fn underperformed(feature: &str, value: f32) -> String {
    format!(
        "Consider optimizing `{}` - your value ({:.1}) underperformed.",
        feature, value
    )
}

/// Relative deviation within tolerance counts as "at the ideal"; an exact
/// zero suggestion only matches an exact zero actual.
fn near_ideal(value: f32, suggested: f32, tolerance: f32) -> bool {
    if suggested == 0.0 {
        return value == 0.0;
    }
    ((value - suggested).abs() / suggested.abs()) <= tolerance
}
