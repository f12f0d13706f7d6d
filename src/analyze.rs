//! Analysis entry point: lane score plus categorized feedback
//!
//! The [`Analyzer`] is the surface the UI/orchestrator consumes. It owns the
//! loaded registry and the feedback policy; each call is synchronous,
//! request-per-call, and shares no mutable state with other calls.

use std::fmt;
use std::path::Path;

use burn::tensor::backend::Backend;
use log::debug;
use serde::Serialize;

use crate::features::FeatureRow;
use crate::feedback::{give_feedback, CategorizedFeedback};
use crate::model::ModelRegistry;
use crate::{Config, FeedbackPolicy, Result};

/// Result of analyzing one match for one player
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// Overall lane-phase score in [0, 100]
    pub lane_score: f32,
    /// Feedback lines grouped by narrative category
    pub feedback: CategorizedFeedback,
}

/// Coarse verdict band for a lane score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScoreBand {
    Dominant,
    Solid,
    Close,
    Lost,
    Severe,
}

impl ScoreBand {
    pub fn for_score(score: f32) -> Self {
        if score >= 80.0 {
            ScoreBand::Dominant
        } else if score >= 60.0 {
            ScoreBand::Solid
        } else if score >= 40.0 {
            ScoreBand::Close
        } else if score >= 20.0 {
            ScoreBand::Lost
        } else {
            ScoreBand::Severe
        }
    }

    pub fn verdict(&self) -> &'static str {
        match self {
            ScoreBand::Dominant => "You dominated lane! Strong gold control and pressure.",
            ScoreBand::Solid => {
                "Solid lane. Minor improvements could turn this into domination."
            }
            ScoreBand::Close => "Lane was close. Look into key turning points or mistakes.",
            ScoreBand::Lost => "You lost lane. Identify where you gave up gold advantage.",
            ScoreBand::Severe => {
                "Severe lane loss. Likely early deaths or missed CS lead to a snowball."
            }
        }
    }
}

impl fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScoreBand::Dominant => "Dominant",
            ScoreBand::Solid => "Solid",
            ScoreBand::Close => "Close",
            ScoreBand::Lost => "Lost",
            ScoreBand::Severe => "Severe",
        };
        write!(f, "{}", name)
    }
}

/// Analyzer combining the loaded models with a feedback policy
pub struct Analyzer<B: Backend> {
    registry: ModelRegistry<B>,
    policy: FeedbackPolicy,
}

impl<B: Backend> Analyzer<B> {
    pub fn new(registry: ModelRegistry<B>, policy: FeedbackPolicy) -> Self {
        Analyzer { registry, policy }
    }

    /// Load the registry named by the config and adopt its policy.
    pub fn load(config: &Config, device: &B::Device) -> Result<Self>
    where
        B::FloatElem: serde::Serialize + serde::de::DeserializeOwned,
        B::IntElem: serde::Serialize + serde::de::DeserializeOwned,
    {
        let registry = ModelRegistry::load(Path::new(&config.data.models_dir), device)?;
        Ok(Analyzer::new(registry, config.policy.clone()))
    }

    pub fn registry(&self) -> &ModelRegistry<B> {
        &self.registry
    }

    /// Score one feature row and explain the score.
    ///
    /// Failures local to one feature never abort the call; they surface only
    /// as that feature's generic fallback line.
    pub fn analyze(&self, row: &FeatureRow) -> Result<AnalysisReport> {
        let lane_score = self.registry.lane().predict_row(row)?;
        debug!("predicted lane score {:.2}", lane_score);

        let feedback = give_feedback(
            row,
            self.registry.quality_models(),
            self.registry.feature_types(),
            &self.policy,
        );

        Ok(AnalysisReport {
            lane_score,
            feedback,
        })
    }
}

/// Format a report for terminal display
pub fn format_report(report: &AnalysisReport) -> String {
    let band = ScoreBand::for_score(report.lane_score);
    let mut out = format!(
        "Predicted lane score: {:.2}\n{}\n",
        report.lane_score,
        band.verdict()
    );

    if !report.feedback.is_empty() {
        out.push_str("\nDetailed feedback by category:\n");
        for (category, lines) in report.feedback.iter() {
            if lines.is_empty() {
                continue;
            }
            out.push_str(&format!("\n{}:\n", category));
            for line in lines {
                out.push_str(&format!("- {}\n", line));
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{FeatureType, FeatureTypeMap};
    use crate::model::{
        LaneScoreModel, LaneScoreModelMeta, LaneScoreNet, LaneScoreNetConfig, OutputKind,
        QualityArtifact, QualityModelMeta, QualityNet, QualityNetConfig,
    };
    use burn::backend::NdArray;
    use std::collections::BTreeMap;

    type TestBackend = NdArray<f32>;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn test_registry() -> ModelRegistry<TestBackend> {
        let device = Default::default();

        let lane_meta = LaneScoreModelMeta {
            columns: cols(&["cs_diff_at_10", "gold_diff_at_10", "role_MIDDLE"]),
            hidden_dims: vec![8],
        };
        let lane_config = LaneScoreNetConfig {
            input_dim: 3,
            hidden_dims: vec![8],
            dropout: 0.1,
        };
        let lane = LaneScoreModel::new(
            lane_meta,
            LaneScoreNet::new(&device, &lane_config),
            device,
        );

        let device: <TestBackend as Backend>::Device = Default::default();
        let quality_meta = QualityModelMeta {
            feature: "cs_diff_at_10".to_string(),
            columns: cols(&["cs_diff_at_10"]),
            hidden_dim: 4,
            output: OutputKind::Probability,
        };
        let quality_config = QualityNetConfig {
            input_dim: 1,
            hidden_dim: 4,
            ..QualityNetConfig::default()
        };
        let quality = QualityArtifact::new(
            quality_meta,
            QualityNet::new(&device, &quality_config),
            device,
        );

        let mut models = BTreeMap::new();
        models.insert("cs_diff_at_10".to_string(), quality);

        let mut types = FeatureTypeMap::new();
        types.insert("cs_diff_at_10", FeatureType::Numeric);

        ModelRegistry::new(lane, models, types)
    }

    #[test]
    fn test_analyze_score_in_range_and_one_line_per_modeled_feature() {
        let analyzer = Analyzer::new(
            test_registry(),
            FeedbackPolicy {
                search_range: (0.0, 100.0),
                ..FeedbackPolicy::default()
            },
        );

        let mut row = FeatureRow::new();
        row.set("cs_diff_at_10", -12.0);
        row.set("gold_diff_at_10", -450.0);
        row.set("first_ward_time", 95.0);

        let report = analyzer.analyze(&row).unwrap();
        assert!((0.0..=100.0).contains(&report.lane_score));
        // Only cs_diff_at_10 has a quality model, so exactly one line.
        assert_eq!(report.feedback.total_lines(), 1);
        assert!(report.feedback.lines(crate::FeedbackCategory::LaningPhase)[0]
            .contains("cs_diff_at_10"));
    }

    #[test]
    fn test_analyze_deterministic() {
        let analyzer = Analyzer::new(
            test_registry(),
            FeedbackPolicy {
                search_range: (0.0, 100.0),
                ..FeedbackPolicy::default()
            },
        );

        let mut row = FeatureRow::new();
        row.set("cs_diff_at_10", 5.0);

        let a = analyzer.analyze(&row).unwrap();
        let b = analyzer.analyze(&row).unwrap();
        assert_eq!(a.lane_score, b.lane_score);
        assert_eq!(a.feedback, b.feedback);
    }

    #[test]
    fn test_score_bands() {
        assert_eq!(ScoreBand::for_score(92.0), ScoreBand::Dominant);
        assert_eq!(ScoreBand::for_score(80.0), ScoreBand::Dominant);
        assert_eq!(ScoreBand::for_score(79.9), ScoreBand::Solid);
        assert_eq!(ScoreBand::for_score(60.0), ScoreBand::Solid);
        assert_eq!(ScoreBand::for_score(40.0), ScoreBand::Close);
        assert_eq!(ScoreBand::for_score(20.0), ScoreBand::Lost);
        assert_eq!(ScoreBand::for_score(5.0), ScoreBand::Severe);
    }

    #[test]
    fn test_format_report_mentions_score_and_lines() {
        let analyzer = Analyzer::new(
            test_registry(),
            FeedbackPolicy {
                search_range: (0.0, 100.0),
                ..FeedbackPolicy::default()
            },
        );

        let mut row = FeatureRow::new();
        row.set("cs_diff_at_10", -12.0);

        let report = analyzer.analyze(&row).unwrap();
        let text = format_report(&report);
        assert!(text.contains("Predicted lane score"));
        assert!(text.contains("cs_diff_at_10"));
        assert!(text.contains("Laning Phase"));
    }
}
