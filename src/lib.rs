//! Mid-lane performance scoring with per-feature quality feedback
//!
//! Given one player's engineered feature row for a single ranked match, this
//! crate predicts an overall lane score with a trained regressor and explains
//! it: each tracked statistic is judged by its own binary quality classifier,
//! a grid search over the classifier's decision surface proposes a target
//! value that would flip the verdict, and the result is rendered as
//! categorized, human-readable feedback lines.
//!
//! Data collection, timeline parsing, and model training live upstream; this
//! crate consumes a finished [`FeatureRow`] plus persisted model artifacts.

pub mod analyze;
pub mod features;
pub mod feedback;
pub mod model;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use analyze::{format_report, AnalysisReport, Analyzer, ScoreBand};
pub use features::{FeatureRow, FeatureType, FeatureTypeMap, FeatureValue, FeedbackCategory};
pub use feedback::{give_feedback, suggest_target_value, CategorizedFeedback, Suggestion};
pub use model::{ModelRegistry, QualityModel};

/// Application-wide errors
#[derive(Debug, Error)]
pub enum CoachError {
    #[error("missing model artifact: {what} (expected at {path})")]
    MissingArtifact { what: String, path: PathBuf },

    #[error("failed to load model record: {0}")]
    Record(String),

    #[error("prediction failed: {0}")]
    Prediction(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoachError>;

/// Tunable thresholds for the feedback synthesizer and suggester.
///
/// The confidence threshold and the strict-improvement gate varied across
/// revisions of the reference feedback flow, so both are policy knobs here
/// rather than constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackPolicy {
    /// Quality probability at or above which a feature is praised.
    pub confidence_threshold: f32,
    /// Relative deviation from the suggested value still phrased as affirming.
    pub affirm_tolerance: f32,
    /// When true, a suggestion that does not predict better quality than the
    /// current value degrades to the generic fallback line.
    pub require_improvement: bool,
    /// Quality probability the target-value search aims for.
    pub target_confidence: f32,
    /// Candidate range searched, lower bound inclusive, upper exclusive.
    pub search_range: (f32, f32),
    /// Increment between candidate values.
    pub search_step: f32,
}

impl Default for FeedbackPolicy {
    fn default() -> Self {
        FeedbackPolicy {
            confidence_threshold: 0.7,
            affirm_tolerance: 0.1,
            require_improvement: false,
            target_confidence: 0.8,
            search_range: (0.0, 1000.0),
            search_step: 5.0,
        }
    }
}

/// Application configuration loaded from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub policy: FeedbackPolicy,
    pub data: DataConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory holding the lane-score model, the per-feature quality
    /// models, and the feature-type map.
    pub models_dir: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig {
            models_dir: "models".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CoachError::Config(format!("Failed to read config file {}: {}", path, e))
        })?;
        toml::from_str(&content)
            .map_err(|e| CoachError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| CoachError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = FeedbackPolicy::default();
        assert_eq!(policy.confidence_threshold, 0.7);
        assert_eq!(policy.search_range, (0.0, 1000.0));
        assert_eq!(policy.search_step, 5.0);
        assert!(!policy.require_improvement);
    }

    #[test]
    fn test_config_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let path = path.to_str().unwrap();

        let mut config = Config::default();
        config.policy.confidence_threshold = 0.5;
        config.data.models_dir = "artifacts".to_string();
        config.save(path).unwrap();

        let loaded = Config::load(path).unwrap();
        assert_eq!(loaded.policy.confidence_threshold, 0.5);
        assert_eq!(loaded.policy.target_confidence, 0.8);
        assert_eq!(loaded.data.models_dir, "artifacts");
    }

    #[test]
    fn test_config_load_missing_file() {
        let err = Config::load("/no/such/config.toml").unwrap_err();
        assert!(matches!(err, CoachError::Config(_)));
    }
}
