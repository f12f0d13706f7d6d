//! Model loading and prediction
//!
//! The engine treats every persisted model as an opaque predictor: a quality
//! classifier exposes its expected input columns plus a probability-of-good
//! function (or a raw predict fallback for artifacts trained without
//! probability output), and the lane-score regressor maps the full engineered
//! row to a scalar score. The [`QualityModel`] trait is the seam that lets
//! the suggester and synthesizer run against stub models in tests.

pub mod nets;
pub mod registry;

use serde::{Deserialize, Serialize};

pub use nets::{HiddenBlock, LaneScoreNet, LaneScoreNetConfig, QualityNet, QualityNetConfig};
pub use registry::{LaneScoreModel, ModelRegistry, QualityArtifact};

use crate::Result;

/// What a persisted quality model's output means
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    /// Sigmoid head: output is P(good class)
    Probability,
    /// Plain regression head: only a raw score is available
    Score,
}

/// A binary classifier bound to exactly one tracked feature
///
/// Inputs must already be aligned to `expected_columns` (same set, same
/// order). Implementations are immutable once loaded and shared read-only
/// across requests.
pub trait QualityModel {
    /// Input columns, in the order the model expects them
    fn expected_columns(&self) -> &[String];

    /// P(class = good), or `None` for models lacking probability output
    fn predict_proba(&self, input: &[f32]) -> Result<Option<f32>>;

    /// Raw predicted value, available for every model
    fn predict(&self, input: &[f32]) -> Result<f32>;

    /// Preferred quality score: probability when available, raw otherwise
    fn quality_score(&self, input: &[f32]) -> Result<f32> {
        match self.predict_proba(input)? {
            Some(p) => Ok(p),
            None => self.predict(input),
        }
    }
}

/// Sidecar metadata persisted next to each quality-model record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityModelMeta {
    /// The tracked feature this model judges
    pub feature: String,
    /// Expected input columns (the feature, possibly plus companions)
    pub columns: Vec<String>,
    /// Hidden layer dimension of the persisted net
    pub hidden_dim: usize,
    pub output: OutputKind,
}

/// Sidecar metadata persisted next to the lane-score record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaneScoreModelMeta {
    /// Full engineered column set, one-hot role columns included
    pub columns: Vec<String>,
    /// Hidden layer dimensions of the persisted net
    pub hidden_dims: Vec<usize>,
}
