//! Model registry: loads the persisted artifacts for one analysis process
//!
//! Artifact layout under the models directory:
//!
//! ```text
//! models/
//!   lane_score_model.json       metadata sidecar (columns, layer dims)
//!   lane_score_model.mpk        burn record
//!   feature_types.json          feature name -> numeric | boolean | other
//!   feature_quality/
//!     <feature>_quality_model.json
//!     <feature>_quality_model.mpk
//! ```
//!
//! A missing lane-score artifact is fatal. A missing per-feature quality
//! model is not an error: not every tracked feature has a trained model, and
//! such features are simply skipped in feedback. All loads are pure reads;
//! the registry is immutable afterwards and safe to share across requests.

use std::collections::BTreeMap;
use std::path::Path;

use burn::tensor::backend::Backend;
use burn::tensor::{ElementConversion, Tensor};
use log::{debug, info, warn};

use crate::features::{FeatureRow, FeatureTypeMap, TRACKED_FEATURES};
use crate::model::{
    LaneScoreModelMeta, LaneScoreNet, LaneScoreNetConfig, OutputKind, QualityModel,
    QualityModelMeta, QualityNet, QualityNetConfig,
};
use crate::{CoachError, Result};

/// A loaded per-feature quality classifier plus its sidecar metadata
#[derive(Debug)]
pub struct QualityArtifact<B: Backend> {
    meta: QualityModelMeta,
    net: QualityNet<B>,
    device: B::Device,
}

impl<B: Backend> QualityArtifact<B> {
    pub fn new(meta: QualityModelMeta, net: QualityNet<B>, device: B::Device) -> Self {
        QualityArtifact { meta, net, device }
    }

    pub fn feature(&self) -> &str {
        &self.meta.feature
    }

    fn stem(feature: &str) -> String {
        format!("{}_quality_model", feature)
    }

    /// Load the artifact for one feature, or `None` when no model was
    /// trained for it.
    pub fn load(dir: &Path, feature: &str, device: &B::Device) -> Result<Option<Self>>
    where
        B::FloatElem: serde::Serialize + serde::de::DeserializeOwned,
        B::IntElem: serde::Serialize + serde::de::DeserializeOwned,
    {
        let base = dir.join("feature_quality").join(Self::stem(feature));
        let meta_path = base.with_extension("json");
        let record_path = base.with_extension("mpk");
        if !meta_path.exists() || !record_path.exists() {
            debug!("no quality model for '{}', skipping", feature);
            return Ok(None);
        }

        let meta: QualityModelMeta =
            serde_json::from_str(&std::fs::read_to_string(&meta_path)?)?;
        let config = QualityNetConfig {
            input_dim: meta.columns.len(),
            hidden_dim: meta.hidden_dim,
            ..QualityNetConfig::default()
        };
        let net = QualityNet::load(device, &base.to_string_lossy(), &config)?;

        Ok(Some(QualityArtifact::new(meta, net, device.clone())))
    }

    /// Persist both the record and its metadata sidecar.
    pub fn save(&self, dir: &Path) -> Result<()>
    where
        B::FloatElem: serde::Serialize + serde::de::DeserializeOwned,
        B::IntElem: serde::Serialize + serde::de::DeserializeOwned,
    {
        let quality_dir = dir.join("feature_quality");
        std::fs::create_dir_all(&quality_dir)?;
        let base = quality_dir.join(Self::stem(&self.meta.feature));

        std::fs::write(
            base.with_extension("json"),
            serde_json::to_string_pretty(&self.meta)?,
        )?;
        self.net.save(&base.to_string_lossy())
    }

    fn input_tensor(&self, input: &[f32]) -> Result<Tensor<B, 2>> {
        let n = self.meta.columns.len();
        if input.len() != n {
            return Err(CoachError::Prediction(format!(
                "quality model for '{}' expects {} columns, got {}",
                self.meta.feature,
                n,
                input.len()
            )));
        }
        Ok(Tensor::<B, 1>::from_floats(input, &self.device).reshape([1, n]))
    }
}

impl<B: Backend> QualityModel for QualityArtifact<B> {
    fn expected_columns(&self) -> &[String] {
        &self.meta.columns
    }

    fn predict_proba(&self, input: &[f32]) -> Result<Option<f32>> {
        if self.meta.output == OutputKind::Score {
            return Ok(None);
        }
        let x = self.input_tensor(input)?;
        Ok(Some(self.net.forward_probability(x).into_scalar().elem()))
    }

    fn predict(&self, input: &[f32]) -> Result<f32> {
        let x = self.input_tensor(input)?;
        let out = match self.meta.output {
            OutputKind::Probability => self.net.forward_probability(x),
            OutputKind::Score => self.net.forward(x),
        };
        Ok(out.into_scalar().elem())
    }
}

/// The lane-score regressor plus its expected column set
#[derive(Debug)]
pub struct LaneScoreModel<B: Backend> {
    meta: LaneScoreModelMeta,
    net: LaneScoreNet<B>,
    device: B::Device,
}

impl<B: Backend> LaneScoreModel<B> {
    const STEM: &'static str = "lane_score_model";

    pub fn new(meta: LaneScoreModelMeta, net: LaneScoreNet<B>, device: B::Device) -> Self {
        LaneScoreModel { meta, net, device }
    }

    pub fn expected_columns(&self) -> &[String] {
        &self.meta.columns
    }

    pub fn load(dir: &Path, device: &B::Device) -> Result<Self>
    where
        B::FloatElem: serde::Serialize + serde::de::DeserializeOwned,
        B::IntElem: serde::Serialize + serde::de::DeserializeOwned,
    {
        let base = dir.join(Self::STEM);
        let meta_path = base.with_extension("json");
        if !meta_path.exists() {
            return Err(CoachError::MissingArtifact {
                what: "lane score model metadata".to_string(),
                path: meta_path,
            });
        }
        let record_path = base.with_extension("mpk");
        if !record_path.exists() {
            return Err(CoachError::MissingArtifact {
                what: "lane score model record".to_string(),
                path: record_path,
            });
        }

        let meta: LaneScoreModelMeta =
            serde_json::from_str(&std::fs::read_to_string(&meta_path)?)?;
        let config = LaneScoreNetConfig {
            input_dim: meta.columns.len(),
            hidden_dims: meta.hidden_dims.clone(),
            dropout: 0.1,
        };
        let net = LaneScoreNet::load(device, &base.to_string_lossy(), &config)?;

        Ok(LaneScoreModel::new(meta, net, device.clone()))
    }

    /// Persist both the record and its metadata sidecar.
    pub fn save(&self, dir: &Path) -> Result<()>
    where
        B::FloatElem: serde::Serialize + serde::de::DeserializeOwned,
        B::IntElem: serde::Serialize + serde::de::DeserializeOwned,
    {
        std::fs::create_dir_all(dir)?;
        let base = dir.join(Self::STEM);
        std::fs::write(
            base.with_extension("json"),
            serde_json::to_string_pretty(&self.meta)?,
        )?;
        self.net.save(&base.to_string_lossy())
    }

    /// Predict the lane score for one row, clamped to [0, 100].
    ///
    /// The row is aligned to the model's column set first, so extra keys are
    /// ignored and absent ones read as 0.
    pub fn predict_row(&self, row: &FeatureRow) -> Result<f32> {
        let input = row.align(&self.meta.columns);
        let x = Tensor::<B, 1>::from_floats(input.as_slice(), &self.device)
            .reshape([1, self.meta.columns.len()]);
        let score: f32 = self.net.forward(x).into_scalar().elem();
        Ok(score.clamp(0.0, 100.0))
    }
}

/// All model artifacts needed for one analysis, loaded once and passed by
/// reference into every call.
#[derive(Debug)]
pub struct ModelRegistry<B: Backend> {
    lane: LaneScoreModel<B>,
    quality: BTreeMap<String, QualityArtifact<B>>,
    feature_types: FeatureTypeMap,
}

impl<B: Backend> ModelRegistry<B> {
    pub fn new(
        lane: LaneScoreModel<B>,
        quality: BTreeMap<String, QualityArtifact<B>>,
        feature_types: FeatureTypeMap,
    ) -> Self {
        ModelRegistry {
            lane,
            quality,
            feature_types,
        }
    }

    /// Load every artifact under `dir`.
    ///
    /// Fails only when the lane-score model (or its metadata) is unreadable;
    /// tracked features without a persisted quality model are skipped.
    pub fn load(dir: &Path, device: &B::Device) -> Result<Self>
    where
        B::FloatElem: serde::Serialize + serde::de::DeserializeOwned,
        B::IntElem: serde::Serialize + serde::de::DeserializeOwned,
    {
        let lane = LaneScoreModel::load(dir, device)?;

        let mut quality = BTreeMap::new();
        for &feature in TRACKED_FEATURES {
            if let Some(artifact) = QualityArtifact::load(dir, feature, device)? {
                quality.insert(feature.to_string(), artifact);
            }
        }
        info!(
            "loaded lane score model ({} columns) and {} quality models from {}",
            lane.expected_columns().len(),
            quality.len(),
            dir.display()
        );

        let types_path = dir.join("feature_types.json");
        let feature_types = if types_path.exists() {
            FeatureTypeMap::load(&types_path)?
        } else {
            warn!(
                "feature type map missing at {}; phrasing every feature as numeric",
                types_path.display()
            );
            FeatureTypeMap::new()
        };

        Ok(ModelRegistry::new(lane, quality, feature_types))
    }

    pub fn lane(&self) -> &LaneScoreModel<B> {
        &self.lane
    }

    pub fn quality_models(&self) -> &BTreeMap<String, QualityArtifact<B>> {
        &self.quality
    }

    pub fn feature_types(&self) -> &FeatureTypeMap {
        &self.feature_types
    }
}
