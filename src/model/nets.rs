//! Burn net definitions for the persisted model artifacts
//!
//! Two small MLPs: a per-feature quality classifier ending in a single logit
//! (sigmoid gives the probability of the "good" class) and the lane-score
//! regressor ending in a linear score head. Both persist through
//! `NamedMpkFileRecorder`; the expected input columns and layer dimensions
//! travel in a JSON sidecar next to the record (see the registry).

use burn::module::Module;
use burn::nn::{Dropout, DropoutConfig, Linear, LinearConfig};
use burn::record::{FullPrecisionSettings, Recorder};
use burn::tensor::activation::{relu, sigmoid};
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

use crate::{CoachError, Result};

/// A single hidden layer block: Linear → ReLU → Dropout
#[derive(Module, Debug)]
pub struct HiddenBlock<B: Backend> {
    linear: Linear<B>,
    dropout: Dropout,
}

impl<B: Backend> HiddenBlock<B> {
    pub fn new(device: &B::Device, in_dim: usize, out_dim: usize, dropout: f64) -> Self {
        HiddenBlock {
            linear: LinearConfig::new(in_dim, out_dim).init(device),
            dropout: DropoutConfig::new(dropout).init(),
        }
    }

    pub fn forward(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = self.linear.forward(x);
        let x = relu(x);
        self.dropout.forward(x)
    }
}

/// Configuration for a per-feature quality classifier
#[derive(Debug, Clone)]
pub struct QualityNetConfig {
    /// Input dimension (the feature itself plus any declared companions)
    pub input_dim: usize,
    /// Hidden layer dimension
    pub hidden_dim: usize,
    /// Dropout rate (inactive at inference)
    pub dropout: f64,
}

impl Default for QualityNetConfig {
    fn default() -> Self {
        QualityNetConfig {
            input_dim: 1,
            hidden_dim: 16,
            dropout: 0.1,
        }
    }
}

/// Binary quality classifier for one tracked feature
///
/// Output is a single logit [batch, 1]; apply sigmoid for P(good).
#[derive(Module, Debug)]
pub struct QualityNet<B: Backend> {
    hidden: HiddenBlock<B>,
    head: Linear<B>,
}

impl<B: Backend> QualityNet<B> {
    pub fn new(device: &B::Device, config: &QualityNetConfig) -> Self {
        QualityNet {
            hidden: HiddenBlock::new(device, config.input_dim, config.hidden_dim, config.dropout),
            head: LinearConfig::new(config.hidden_dim, 1).init(device),
        }
    }

    /// Forward pass returning the raw logit [batch, 1]
    pub fn forward(&self, input: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = self.hidden.forward(input);
        self.head.forward(x)
    }

    /// Forward pass returning P(good) in [0, 1]
    pub fn forward_probability(&self, input: Tensor<B, 2>) -> Tensor<B, 2> {
        sigmoid(self.forward(input))
    }

    /// Save the record; the recorder appends the `.mpk` extension.
    pub fn save(&self, path: &str) -> Result<()>
    where
        B::FloatElem: serde::Serialize + serde::de::DeserializeOwned,
        B::IntElem: serde::Serialize + serde::de::DeserializeOwned,
    {
        let recorder = burn::record::NamedMpkFileRecorder::<FullPrecisionSettings>::new();
        recorder
            .record(self.clone().into_record(), path.into())
            .map_err(|e| CoachError::Record(e.to_string()))
    }

    pub fn load(device: &B::Device, path: &str, config: &QualityNetConfig) -> Result<Self>
    where
        B::FloatElem: serde::Serialize + serde::de::DeserializeOwned,
        B::IntElem: serde::Serialize + serde::de::DeserializeOwned,
    {
        let recorder = burn::record::NamedMpkFileRecorder::<FullPrecisionSettings>::new();
        let record = recorder
            .load(path.into(), device)
            .map_err(|e| CoachError::Record(e.to_string()))?;

        let net = Self::new(device, config);
        Ok(net.load_record(record))
    }
}

/// Configuration for the lane-score regressor
#[derive(Debug, Clone)]
pub struct LaneScoreNetConfig {
    /// Input dimension (full engineered column set, one-hot roles included)
    pub input_dim: usize,
    /// Hidden layer dimensions (e.g. [64, 32] for two layers)
    pub hidden_dims: Vec<usize>,
    /// Dropout rate (inactive at inference)
    pub dropout: f64,
}

impl LaneScoreNetConfig {
    pub fn new(input_dim: usize) -> Self {
        LaneScoreNetConfig {
            input_dim,
            hidden_dims: vec![64, 32],
            dropout: 0.1,
        }
    }
}

/// Lane-score regressor over the full feature row
///
/// Output is an unbounded scalar [batch, 1]; the registry clamps it to the
/// documented [0, 100] range.
#[derive(Module, Debug)]
pub struct LaneScoreNet<B: Backend> {
    hidden1: HiddenBlock<B>,
    hidden2: Option<HiddenBlock<B>>,
    score_head: Linear<B>,
}

impl<B: Backend> LaneScoreNet<B> {
    pub fn new(device: &B::Device, config: &LaneScoreNetConfig) -> Self {
        let first_dim = config.hidden_dims.first().copied().unwrap_or(64);
        let hidden1 = HiddenBlock::new(device, config.input_dim, first_dim, config.dropout);

        let (hidden2, head_input_dim) = if config.hidden_dims.len() > 1 {
            let h2 = HiddenBlock::new(
                device,
                config.hidden_dims[0],
                config.hidden_dims[1],
                config.dropout,
            );
            (Some(h2), config.hidden_dims[1])
        } else {
            (None, first_dim)
        };

        LaneScoreNet {
            hidden1,
            hidden2,
            score_head: LinearConfig::new(head_input_dim, 1).init(device),
        }
    }

    /// Forward pass returning the raw score [batch, 1]
    pub fn forward(&self, input: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = self.hidden1.forward(input);
        let x = if let Some(h2) = &self.hidden2 {
            h2.forward(x)
        } else {
            x
        };
        self.score_head.forward(x)
    }

    /// Save the record; the recorder appends the `.mpk` extension.
    pub fn save(&self, path: &str) -> Result<()>
    where
        B::FloatElem: serde::Serialize + serde::de::DeserializeOwned,
        B::IntElem: serde::Serialize + serde::de::DeserializeOwned,
    {
        let recorder = burn::record::NamedMpkFileRecorder::<FullPrecisionSettings>::new();
        recorder
            .record(self.clone().into_record(), path.into())
            .map_err(|e| CoachError::Record(e.to_string()))
    }

    pub fn load(device: &B::Device, path: &str, config: &LaneScoreNetConfig) -> Result<Self>
    where
        B::FloatElem: serde::Serialize + serde::de::DeserializeOwned,
        B::IntElem: serde::Serialize + serde::de::DeserializeOwned,
    {
        let recorder = burn::record::NamedMpkFileRecorder::<FullPrecisionSettings>::new();
        let record = recorder
            .load(path.into(), device)
            .map_err(|e| CoachError::Record(e.to_string()))?;

        let net = Self::new(device, config);
        Ok(net.load_record(record))
    }
}
