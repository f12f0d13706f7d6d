//! Feature row: one player's engineered statistics for one match

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single scalar feature value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Flag(bool),
    Number(f64),
}

impl FeatureValue {
    /// Numeric view used for model input: flags become 1.0 / 0.0
    pub fn as_f32(&self) -> f32 {
        match self {
            FeatureValue::Flag(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            FeatureValue::Number(n) => *n as f32,
        }
    }

    /// Boolean view: numbers are truthy when non-zero
    pub fn as_flag(&self) -> bool {
        match self {
            FeatureValue::Flag(b) => *b,
            FeatureValue::Number(n) => *n != 0.0,
        }
    }
}

impl From<f64> for FeatureValue {
    fn from(n: f64) -> Self {
        FeatureValue::Number(n)
    }
}

impl From<bool> for FeatureValue {
    fn from(b: bool) -> Self {
        FeatureValue::Flag(b)
    }
}

/// One record per analyzed match for one player: feature name to scalar
/// value, with `None` marking a statistic the timeline parser could not
/// derive. Built once per analysis request and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureRow {
    values: BTreeMap<String, Option<FeatureValue>>,
}

impl FeatureRow {
    pub fn new() -> Self {
        FeatureRow::default()
    }

    pub fn set(&mut self, feature: &str, value: impl Into<FeatureValue>) {
        self.values.insert(feature.to_string(), Some(value.into()));
    }

    /// Record a tracked feature the parser could not derive.
    pub fn set_missing(&mut self, feature: &str) {
        self.values.insert(feature.to_string(), None);
    }

    /// Present value for a feature; absent keys and nulls both read as None.
    pub fn get(&self, feature: &str) -> Option<FeatureValue> {
        self.values.get(feature).copied().flatten()
    }

    pub fn contains(&self, feature: &str) -> bool {
        self.values.contains_key(feature)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Reshape to exactly the given columns, in the given order, filling any
    /// absent or null column with 0. Required before every predict call: the
    /// lane-score model and each quality model expect different column
    /// subsets.
    pub fn align(&self, columns: &[String]) -> Vec<f32> {
        columns
            .iter()
            .map(|c| self.get(c).map_or(0.0, |v| v.as_f32()))
            .collect()
    }
}
