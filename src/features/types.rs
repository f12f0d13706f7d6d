//! Feature-type map: numeric vs boolean phrasing per feature

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Result;

/// Declared type of a tracked feature, inferred offline from the training
/// data and persisted as `feature_types.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureType {
    Numeric,
    Boolean,
    Other,
}

/// Feature name to [`FeatureType`], loaded once and read-only afterwards.
/// Features absent from the map fall back to numeric phrasing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureTypeMap {
    types: BTreeMap<String, FeatureType>,
}

impl FeatureTypeMap {
    pub fn new() -> Self {
        FeatureTypeMap::default()
    }

    pub fn insert(&mut self, feature: &str, ftype: FeatureType) {
        self.types.insert(feature.to_string(), ftype);
    }

    pub fn get(&self, feature: &str) -> FeatureType {
        self.types
            .get(feature)
            .copied()
            .unwrap_or(FeatureType::Numeric)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_type_map() {
        let map: FeatureTypeMap =
            serde_json::from_str(r#"{"kda": "numeric", "early_roam": "boolean"}"#).unwrap();
        assert_eq!(map.get("kda"), FeatureType::Numeric);
        assert_eq!(map.get("early_roam"), FeatureType::Boolean);
    }

    #[test]
    fn test_unknown_feature_defaults_numeric() {
        let map = FeatureTypeMap::new();
        assert_eq!(map.get("gold_diff_at_10"), FeatureType::Numeric);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feature_types.json");

        let mut map = FeatureTypeMap::new();
        map.insert("has_early_lane_prio", FeatureType::Boolean);
        map.insert("first_ward_time", FeatureType::Numeric);
        map.save(&path).unwrap();

        let loaded = FeatureTypeMap::load(&path).unwrap();
        assert_eq!(loaded, map);
    }
}
